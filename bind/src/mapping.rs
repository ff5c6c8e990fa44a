//! The mapping utilities between solidity type and target strong type language.
//!

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::typedef::{SimpleType, Type};

/// The context to map solidity type to target strong type language.
/// you can read mapping data from any [`serde`] compatibable data formats.
///
/// Besides the plain type names (`address`, `uint64`, ..), the mapping may contain
/// these template rules, used when no plain entry matches:
///
/// * `uint_m` / `int_m`: `$m` is replaced with the bit size.
/// * `bytes_m`: `$m` is replaced with the byte length.
/// * `fixed_m_n`: `$m` and `$n` are replaced with bits and decimals.
/// * `array_m`: `$el` is replaced with the element type and `$m` with the length.
/// * `array`: `$el` is replaced with the element type.
#[derive(Debug, Serialize, Deserialize)]
pub struct BinderTypeMapping {
    #[serde(flatten)]
    mapping: HashMap<String, String>,

    #[serde(skip)]
    dynamic_mapping: HashMap<String, String>,
}

impl FromStr for BinderTypeMapping {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl BinderTypeMapping {
    /// Mapping abi type to target language type.
    ///
    /// `tuple_name` is the target type declared for the tuple at the base of `abi_type`,
    /// without it tuple types are unmapped.
    pub fn abi_type_mapping(&mut self, abi_type: &Type, tuple_name: Option<&str>) -> Option<String> {
        match abi_type {
            Type::Simple(SimpleType::Tuple) => tuple_name.map(str::to_owned),
            Type::Simple(el) => self.get(&el.to_string()).map(str::to_owned),
            Type::BytesM(el) => self.declare(el.to_string(), "bytes_m", &[("$m", el.m)]),
            Type::IntegerM(el) => {
                let rule = if el.signed { "int_m" } else { "uint_m" };

                self.declare(el.to_string(), rule, &[("$m", el.m)])
            }
            Type::FixedMN(el) => {
                self.declare(el.to_string(), "fixed_m_n", &[("$m", el.m), ("$n", el.n)])
            }
            Type::ArrayM(el) => {
                let el_type = self.abi_type_mapping(&el.element, tuple_name)?;

                Some(
                    self.get("array_m")?
                        .replace("$el", &el_type)
                        .replace("$m", &el.m.to_string()),
                )
            }
            Type::Array(el) => {
                let el_type = self.abi_type_mapping(&el.element, tuple_name)?;

                Some(self.get("array")?.replace("$el", &el_type))
            }
        }
    }

    /// Mapping binder-specific runtime type into target language type.
    ///
    /// `runtime Type` is the runtime type of the target web3 framework that must be known to generate code.
    pub fn rt_type_mapping(&self, rt_type: &str) -> Option<&str> {
        self.get(rt_type)
    }

    fn get(&self, type_name: &str) -> Option<&str> {
        self.mapping.get(type_name).map(String::as_str)
    }

    fn declare(&mut self, tag: String, rule: &str, vars: &[(&str, usize)]) -> Option<String> {
        // Plain entries win over template rules.
        if let Some(declared) = self.mapping.get(&tag) {
            return Some(declared.clone());
        }

        if let Some(declared) = self.dynamic_mapping.get(&tag) {
            return Some(declared.clone());
        }

        let mut declared = self.get(rule)?.to_owned();

        for (var, value) in vars {
            declared = declared.replace(var, &value.to_string());
        }

        self.dynamic_mapping.insert(tag, declared.clone());

        Some(declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> BinderTypeMapping {
        r#"{
            "address": "common.Address",
            "bool": "bool",
            "uint8": "uint8",
            "uint_m": "*big.Int",
            "int_m": "*big.Int",
            "fixed_m_n": "fixed.Decimal$mx$n",
            "bytes_m": "[$m]byte",
            "array_m": "[$m]$el",
            "array": "[]$el"
        }"#
        .parse()
        .expect("Parse mapping")
    }

    fn map(mapping: &mut BinderTypeMapping, declared: &str) -> Option<String> {
        let t: Type = declared.parse().expect("Parse type string");

        mapping.abi_type_mapping(&t, Some("Point"))
    }

    #[test]
    fn test_type_mapping() {
        let mut mapping = mapping();

        assert_eq!(map(&mut mapping, "uint256").as_deref(), Some("*big.Int"));
        assert_eq!(map(&mut mapping, "uint8").as_deref(), Some("uint8"));
        assert_eq!(map(&mut mapping, "int64").as_deref(), Some("*big.Int"));
        assert_eq!(
            map(&mut mapping, "fixed128x8").as_deref(),
            Some("fixed.Decimal128x8")
        );
        assert_eq!(map(&mut mapping, "uint256[20]").as_deref(), Some("[20]*big.Int"));
        assert_eq!(map(&mut mapping, "uint8[]").as_deref(), Some("[]uint8"));
        assert_eq!(map(&mut mapping, "bytes24").as_deref(), Some("[24]byte"));
        assert_eq!(map(&mut mapping, "bytes32[2]").as_deref(), Some("[2][32]byte"));
        assert_eq!(map(&mut mapping, "address").as_deref(), Some("common.Address"));
        assert_eq!(map(&mut mapping, "tuple[2][]").as_deref(), Some("[][2]Point"));
    }

    #[test]
    fn test_missing_rule() {
        let mut mapping = mapping();

        assert_eq!(map(&mut mapping, "string"), None);
        assert_eq!(map(&mut mapping, "string[]"), None);

        let tuple: Type = "tuple".parse().unwrap();

        assert_eq!(mapping.abi_type_mapping(&tuple, None), None);
    }
}
