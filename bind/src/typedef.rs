//! Solidity contract abi json model.
//!
//! Visit the [`official document`](https://docs.soliditylang.org/en/latest/abi-spec.html#json) for details.

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Error raised while parsing an abi type declaration.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid integer type `{0}`, M must meet the condition 0 < M <= 256, M % 8 == 0")]
    IntegerM(String),

    #[error("invalid fixed type `{0}`, M must meet 8 <= M <= 256, M % 8 == 0 and N must meet 0 < N <= 80")]
    FixedMN(String),

    #[error("invalid fixed length binary type `{0}`, M must meet 0 < M <= 32")]
    BytesM(String),

    #[error("invalid fixed-length array type `{0}`")]
    ArrayM(String),

    #[error("unknown abi type `{0}`")]
    Unknown(String),
}

/// Contract interface item, discriminated by the json `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum AbiField {
    Function(Function),
    Constructor(Constructor),
    Receive(Receive),
    Fallback(Fallback),
    Event(Event),
    Error(Error),
}

/// A `function` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// the function name
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<Parameter>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl Function {
    /// Canonical signature, only include inputs. e.g: `withdraw(address)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_list(&self.inputs))
    }
}

/// A `constructor` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl Constructor {
    pub fn signature(&self) -> String {
        format!("constructor({})", canonical_list(&self.inputs))
    }
}

/// A `receive` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receive {
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// A `fallback` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fallback {
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// pure (does not read blockchain state), view (does not modify blockchain state),
/// nonpayable (does not accept Ether, the default) and payable (accepts Ether).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl Display for StateMutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::Pure => "pure",
            Self::View => "view",
            Self::Nonpayable => "nonpayable",
            Self::Payable => "payable",
        };

        write!(f, "{}", value)
    }
}

/// An `event` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    /// `true` if the event was declared as anonymous
    #[serde(default)]
    pub anonymous: bool,
}

impl Event {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_list(&self.inputs))
    }
}

/// An `error` abi item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
}

impl Error {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_list(&self.inputs))
    }
}

/// Input or output parameter of a function/event/error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Empty for unnamed parameters.
    #[serde(default)]
    pub name: String,
    pub r#type: Type,
    /// Only present if the type starts with `tuple`, e.g. `tuple`, `tuple[]`
    pub components: Option<Vec<Parameter>>,
    /// Only meaningful for event inputs.
    #[serde(default)]
    pub indexed: bool,
    /// Compiler extension, e.g. `struct Lib.Point[]`
    pub internal_type: Option<String>,
}

impl Parameter {
    /// Canonical type used in signatures, tuples are expanded to `(T1,T2,..)`.
    pub fn canonical_type(&self) -> String {
        let declared = self.r#type.to_string();

        match (&self.components, declared.strip_prefix("tuple")) {
            (Some(components), Some(suffix)) => {
                format!("({}){}", canonical_list(components), suffix)
            }
            _ => declared,
        }
    }
}

fn canonical_list(params: &[Parameter]) -> String {
    params
        .iter()
        .map(Parameter::canonical_type)
        .collect::<Vec<_>>()
        .join(",")
}

/// Keccak-256 digest of `data`.
pub fn keccak256<D: AsRef<[u8]>>(data: D) -> [u8; 32] {
    let digest = Keccak256::new().chain_update(data).finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);

    hash
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// The 4 bytes method selector of a canonical function `signature`, hex encoded without `0x` prefix.
pub fn selector(signature: &str) -> String {
    to_hex(&keccak256(signature)[..4])
}

/// The topic of a canonical event `signature`, hex encoded without `0x` prefix.
pub fn topic(signature: &str) -> String {
    to_hex(&keccak256(signature))
}

/// Abi types that carry no size parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    Address,
    Bool,
    /// an address (20 bytes) followed by a function selector (4 bytes). Encoded identical to bytes24.
    Function,
    Bytes,
    String,
    Tuple,
}


impl Display for SimpleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::Address => "address",
            Self::Bool => "bool",
            Self::Function => "function",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Tuple => "tuple",
        };

        write!(f, "{}", value)
    }
}

/// integer type of M bits, 0 < M <= 256, M % 8 == 0. e.g. uint32, uint8
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntegerM {
    pub signed: bool,
    pub m: usize,
}

impl Display for IntegerM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signed {
            write!(f, "int{}", self.m)
        } else {
            write!(f, "uint{}", self.m)
        }
    }
}

/// fixed-point decimal number of M bits, 8 <= M <= 256, M % 8 == 0, and 0 < N <= 80, which denotes the value v as v / (10 ** N).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedMN {
    pub signed: bool,
    pub m: usize,
    pub n: usize,
}

impl Display for FixedMN {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signed {
            write!(f, "fixed{}x{}", self.m, self.n)
        } else {
            write!(f, "ufixed{}x{}", self.m, self.n)
        }
    }
}

/// binary type of M bytes, 0 < M <= 32
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytesM {
    pub m: usize,
}

impl Display for BytesM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bytes{}", self.m)
    }
}

/// a fixed-length array of M elements, M >= 0, of the given type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayM {
    pub element: Type,
    pub m: usize,
}

impl Display for ArrayM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.element, self.m)
    }
}

/// a variable-length array of elements of the given type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array {
    pub element: Type,
}

impl Display for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[]", self.element)
    }
}

/// Abi type declaration.
///
/// The aliases `uint`, `int`, `fixed` and `ufixed` are parsed into their canonical
/// sized form, so [`Display`] always prints the canonical type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Simple(SimpleType),
    BytesM(BytesM),
    IntegerM(IntegerM),
    FixedMN(FixedMN),
    ArrayM(Box<ArrayM>),
    Array(Box<Array>),
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(u?)int(\d{1,3})$").expect("integer regex"))
}

fn fixed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(u?)fixed(\d{1,3})x(\d{1,2})$").expect("fixed regex"))
}

fn array_m_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\[(\d{1,5})\]$").expect("array regex"))
}

impl FromStr for Type {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(element) = s.strip_suffix("[]") {
            return Ok(Self::Array(Box::new(Array {
                element: element.parse()?,
            })));
        }

        if let Some(caps) = array_m_regex().captures(s) {
            let m = caps[2]
                .parse()
                .map_err(|_| TypeError::ArrayM(s.to_owned()))?;

            return Ok(Self::ArrayM(Box::new(ArrayM {
                element: caps[1].parse()?,
                m,
            })));
        }

        let simple = match s {
            "address" => Some(SimpleType::Address),
            "bool" => Some(SimpleType::Bool),
            "function" => Some(SimpleType::Function),
            "bytes" => Some(SimpleType::Bytes),
            "string" => Some(SimpleType::String),
            "tuple" => Some(SimpleType::Tuple),
            _ => None,
        };

        if let Some(simple) = simple {
            return Ok(Self::Simple(simple));
        }

        match s {
            "uint" => return Ok(Self::IntegerM(IntegerM { signed: false, m: 256 })),
            "int" => return Ok(Self::IntegerM(IntegerM { signed: true, m: 256 })),
            "ufixed" => {
                return Ok(Self::FixedMN(FixedMN {
                    signed: false,
                    m: 128,
                    n: 18,
                }))
            }
            "fixed" => {
                return Ok(Self::FixedMN(FixedMN {
                    signed: true,
                    m: 128,
                    n: 18,
                }))
            }
            _ => {}
        }

        if let Some(caps) = integer_regex().captures(s) {
            let m: usize = caps[2]
                .parse()
                .map_err(|_| TypeError::IntegerM(s.to_owned()))?;

            if m == 0 || m > 256 || m % 8 != 0 {
                return Err(TypeError::IntegerM(s.to_owned()));
            }

            return Ok(Self::IntegerM(IntegerM {
                signed: caps[1].is_empty(),
                m,
            }));
        }

        if let Some(caps) = fixed_regex().captures(s) {
            let m: usize = caps[2]
                .parse()
                .map_err(|_| TypeError::FixedMN(s.to_owned()))?;
            let n: usize = caps[3]
                .parse()
                .map_err(|_| TypeError::FixedMN(s.to_owned()))?;

            if m < 8 || m > 256 || m % 8 != 0 || n == 0 || n > 80 {
                return Err(TypeError::FixedMN(s.to_owned()));
            }

            return Ok(Self::FixedMN(FixedMN {
                signed: caps[1].is_empty(),
                m,
                n,
            }));
        }

        if let Some(m) = s.strip_prefix("bytes") {
            let m: usize = m.parse().map_err(|_| TypeError::Unknown(s.to_owned()))?;

            if m == 0 || m > 32 {
                return Err(TypeError::BytesM(s.to_owned()));
            }

            return Ok(Self::BytesM(BytesM { m }));
        }

        Err(TypeError::Unknown(s.to_owned()))
    }
}

impl TryFrom<String> for Type {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.to_string()
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(el) => el.fmt(f),
            Self::BytesM(el) => el.fmt(f),
            Self::IntegerM(el) => el.fmt(f),
            Self::FixedMN(el) => el.fmt(f),
            Self::ArrayM(el) => el.fmt(f),
            Self::Array(el) => el.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_type_canonical() {
        fn check(declared: &str, canonical: &str) {
            let t: Type = declared.parse().expect("Parse type string");

            assert_eq!(t.to_string(), canonical);
        }

        let test_vector = [
            ("uint256", "uint256"),
            ("int8", "int8"),
            ("uint", "uint256"),
            ("int", "int256"),
            ("fixed", "fixed128x18"),
            ("ufixed", "ufixed128x18"),
            ("fixed128x16", "fixed128x16"),
            ("address", "address"),
            ("bool", "bool"),
            ("bytes", "bytes"),
            ("bytes24", "bytes24"),
            ("function", "function"),
            ("string", "string"),
            ("tuple", "tuple"),
            ("tuple[]", "tuple[]"),
            ("tuple[][32]", "tuple[][32]"),
            ("bool[20]", "bool[20]"),
            ("uint[2][]", "uint256[2][]"),
        ];

        for (declared, canonical) in test_vector {
            check(declared, canonical);
        }
    }

    #[test]
    fn test_invalid_types() {
        assert_eq!(
            "uint100".parse::<Type>(),
            Err(TypeError::IntegerM("uint100".to_owned()))
        );

        assert_eq!(
            "bytes33".parse::<Type>(),
            Err(TypeError::BytesM("bytes33".to_owned()))
        );

        assert_eq!(
            "ufixed100x18".parse::<Type>(),
            Err(TypeError::FixedMN("ufixed100x18".to_owned()))
        );

        assert_eq!(
            "mapping".parse::<Type>(),
            Err(TypeError::Unknown("mapping".to_owned()))
        );
    }

    #[test]
    fn test_nested_array() {
        let t: Type = "uint8[3][]".parse().unwrap();

        let Type::Array(array) = &t else {
            panic!("expect dynamic array");
        };

        assert_eq!(array.element.to_string(), "uint8[3]");

        let Type::ArrayM(inner) = &array.element else {
            panic!("expect fixed-length array");
        };

        assert_eq!(inner.m, 3);
        assert_eq!(inner.element.to_string(), "uint8");
    }

    #[test]
    fn test_field() {
        let data = r#"
        {
            "inputs": [
                {
                    "internalType": "address",
                    "name": "WETH_",
                    "type": "address"
                }
            ],
            "stateMutability": "nonpayable",
            "type": "constructor"
        }
        "#;

        let field = serde_json::from_str::<AbiField>(data).expect("Parse abi field");

        let AbiField::Constructor(constructor) = field else {
            panic!("expect constructor");
        };

        assert_eq!(constructor.signature(), "constructor(address)");
    }

    #[test]
    fn test_selector() {
        let transfer: Function = serde_json::from_str(
            r#"{
                "name": "transfer",
                "inputs": [
                    { "name": "to", "type": "address" },
                    { "name": "amount", "type": "uint256" }
                ],
                "outputs": [{ "name": "", "type": "bool" }],
                "stateMutability": "nonpayable"
            }"#,
        )
        .unwrap();

        assert_eq!(transfer.signature(), "transfer(address,uint256)");
        assert_eq!(selector(&transfer.signature()), "a9059cbb");
    }

    #[test]
    fn test_event_topic() {
        let event: Event = serde_json::from_str(
            r#"{
                "name": "Transfer",
                "anonymous": false,
                "inputs": [
                    { "name": "from", "type": "address", "indexed": true },
                    { "name": "to", "type": "address", "indexed": true },
                    { "name": "value", "type": "uint256", "indexed": false }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            topic(&event.signature()),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_tuple_signature() {
        let function: Function = serde_json::from_str(
            r#"{
                "name": "submit",
                "inputs": [
                    {
                        "name": "points",
                        "type": "tuple[]",
                        "internalType": "struct Geometry.Point[]",
                        "components": [
                            { "name": "x", "type": "uint256" },
                            { "name": "y", "type": "uint256" }
                        ]
                    },
                    { "name": "tag", "type": "bytes32" }
                ],
                "outputs": [],
                "stateMutability": "nonpayable"
            }"#,
        )
        .unwrap();

        assert_eq!(function.signature(), "submit((uint256,uint256)[],bytes32)");
    }
}
