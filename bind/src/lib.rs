//! Solidity abi binder framework.
//!
//! [`bind_module`] turns a set of compiled contracts into one source file of the target language.

pub mod binder;
pub mod gogen;
pub mod mapping;
pub mod typedef;

pub use binder::BindError;

use binder::{bind, BinderContext};
use gogen::{go_mapping, GoBinder};
use typedef::AbiField;

/// Target languages of [`bind_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Go,
}

impl Lang {
    /// File extension of generated source files.
    pub fn extension(&self) -> &'static str {
        match self {
            Lang::Go => "go",
        }
    }
}

/// Generate the binding source of one package.
///
/// `names`, `abis` and `bytecodes` are parallel sequences, index `i` of each describes the same contract.
/// An empty bytecode suppresses the deploy function of that contract.
pub fn bind_module(
    names: &[String],
    abis: &[String],
    bytecodes: &[String],
    package: &str,
    lang: Lang,
) -> Result<String, BindError> {
    if names.len() != abis.len() || names.len() != bytecodes.len() {
        return Err(BindError::LengthMismatch {
            names: names.len(),
            abis: abis.len(),
            bytecodes: bytecodes.len(),
        });
    }

    let fields = names
        .iter()
        .zip(abis)
        .map(|(name, abi)| {
            serde_json::from_str::<Vec<AbiField>>(abi).map_err(|source| BindError::Abi {
                contract: name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let contracts = names
        .iter()
        .zip(abis)
        .zip(bytecodes)
        .zip(&fields)
        .map(|(((name, abi), bytecode), fields)| {
            BinderContext::new(name, abi, fields, Some(bytecode.as_str()))
        })
        .collect::<Vec<_>>();

    match lang {
        Lang::Go => bind(&contracts, package, GoBinder::new(go_mapping()?)),
    }
}
