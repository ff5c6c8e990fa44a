//! Foundry build artifacts, the `forge build` output of one contract file.

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// The subset of a foundry artifact consumed by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundryArtifact {
    /// Abi items, kept opaque.
    pub abi: Vec<serde_json::Value>,
    pub bytecode: Bytecode,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bytecode {
    /// Hex encoded creation code, empty for abstract contracts and interfaces.
    pub object: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// source file id -> contract name, in file order.
    #[serde(rename = "compilationTarget")]
    pub compilation_target: IndexMap<String, String>,
}

impl FoundryArtifact {
    /// Read and decode the artifact file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contract = contract_file_name(path);

        let data = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            contract: contract.clone(),
            source,
        })?;

        serde_json::from_slice(&data).map_err(|source| Error::Decode { contract, source })
    }

    /// Returns the abi as compact json text.
    pub fn serialized_abi(&self) -> Result<String> {
        serde_json::to_string(&self.abi).map_err(|source| Error::Decode {
            contract: self.contract_names().collect::<Vec<_>>().join(","),
            source,
        })
    }

    /// Contract names declared by the compilation target, in file order.
    pub fn contract_names(&self) -> impl Iterator<Item = &str> {
        self.metadata
            .settings
            .compilation_target
            .values()
            .map(String::as_str)
    }
}

/// The artifact file name without its `.json` extension.
fn contract_file_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
