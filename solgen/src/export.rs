//! Abi export for the blockscout indexer.

use std::path::Path;

use crate::{errors::Result, module::ModuleRegistry};

/// Modules whose abis are exported.
pub const EXPORT_MODULES: [&str; 2] = ["precompilesgen", "node_interfacegen"];

/// Result of [`export_abis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported,
    /// The destination directory does not exist, nothing was written.
    Skipped,
}

/// Export the abis of [`EXPORT_MODULES`] into `dest`, if `dest` exists.
pub fn export_abis<P: AsRef<Path>>(registry: &ModuleRegistry, dest: P) -> Result<ExportOutcome> {
    let dest = dest.as_ref();

    if !dest.exists() {
        log::debug!("export directory {:?} not found", dest);
        return Ok(ExportOutcome::Skipped);
    }

    for module in EXPORT_MODULES {
        match registry.get(module) {
            Some(info) => info.export_abis(dest)?,
            None => log::warn!("module {} not found, skip abi export", module),
        }
    }

    Ok(ExportOutcome::Exported)
}
