//! Aggregation of artifacts into binding modules.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;

use crate::{
    artifact::FoundryArtifact,
    errors::{Error, Result},
};

/// Contracts generated into one binding package.
///
/// The three sequences always have the same length, index `i` of each describes the same contract.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    contract_names: Vec<String>,
    abis: Vec<String>,
    bytecodes: Vec<String>,
}

impl ModuleInfo {
    /// Append one entry per compilation target of `artifact`.
    ///
    /// Every entry shares the artifact's abi and bytecode.
    pub fn add_artifact(&mut self, artifact: &FoundryArtifact) -> Result<()> {
        let abi = artifact.serialized_abi()?;

        for name in artifact.contract_names() {
            log::trace!("add contract {}", name);

            self.contract_names.push(name.to_owned());
            self.abis.push(abi.clone());
            self.bytecodes.push(artifact.bytecode.object.clone());
        }

        Ok(())
    }

    /// Write `<dest>/<contract>.abi` for every contract of this module.
    pub fn export_abis<P: AsRef<Path>>(&self, dest: P) -> Result<()> {
        let dest = dest.as_ref();

        for (name, abi) in self.contract_names.iter().zip(&self.abis) {
            let path = dest.join(format!("{}.abi", name));

            log::debug!("export abi {:?}", path);

            fs::write(&path, format!("{}\n", abi)).map_err(|source| Error::Write { path, source })?;
        }

        Ok(())
    }

    pub fn contract_names(&self) -> &[String] {
        &self.contract_names
    }

    pub fn abis(&self) -> &[String] {
        &self.abis
    }

    pub fn bytecodes(&self) -> &[String] {
        &self.bytecodes
    }

    pub fn len(&self) -> usize {
        self.contract_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contract_names.is_empty()
    }
}

/// Derive the module name of the artifact at `path`.
///
/// The name is the directory two levels above the file, with `-` replaced by `_` and suffixed `gen`.
pub fn module_name<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    let dir = path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::ModuleName(path.to_path_buf()))?;

    Ok(format!("{}gen", dir.replace('-', "_")))
}

/// Modules by name, in first-seen order.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<String, ModuleInfo>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add the artifact loaded from `path` to its module, creating the module on first use.
    pub fn add<P: AsRef<Path>>(&mut self, path: P, artifact: &FoundryArtifact) -> Result<()> {
        let module = module_name(path)?;

        self.modules.entry(module).or_default().add_artifact(artifact)
    }

    pub fn get(&self, module: &str) -> Option<&ModuleInfo> {
        self.modules.get(module)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleInfo)> {
        self.modules.iter().map(|(name, info)| (name.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Load every artifact of `paths` into a new registry, in order.
pub fn aggregate<I>(paths: I) -> Result<ModuleRegistry>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut registry = ModuleRegistry::new();

    for path in paths {
        log::trace!("load artifact {:?}", path);

        let artifact = FoundryArtifact::load(&path)?;

        registry.add(&path, &artifact)?;
    }

    Ok(registry)
}
