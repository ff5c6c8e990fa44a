//! Binding generation and emission.

use std::{fs, path::Path};

use solgen_bind::{bind_module, BindError, Lang};

use crate::{
    errors::{Error, Result},
    module::ModuleInfo,
};

/// The binding generator invoked once per module.
pub trait BindingGenerator {
    /// Generate the binding source of `module`.
    fn generate(
        &self,
        names: &[String],
        abis: &[String],
        bytecodes: &[String],
        module: &str,
    ) -> std::result::Result<String, BindError>;

    /// The target language of generated sources.
    fn lang(&self) -> Lang;
}

/// Generates go-ethereum style bindings.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoBindings;

impl BindingGenerator for GoBindings {
    fn generate(
        &self,
        names: &[String],
        abis: &[String],
        bytecodes: &[String],
        module: &str,
    ) -> std::result::Result<String, BindError> {
        bind_module(names, abis, bytecodes, module, Lang::Go)
    }

    fn lang(&self) -> Lang {
        Lang::Go
    }
}

/// Generate the bindings of `module` and write them to `<output_dir>/<module>/<module>.<ext>`.
pub fn emit_module<P: AsRef<Path>, G: BindingGenerator + ?Sized>(
    output_dir: P,
    module: &str,
    info: &ModuleInfo,
    generator: &G,
) -> Result<()> {
    let code = generator
        .generate(info.contract_names(), info.abis(), info.bytecodes(), module)
        .map_err(|source| Error::Bind {
            module: module.to_owned(),
            source,
        })?;

    let folder = output_dir.as_ref().join(module);

    fs::create_dir_all(&folder).map_err(|source| Error::CreateDir {
        path: folder.clone(),
        source,
    })?;

    let path = folder.join(format!("{}.{}", module, generator.lang().extension()));

    log::debug!("write bindings {:?}", path);

    fs::write(&path, code).map_err(|source| Error::Write { path, source })?;

    log::trace!("module {}: {} contracts", module, info.len());

    Ok(())
}
