//! Generates go bindings from foundry build artifacts.
//!
//! One run discovers the artifacts, groups their contracts into modules, writes one binding
//! file per module and exports the abis of [`EXPORT_MODULES`](export::EXPORT_MODULES) for blockscout.

use std::io::Write;

pub mod artifact;
pub mod config;
pub mod discover;
pub mod emit;
pub mod errors;
pub mod export;
pub mod module;

pub use config::Config;
pub use emit::{BindingGenerator, GoBindings};
pub use errors::{Error, Result};
pub use export::ExportOutcome;

/// Run the generator, printing progress to stdout.
pub fn run<G: BindingGenerator + ?Sized>(config: &Config, generator: &G) -> Result<ExportOutcome> {
    let stdout = std::io::stdout();

    run_with_output(config, generator, &mut stdout.lock())
}

/// Run the generator, printing progress to `output`.
pub fn run_with_output<G, W>(config: &Config, generator: &G, output: &mut W) -> Result<ExportOutcome>
where
    G: BindingGenerator + ?Sized,
    W: Write,
{
    let paths = discover::discover(&config.artifact_pattern())?;

    let registry = module::aggregate(paths)?;

    for name in registry.names() {
        writeln!(output, "{}", name)?;
    }

    let output_dir = config.output_dir();

    for (name, info) in registry.iter() {
        emit::emit_module(&output_dir, name, info, generator)?;
    }

    log::info!("generated {} modules into {:?}", registry.len(), output_dir);

    writeln!(output, "successfully generated go abi files")?;

    let outcome = export::export_abis(&registry, config.export_dir())?;

    match outcome {
        ExportOutcome::Exported => writeln!(output, "successfully exported abi files")?,
        ExportOutcome::Skipped => {
            writeln!(output, "skipping abi export since blockscout is not present")?
        }
    }

    Ok(outcome)
}
