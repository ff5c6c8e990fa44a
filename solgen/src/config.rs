//! Command line configuration.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::discover;

/// Default artifact glob, relative to the parent of the root directory.
pub const DEFAULT_ARTIFACTS: &str = "contracts/out/*/*.json";

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Generates go bindings from foundry build artifacts and exports abi files for blockscout"
)]
pub struct Config {
    /// The root directory, bindings are written to `<root>/go`.
    #[arg(long, default_value = env!("CARGO_MANIFEST_DIR"))]
    pub root: PathBuf,

    /// Artifact glob pattern, relative to the parent of the root directory.
    #[arg(long, default_value = DEFAULT_ARTIFACTS)]
    pub artifacts: String,

    /// Use verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// The parent of the root directory, artifacts and the blockscout checkout live there.
    pub fn parent(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    pub fn artifact_pattern(&self) -> String {
        discover::artifact_pattern(self.parent(), &self.artifacts)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("go")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.parent().join("blockscout").join("init").join("data")
    }
}
