//! Error types and utilities.

use std::path::PathBuf;

use solgen_bind::BindError;

/// solgen error variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("read artifact of {contract} from {path:?}: {source}")]
    Read {
        path: PathBuf,
        contract: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode artifact of {contract}: {source}")]
    Decode {
        contract: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't derive module name from {0:?}")]
    ModuleName(PathBuf),

    #[error("generate bindings of module {module}: {source}")]
    Bind {
        module: String,
        #[source]
        source: BindError,
    },
}

/// Result type returns by solgen functions.
pub type Result<T> = std::result::Result<T, Error>;
