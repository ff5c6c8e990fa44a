//! Artifact file discovery.

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// File name marker of debug companion files written next to artifacts.
pub const DEBUG_MARKER: &str = ".dbg.json";

/// Returns true if `path` names a debug artifact, which is never parsed.
pub fn is_debug_artifact<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().to_string_lossy().contains(DEBUG_MARKER)
}

/// Expand the glob `pattern` into the artifact files to load, sorted lexically.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    log::debug!("discover artifacts, pattern={}", pattern);

    let mut paths = vec![];

    for entry in glob::glob(pattern)? {
        let path = entry?;

        if is_debug_artifact(&path) {
            log::trace!("skip debug artifact {:?}", path);
            continue;
        }

        paths.push(path);
    }

    log::info!("discovered {} artifacts", paths.len());

    Ok(paths)
}

/// Build the glob pattern of `relative` under `root`, `root` is matched literally.
pub fn artifact_pattern<P: AsRef<Path>>(root: P, relative: &str) -> String {
    let root = glob::Pattern::escape(&root.as_ref().to_string_lossy());

    Path::new(&root).join(relative).to_string_lossy().into_owned()
}
