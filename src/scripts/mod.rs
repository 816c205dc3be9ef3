/// Lifecycle script steps and how they are run
pub mod runner;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use runner::{ScriptRunner, ShellScriptRunner};

/// The script backing a step is not on disk
#[derive(Debug, Error)]
#[error("Script not found at {}", .path.display())]
pub struct MissingScriptError {
    pub path: PathBuf,
}

/// Fail fast when `script` does not exist, before anything is spawned
pub fn ensure_script_exists(script: &Path) -> Result<(), MissingScriptError> {
    if script.exists() {
        Ok(())
    } else {
        Err(MissingScriptError {
            path: script.to_path_buf(),
        })
    }
}
