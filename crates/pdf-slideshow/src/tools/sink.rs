use crate::types::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Sink for the stdout and stderr of external tools
#[derive(Debug)]
pub struct ToolLog {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl ToolLog {
    /// Truncate or create the log file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            file: Some(file),
            path: Some(path),
        })
    }

    /// Drop all tool output
    pub fn discard() -> Self {
        Self {
            file: None,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A handle for one child process stream
    pub fn stdio(&self) -> Stdio {
        match self.file.as_ref().map(File::try_clone) {
            Some(Ok(file)) => Stdio::from(file),
            Some(Err(e)) => {
                log::warn!("Tool log unavailable: {}", e);
                Stdio::null()
            }
            None => Stdio::null(),
        }
    }
}
