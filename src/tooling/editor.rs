//! External editor collaborator.

use crate::error::KegError;
use crate::lifecycle::NodeEditor;
use std::path::Path;
use std::process::Command;

/// Runs an external editor command on the content file and waits for it.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    program: String,
    args: Vec<String>,
}

impl CommandEditor {
    /// Editor from an explicit command line, e.g. `"code --wait"`.
    pub fn new(command: &str) -> Result<Self, KegError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| KegError::ConfigError("Editor command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Editor from `$VISUAL`, then `$EDITOR`.
    pub fn from_env() -> Result<Self, KegError> {
        let command = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                KegError::ConfigError(
                    "No editor specified and $EDITOR not set. Use --editor <editor>".to_string(),
                )
            })?;
        Self::new(&command)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl NodeEditor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<(), KegError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| KegError::ConfigError(format!("Failed to open editor {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(KegError::ConfigError(format!(
                "Editor {} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}
