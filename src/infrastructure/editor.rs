//! External editor for composing entry notes

use crate::error::{Result, WorklogError};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Session for composing text in an external editor
pub struct EditorSession {
    command: String,
}

impl EditorSession {
    /// Create a new editor session with the given command
    pub fn new(editor_command: String) -> Self {
        EditorSession {
            command: editor_command,
        }
    }

    /// Write `initial` to `scratch`, open it in the editor, wait for the
    /// editor to exit and return what was saved.
    ///
    /// The scratch file is removed afterwards.
    pub fn compose(&self, scratch: &Path, initial: &str) -> Result<String> {
        fs::write(scratch, initial)?;
        let outcome = self.wait_for(scratch).and_then(|_| {
            fs::read_to_string(scratch).map_err(WorklogError::Io)
        });
        if let Err(e) = fs::remove_file(scratch) {
            debug!("Could not remove {}: {}", scratch.display(), e);
        }
        outcome
    }

    fn wait_for(&self, file_path: &Path) -> Result<()> {
        let (program, mut args) = self.parse_command();
        args.push(file_path.to_string_lossy().to_string());
        debug!(program = %program, "Launching editor");

        // On Windows, use cmd /c to ensure .bat and .cmd files are found
        #[cfg(windows)]
        let status = Command::new("cmd")
            .arg("/C")
            .arg(&program)
            .args(&args)
            .status();

        #[cfg(not(windows))]
        let status = Command::new(&program).args(&args).status();

        let status = status.map_err(|e| {
            WorklogError::Editor(format!("Failed to launch editor '{}': {}", program, e))
        })?;
        if !status.success() {
            return Err(WorklogError::Editor(format!(
                "Editor '{}' exited with {}",
                program, status
            )));
        }
        Ok(())
    }

    /// Parse command into program and arguments
    fn parse_command(&self) -> (String, Vec<String>) {
        let parts: Vec<&str> = self.command.split_whitespace().collect();

        if parts.is_empty() {
            let fallback = if cfg!(windows) { "notepad" } else { "vi" };
            return (fallback.to_string(), vec![]);
        }

        let program = parts[0].to_string();
        let args = parts[1..].iter().map(|s| s.to_string()).collect();

        (program, args)
    }
}
