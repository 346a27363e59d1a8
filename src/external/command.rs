//! Base command execution abstraction
//!
//! Provides the foundational trait for executing external commands (the
//! PlatformIO build tool in particular), enabling dependency injection for
//! testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

/// Trait for executing external commands
///
/// This abstraction allows the rest of the codebase to invoke the build tool
/// without directly depending on std::process::Command, enabling testing
/// with mock implementations.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError>;
}

/// Real implementation using std::process::Command
pub struct ProcessCommandExecutor;

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError> {
        use std::process::Command;

        let program = program.to_string();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let working_dir: PathBuf = working_dir.to_path_buf();

        // Builds can take minutes; keep the runtime responsive
        let output = tokio::task::spawn_blocking(move || {
            Command::new(&program)
                .args(&args)
                .current_dir(&working_dir)
                .output()
                .map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        CommandError::CommandNotFound { command: program }
                    } else {
                        CommandError::Io {
                            message: e.to_string(),
                        }
                    }
                })
        })
        .await
        .map_err(|e| CommandError::ExecutionFailed {
            message: e.to_string(),
        })??;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock executor keyed on "program arg1 arg2 ..." strings, recording
    /// every invocation for assertions.
    pub struct MockCommandExecutor {
        responses: HashMap<String, Result<CommandOutput, CommandError>>,
        pub invocations: Mutex<Vec<String>>,
    }

    impl MockCommandExecutor {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
                invocations: Mutex::new(Vec::new()),
            }
        }

        pub fn expect_command(
            mut self,
            program: &str,
            args: &[&str],
            response: Result<CommandOutput, CommandError>,
        ) -> Self {
            let key = format!("{} {}", program, args.join(" "));
            self.responses.insert(key, response);
            self
        }

        pub fn ok_output() -> CommandOutput {
            CommandOutput {
                status_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }
        }

        pub fn failed_output(stderr: &str) -> CommandOutput {
            CommandOutput {
                status_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            program: &str,
            args: &[&str],
            _working_dir: &Path,
        ) -> Result<CommandOutput, CommandError> {
            let key = format!("{} {}", program, args.join(" "));
            self.invocations.lock().unwrap().push(key.clone());
            self.responses
                .get(&key)
                .cloned()
                .unwrap_or(Err(CommandError::CommandNotFound {
                    command: program.to_string(),
                }))
        }
    }
}
