/// Process execution for the lifecycle scripts
use std::fmt;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failure to run an external command
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The child process could not be started
    #[error("failed to execute command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process ran but did not exit cleanly
    #[error("failed to execute command `{command}`: {status}")]
    Failed { command: String, status: ExitStatus },
}

/// A single program invocation: the program and its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    /// Create a new invocation with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Diagnostic line written to stderr before the child is spawned
    pub fn banner(&self) -> String {
        format!(">>> Executing: {}", self)
    }

    /// Run the invocation with inherited stdio and wait for it to exit
    ///
    /// Output is not captured: the child writes straight to this process's
    /// stdout and stderr. There is no timeout.
    pub async fn execute(self) -> Result<(), ExecutionError> {
        eprintln!("{}", self.banner());

        debug!("Spawning {} with {} argument(s)", self.program, self.args.len());

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| ExecutionError::Spawn {
                command: self.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ExecutionError::Failed {
                command: self.to_string(),
                status,
            });
        }

        debug!("{} exited successfully", self.program);

        Ok(())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Execute `program` with `args`, streaming its output live
pub async fn execute<I, S>(program: &str, args: I) -> Result<(), ExecutionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Invocation::new(program).args(args).execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_program_and_args_in_order() {
        let invocation = Invocation::new("bash")
            .args(["-c", "source ./scripts/utils_ssh.sh && prompt_verify_ssh"]);

        assert_eq!(
            invocation.banner(),
            ">>> Executing: bash -c source ./scripts/utils_ssh.sh && prompt_verify_ssh"
        );
        assert_eq!(invocation.banner().matches("bash").count(), 1);
    }

    #[test]
    fn test_banner_without_args() {
        assert_eq!(Invocation::new("true").banner(), ">>> Executing: true");
    }

    #[tokio::test]
    async fn test_execute_success() {
        let result = execute("sh", ["-c", "exit 0"]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_nonzero_exit_names_command() {
        let err = execute("sh", ["-c", "exit 3"]).await.unwrap_err();

        match &err {
            ExecutionError::Failed { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "failed to execute command `sh -c exit 3`: exit status: 3"
        );
    }

    #[tokio::test]
    async fn test_execute_missing_program() {
        let err = execute("iac-tool-no-such-program", Vec::<String>::new())
            .await
            .unwrap_err();

        match &err {
            ExecutionError::Spawn { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected Spawn, got {:?}", other),
        }
        assert!(err.to_string().contains("iac-tool-no-such-program"));
    }

    #[tokio::test]
    async fn test_args_are_not_shell_interpreted() {
        // "$HOME" must reach the child unexpanded
        let result = execute("sh", ["-c", r#"test "$1" = '$HOME'"#, "sh", "$HOME"]).await;
        assert!(result.is_ok());
    }
}
