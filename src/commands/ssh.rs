/// SSH related workflows
use anyhow::{Context, Result};
use tracing::info;

use crate::config::{ToolConfig, SSH_VERIFY_STEP};
use crate::scripts::{ensure_script_exists, ScriptRunner};

/// Verify SSH connectivity to all VM nodes
///
/// Sources the SSH utilities script and calls its verification function.
/// The script must exist before anything is spawned.
pub async fn verify<R: ScriptRunner>(config: &ToolConfig, runner: &R) -> Result<()> {
    info!("Executing SSH verification workflow...");

    let step = config.step(SSH_VERIFY_STEP)?;
    ensure_script_exists(&step.script)?;

    runner
        .run_named_step(&step.script, &step.function)
        .await
        .context("SSH verification script failed")?;

    info!("✓ SSH verification workflow completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::RecordingRunner;
    use crate::config::StepConfig;
    use std::path::PathBuf;

    fn config_with_script(script: PathBuf) -> ToolConfig {
        let mut config = ToolConfig::default();
        config.steps.insert(
            SSH_VERIFY_STEP.to_string(),
            StepConfig {
                script,
                ..StepConfig::ssh_verify()
            },
        );
        config
    }

    #[tokio::test]
    async fn test_verify_missing_script_does_not_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_script(dir.path().join("utils_ssh.sh"));
        let runner = RecordingRunner::succeeding();

        let err = verify(&config, &runner).await.unwrap_err();

        assert!(err.to_string().starts_with("Script not found at "));
        assert!(runner.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_verify_runs_prompt_verify_ssh() {
        let script = tempfile::NamedTempFile::new().unwrap();
        let config = config_with_script(script.path().to_path_buf());
        let runner = RecordingRunner::succeeding();

        verify(&config, &runner).await.unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, script.path());
        assert_eq!(calls[0].1, "prompt_verify_ssh");
    }

    #[tokio::test]
    async fn test_verify_failure_is_reported() {
        let script = tempfile::NamedTempFile::new().unwrap();
        let config = config_with_script(script.path().to_path_buf());
        let runner = RecordingRunner::failing(1);

        let err = verify(&config, &runner).await.unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.starts_with("SSH verification script failed: "));
        assert!(message.contains("prompt_verify_ssh"));
    }
}
