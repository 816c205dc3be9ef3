/// Running and listing configured lifecycle steps
use anyhow::{Context, Result};
use tracing::info;

use crate::config::ToolConfig;
use crate::scripts::{ensure_script_exists, ScriptRunner};

/// Run a configured step by name
pub async fn run_step<R: ScriptRunner>(config: &ToolConfig, runner: &R, name: &str) -> Result<()> {
    let step = config.step(name)?;

    info!("Executing step '{}'...", name);

    ensure_script_exists(&step.script)?;

    runner
        .run_named_step(&step.script, &step.function)
        .await
        .with_context(|| format!("Step '{}' failed", name))?;

    info!("✓ Step '{}' completed successfully", name);

    Ok(())
}

/// One line per step: name, function, script and description
pub fn describe_steps(config: &ToolConfig) -> Vec<String> {
    config
        .steps
        .iter()
        .map(|(name, step)| {
            let mut line = format!(
                "{} -> {} ({})",
                name,
                step.function,
                step.script.display()
            );
            if let Some(description) = &step.description {
                line.push_str(": ");
                line.push_str(description);
            }
            line
        })
        .collect()
}

/// Show configured steps
pub fn list_steps(config: &ToolConfig) -> Result<()> {
    info!("Interpreter: {}", config.get_interpreter());
    info!("Steps:");
    for line in describe_steps(config) {
        info!("  - {}", line);
    }
    Ok(())
}
