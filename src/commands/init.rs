/// Example configuration generation
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::ToolConfig;

/// Initialize example configuration file
pub async fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration file already exists: {}", path.display());
    }

    let example_config = ToolConfig::example();
    let yaml = serde_yaml::to_string(&example_config)?;

    tokio::fs::write(path, yaml)
        .await
        .context("Failed to write configuration file")?;

    info!("Example configuration created: {}", path.display());
    info!("");
    info!("Next steps:");
    info!("  1. Add the lifecycle steps your scripts provide under `steps`");
    info!("  2. List them:");
    info!("     iac-tool steps");
    info!("  3. Verify SSH access to the nodes:");
    info!("     iac-tool ssh verify");

    Ok(())
}
