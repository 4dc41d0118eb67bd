//! Application configuration command.

use anyhow::Result;
use nginx_adapter_core::{ApplicationConfiguration, HandleOutcome};
use nginx_adapter_deployer::ComponentDispatcher;
use tracing::info;

use super::{Action, backend, load_adapter_config, read_documents, report};

/// Apply the traits of every application configuration in a file.
pub async fn run(config_path: &str, file: &str, action: Action, dry_run: bool) -> Result<()> {
    let config = load_adapter_config(config_path)?;
    let app_configs: Vec<ApplicationConfiguration> = read_documents(file)?;
    if app_configs.is_empty() {
        anyhow::bail!("No application configuration found in {}", file);
    }

    let ops = backend(&config, dry_run).await?;
    let dispatcher = ComponentDispatcher::new(ops, &config);

    let mut outcome = HandleOutcome::new();
    for app in &app_configs {
        info!(configuration = %app.metadata.name, ?action, "Applying traits");
        outcome.extend(
            dispatcher
                .handle_application_configuration(app, action.is_delete())
                .await,
        );
    }
    report(outcome)
}
