//! Component install/delete command.

use anyhow::Result;
use nginx_adapter_core::Component;
use nginx_adapter_deployer::ComponentDispatcher;
use tracing::info;

use super::{Action, backend, load_adapter_config, read_documents, report};

/// Install or delete every component in a file.
pub async fn run(config_path: &str, file: &str, action: Action, dry_run: bool) -> Result<()> {
    let config = load_adapter_config(config_path)?;
    let components: Vec<Component> = read_documents(file)?;
    if components.is_empty() {
        anyhow::bail!("No components found in {}", file);
    }

    let ops = backend(&config, dry_run).await?;
    info!(
        backend = ops.name(),
        count = components.len(),
        ?action,
        "Handling components"
    );

    let dispatcher = ComponentDispatcher::new(ops, &config);
    let outcome = dispatcher
        .handle_components(&components, action.is_delete())
        .await;
    report(outcome)
}
