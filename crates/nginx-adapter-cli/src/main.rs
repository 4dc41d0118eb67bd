//! NGINX service mesh adapter CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Action;

#[derive(Parser)]
#[command(name = "nginx-adapter")]
#[command(about = "Apply OAM components to the NGINX service mesh", long_about = None)]
struct Cli {
    /// Adapter configuration file
    #[arg(long, env = "NGINX_ADAPTER_CONFIG", default_value = "adapter.kdl")]
    config: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install or delete OAM components
    Components {
        /// YAML or JSON file with one or more components
        file: String,
        /// Operation to perform (install or delete)
        #[arg(long, default_value = "install")]
        action: Action,
        /// Log the operations instead of touching the cluster
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply the traits of an application configuration
    Configuration {
        /// YAML or JSON application configuration
        file: String,
        /// Operation to perform (install or delete)
        #[arg(long, default_value = "install")]
        action: Action,
        /// Log the operations instead of touching the cluster
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the manifests core components would produce
    Render {
        /// YAML or JSON file with one or more components
        file: String,
    },
    /// Validate an adapter configuration
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "adapter.kdl")]
        path: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Commands::Components {
            file,
            action,
            dry_run,
        } => {
            commands::components::run(&cli.config, &file, action, dry_run).await?;
        }
        Commands::Configuration {
            file,
            action,
            dry_run,
        } => {
            commands::configuration::run(&cli.config, &file, action, dry_run).await?;
        }
        Commands::Render { file } => {
            commands::render(&cli.config, &file)?;
        }
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
    }

    Ok(())
}
