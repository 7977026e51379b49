//! Exhibit command-line entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use exhibit::a2a::server::{GatewayParams, start_server};
use exhibit::config::{AppConfig, default_config_path};

#[derive(Debug, Parser)]
#[command(name = "exhibit", version, about = "A2A gateway for the Exhibit portfolio agent")]
struct Cli {
    /// Path to a TOML config file (default: ~/.exhibit/config.toml)
    #[arg(long, global = true, env = "EXHIBIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the A2A gateway
    Serve {
        /// Address to bind (overrides gateway.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides gateway.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the agents the gateway exposes
    Agents,
    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Load configuration and install logging. The guard must outlive the command.
fn setup(
    path: Option<&Path>,
) -> anyhow::Result<(AppConfig, Option<tracing_appender::non_blocking::WorkerGuard>)> {
    let config = AppConfig::load(path)?;
    let guard = exhibit::logging::init(&config.logging)?;
    Ok((config, guard))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, port } => {
            let (config, _log_guard) = setup(cli.config.as_deref())?;
            let registry = exhibit::build_registry(&config);
            let agent_ids = registry.ids();
            let gateway = exhibit::build_gateway(&config, registry);
            let params = GatewayParams {
                bind: bind.unwrap_or_else(|| config.gateway.bind.clone()),
                port: port.unwrap_or(config.gateway.port),
                enabled: config.gateway.enabled,
            };
            start_server(&params, gateway, agent_ids).await?;
        }
        Command::Agents => {
            let (config, _log_guard) = setup(cli.config.as_deref())?;
            for agent_id in exhibit::build_registry(&config).ids() {
                println!("{}", agent_id);
            }
        }
        Command::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(default_config_path);
            AppConfig::write_default(&path, force)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
