use anyhow::Context;
use appleui_mcp::configuration::{get_configuration_from, TransportMode};
use appleui_mcp::startup::run;
use appleui_mcp::telemetry::{get_subscriber, init_subscriber};
use clap::Parser;
use std::net::TcpListener;

#[derive(Parser, Debug)]
#[command(
    name = "appleui-mcp",
    version,
    about = "MCP server exposing Apple design review, component and style-guide tools"
)]
struct Cli {
    /// Configuration file name without extension
    #[arg(long, env = "APPLEUI_CONFIG", default_value = "configuration")]
    config: String,
    /// Override transport.mode from the configuration
    #[arg(long, value_enum)]
    transport: Option<TransportMode>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("appleui-mcp".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let mut settings = get_configuration_from(&cli.config).context("Failed to read configuration")?;
    if let Some(mode) = cli.transport {
        settings.transport.mode = mode;
    }

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener =
        TcpListener::bind(&address).with_context(|| format!("failed to bind to {}", address))?;

    run(listener, settings).await?.await?;
    Ok(())
}
