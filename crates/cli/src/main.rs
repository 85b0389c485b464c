mod config_commands;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "glimpse", about = "Glimpse — chat demo with visual web browsing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat gateway (default when no subcommand is provided).
    Gateway,
    /// Start the browser automation service.
    Browser,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "glimpse starting");

    match cli.command {
        None | Some(Commands::Gateway) => {
            let mut config = glimpse_config::discover_and_load();
            if let Some(bind) = cli.bind {
                config.gateway.bind = bind;
            }
            if let Some(port) = cli.port {
                config.gateway.port = port;
            }
            glimpse_gateway::start_gateway(&config).await
        },
        Some(Commands::Browser) => {
            let mut config = glimpse_config::discover_and_load();
            if let Some(bind) = cli.bind {
                config.browser_service.bind = bind;
            }
            if let Some(port) = cli.port {
                config.browser_service.port = port;
            }
            glimpse_browser::start_service(&config).await
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action),
    }
}
