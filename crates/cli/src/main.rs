mod config;
mod run;
mod smoke;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use vitro_sandbox::{HeadlessBackend, Playground, detect};

#[derive(Parser)]
#[command(name = "vitro", about = "vitro — sandboxed HTML/JS playground")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "VITRO_LOG", default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Path to a config file (overrides discovery).
    #[arg(long, global = true, env = "VITRO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the playground server (default when no subcommand is provided).
    Serve,
    /// Render a file once and print its console output.
    Run {
        /// HTML/JS file to render.
        file: PathBuf,
        /// How long to wait for console output, in milliseconds.
        #[arg(long, default_value_t = 1500)]
        wait_ms: u64,
    },
    /// Render a known snippet end to end and report PASS or FAIL.
    Smoke,
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

    let config = config::load(cli.config.as_deref());

    match cli.command {
        // Default: serve the playground when no subcommand is provided.
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "vitro starting");
            detect::check_and_warn(config.sandbox.executable.as_deref());

            let bind = cli.bind.unwrap_or(config.server.bind);
            let port = cli.port.unwrap_or(config.server.port);

            let backend = Arc::new(HeadlessBackend::new(config.sandbox.clone()));
            let playground = Arc::new(Playground::new(backend, &config.sandbox));
            vitro_gateway::start_server(&bind, port, playground).await
        },
        Some(Commands::Run { file, wait_ms }) => {
            run::run_file(&file, wait_ms, &config.sandbox).await
        },
        Some(Commands::Smoke) => {
            if !smoke::run(&config.sandbox).await {
                std::process::exit(2);
            }
            Ok(())
        },
    }
}
