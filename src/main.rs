//! kaspawallet command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   kaspawallet send ...                 GET /SendMoney?wallet=..&amount=..&password=..
//!          │                                         │
//!          │   (command task)          (HTTP task, local port)
//!          ▼                                         ▼
//!   ┌──────────────────────────── Dispatcher ─────────────────────────────┐
//!   │          Arc<WalletConfig> injected at construction, read-only       │
//!   └───────────────────────────────┬──────────────────────────────────────┘
//!                                   ▼
//!   ┌──────────────────────────── SendPipeline ────────────────────────────┐
//!   │ load keys → connect → parse amount → [build] → decrypt → sign → [broadcast] │
//!   │             [..] = bounded by its own freshly started deadline             │
//!   └────────────────────────────────────────────────────────────────────┘
//!          │                                         │
//!   stdout + exit code                        ResultEnvelope (JSON, HTTP 200)
//! ```

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use kaspawallet::config::{load_layered, ConfigError, ConfigOverrides, Network, WalletConfig};
use kaspawallet::lifecycle::{signals, Shutdown};
use kaspawallet::observability::{logging, metrics};
use kaspawallet::pipeline::amount::kas_to_sompi;
use kaspawallet::pipeline::{PasswordSource, PipelineOutcome};
use kaspawallet::routing::command_report;
use kaspawallet::{Dispatcher, HttpServer, SendPipeline};

#[derive(Parser)]
#[command(name = "kaspawallet", version)]
#[command(about = "Send funds through a Kaspa wallet daemon", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network the keys file and daemon belong to
    #[arg(long, global = true, value_enum)]
    network: Option<Network>,

    /// Keys file path
    #[arg(short = 'f', long, global = true)]
    keys_file: Option<PathBuf>,

    /// Wallet daemon address
    #[arg(short, long, global = true)]
    daemon_address: Option<String>,

    /// Do not start the local HTTP endpoint alongside the command
    #[arg(long, global = true)]
    no_http: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send funds to an address
    Send(SendArgs),
    /// Serve the HTTP endpoint until interrupted
    Serve,
}

#[derive(Args)]
struct SendArgs {
    /// Destination address
    #[arg(short, long)]
    to_address: String,

    /// Amount in KAS, up to 8 decimal places
    #[arg(short = 'v', long)]
    send_amount: String,

    /// Keys file password; prompted for when omitted
    #[arg(short, long)]
    password: Option<String>,

    /// Address to spend from (repeatable)
    #[arg(short = 'a', long = "from-address")]
    from_addresses: Vec<String>,

    /// Reuse an existing change address
    #[arg(short, long)]
    use_existing_change_address: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration errors are fatal before anything starts.
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.send.network,
        daemon_address = %config.send.daemon_address,
        "kaspawallet starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let config = Arc::new(config);
    let pipeline = SendPipeline::from_config(&config.send);
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&config), pipeline));
    let shutdown = Shutdown::new();

    match cli.command {
        Commands::Send(args) => {
            // The endpoint runs as an independent task for the lifetime of the command.
            let http = config.http.enabled.then(|| {
                let bind = config.http.bind_address.clone();
                let dispatcher = Arc::clone(&dispatcher);
                let stop = shutdown.signaled();
                tokio::spawn(async move {
                    if let Err(e) = serve_http(&bind, dispatcher, stop).await {
                        tracing::error!(address = %bind, error = %e, "HTTP endpoint failed");
                    }
                })
            });

            let code = run_send(&dispatcher, args).await;

            shutdown.trigger();
            if let Some(task) = http {
                let _ = task.await;
            }
            code
        }
        Commands::Serve => {
            tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));
            match serve_http(&config.http.bind_address, dispatcher, shutdown.signaled()).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Layer command-line flags over the config file (or defaults), then validate once.
fn build_config(cli: &Cli) -> Result<WalletConfig, ConfigError> {
    let mut overrides = ConfigOverrides {
        network: cli.network,
        keys_file: cli.keys_file.clone(),
        daemon_address: cli.daemon_address.clone(),
        disable_http: cli.no_http,
        ..Default::default()
    };
    if let Commands::Send(args) = &cli.command {
        overrides.from_addresses = args.from_addresses.clone();
        overrides.use_existing_change_address = args.use_existing_change_address;
    }
    load_layered(cli.config.as_deref(), &overrides)
}

async fn run_send(dispatcher: &Dispatcher, args: SendArgs) -> ExitCode {
    let sompi = match kas_to_sompi(&args.send_amount) {
        Ok(sompi) => sompi,
        Err(e) => {
            eprintln!("Error: invalid --send-amount: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let password = match args.password {
        Some(password) => PasswordSource::provided(password),
        None => PasswordSource::Prompt,
    };

    let outcome = match dispatcher
        .command("send", args.to_address, sompi.to_string(), password)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        PipelineOutcome::Success { tx_ids } => {
            print!("{}", command_report(&tx_ids));
            ExitCode::SUCCESS
        }
        PipelineOutcome::Failure { error } => {
            if let Some(hint) = error.remediation() {
                eprintln!("{}", hint);
            }
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

async fn serve_http<F>(bind: &str, dispatcher: Arc<Dispatcher>, shutdown: F) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind).await?;
    HttpServer::new(dispatcher).run(listener, shutdown).await
}
