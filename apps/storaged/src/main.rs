use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nodekit_bootstrap::{AppConfig, CliArgs};
use nodekit_context::{BootstrapError, Bootstrapper};
use std::path::PathBuf;
use tokio::net::TcpListener;

/// storaged - storage cluster node daemon
#[derive(Parser)]
#[command(name = "storaged")]
#[command(about = "storaged - storage cluster node daemon")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap the node and serve the admin API
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // defaults -> YAML (if provided) -> env (STORAGED__*) -> CLI overrides
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    nodekit_bootstrap::init_logging(&config.logging);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Normalizes the state dir without creating it
    Bootstrapper::from_config(config)?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_daemon(config: &AppConfig) -> Result<()> {
    tracing::info!("storaged starting");

    let bootstrapper = Bootstrapper::from_config(config)?;
    let ctx = bootstrapper.init().await.inspect_err(report_bootstrap_failure)?;

    let listener = TcpListener::bind(config.admin.listen_addr)
        .await
        .with_context(|| format!("failed to bind admin API on {}", config.admin.listen_addr))?;

    tracing::info!(node_id = %ctx.node_id(), "Node ready");
    ctx.admin_api().serve(listener, shutdown_signal()).await?;

    tracing::info!("storaged stopped");
    Ok(())
}

fn report_bootstrap_failure(err: &BootstrapError) {
    match err.degraded_context() {
        Some(ctx) => tracing::error!(
            node_id = %ctx.node_id(),
            error = %err,
            "Bootstrap aborted without a coordination client; exiting"
        ),
        None => tracing::error!(error = %err, "Bootstrap failed; exiting"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = nodekit_bootstrap::wait_for_shutdown().await {
        tracing::warn!(
            error = %e,
            "shutdown: primary waiter failed, falling back to ctrl_c()"
        );
        tokio::signal::ctrl_c().await.ok();
    }
}
