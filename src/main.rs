use anyhow::{Context, Result};
use clap::Parser;
use duel::cli::{Cli, Commands, Config, ConfigCommand};
use duel::game::Matchmaker;
use duel::network::Server;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load_or_create_default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Config { command } => match command {
            ConfigCommand::Path => {
                let path = Config::default_config_file()?;
                println!("{}", path.display());
            }
            ConfigCommand::Show => {
                let config = load_config(&cli)?;
                print!("{}", config.to_toml()?);
            }
        },
        Commands::Serve { bind, clock_ticks } => {
            let mut config = load_config(&cli).context("Failed to initialize configuration")?;
            config
                .apply_overrides(bind.as_deref(), *clock_ticks)
                .context("Invalid command-line override")?;
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting server on {}", config.bind_addr);
    let shutdown = CancellationToken::new();

    let (matchmaker, handle) = Matchmaker::new(config.session(), shutdown.clone());
    let matchmaker_task = tokio::spawn(matchmaker.run());

    let server = Server::bind(&config.bind_addr, config.server_settings()).await?;
    let server_task = tokio::spawn(server.run(handle, shutdown.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested, ending all sessions");
    shutdown.cancel();

    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server stopped with error: {}", e),
        Err(e) => error!("Server task panicked: {}", e),
    }
    if let Err(e) = matchmaker_task.await {
        error!("Matchmaker task panicked: {}", e);
    }
    Ok(())
}
