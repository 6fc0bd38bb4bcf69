mod config;
mod error;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::process::ExitCode;

use axum::Router;
use clap::Parser;

use config::{Cli, Command, ConfigError, ConsumerConfig, HostConfig};
use services::exposes::ExposedModules;
use services::users::UserDirectory;
use state::{ConsumerState, HostState};

#[derive(Debug, thiserror::Error)]
enum ServeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client build failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; real env vars and flags still apply.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "federated-apps exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), ServeError> {
    match command {
        Command::Host(args) => {
            let config = HostConfig::try_from(args)?;
            let users = UserDirectory::seeded();
            tracing::info!(name = %config.name, users = users.len(), "starting host");
            let state = HostState::new(users, ExposedModules::with_counter(&config.name));
            serve(config.addr, routes::host_app(state)).await
        }
        Command::Consumer(args) => {
            let config = ConsumerConfig::try_from(args)?;
            tracing::info!(
                remote = %config.remote.name,
                origin = %config.remote.base_url,
                entry = %config.remote.entry_url,
                module = %config.module,
                "starting consumer"
            );
            let state = ConsumerState::from_config(&config)?;
            serve(config.addr, routes::consumer_app(state)).await
        }
    }
}

async fn serve(addr: SocketAddr, app: Router) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    tracing::info!(%addr, "federated-apps listening");
    axum::serve(listener, app).await.map_err(ServeError::Serve)
}
