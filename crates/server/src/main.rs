use database::db::create_connection;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use server::{app, config::Config, state::AppState, utils::shutdown::shutdown_signal};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = create_connection(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let bind_address = config.bind_address;
    let state = AppState::new(db, config)?;

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Running axum on http://{bind_address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
