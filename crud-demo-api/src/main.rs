use std::str::FromStr;

use clap::{Parser, Subcommand};
use crud_demo_api::{app, init_tracing, DemoConfig, Settings};
use crud_demo_data::{migration, SqliteGateway};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "crud-demo", version, about = "CRUD service for CrudDemo records")]
struct Cli {
    /// Configuration profile (application-{profile}.yaml)
    #[arg(long, default_value = "dev")]
    profile: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending schema migrations
    Migrate,
    /// Revert all schema migrations, dropping the table
    Rollback,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "crud-demo failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let config = DemoConfig::load(&cli.profile)?;
    let settings = Settings::from_config(&config)?;
    let pool = connect(&settings).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(pool, &settings).await,
        Commands::Migrate => Ok(migration::apply(&pool).await?),
        Commands::Rollback => Ok(migration::rollback(&pool).await?),
    }
}

async fn connect(settings: &Settings) -> Result<SqlitePool, BoxError> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

async fn serve(pool: SqlitePool, settings: &Settings) -> Result<(), BoxError> {
    if settings.auto_migrate {
        migration::apply(&pool).await?;
    }

    let router = app::build(SqliteGateway::new(pool));
    let listener = tokio::net::TcpListener::bind(settings.bind.as_str()).await?;
    tracing::info!(addr = %listener.local_addr()?, "crud-demo listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("crud-demo stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
