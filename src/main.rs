use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Duration;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rollcall_api::app::{self, AppState};
use rollcall_api::auth::{generate_jwt, Claims};
use rollcall_api::config::{self, StorageBackend};
use rollcall_api::database::{DatabaseManager, MemoryStore, PgSnapshotSource, SnapshotSource};
use rollcall_api::is_development;
use rollcall_api::security::RoleGrant;

#[derive(Parser)]
#[command(name = "rollcall-api")]
#[command(about = "Rollcall API - read-only member summaries with tenant-aware access control")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Use the in-memory store seeded with demo data")]
        memory: bool,
        #[arg(long, help = "Port to listen on (overrides ROLLCALL_PORT / PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Mint a bearer token signed with the configured secret")]
    Token {
        #[arg(long, help = "User name carried in the token")]
        user: String,
        #[arg(long, help = "User id (random if omitted)")]
        sub: Option<Uuid>,
        #[arg(long = "grant", help = "Role grant, ROLE or ROLE:TENANT_UUID (repeatable)")]
        grants: Vec<RoleGrant>,
        #[arg(long, help = "Token lifetime in hours (defaults to configured expiry)")]
        hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rollcall_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { memory, port } => serve(memory, port).await,
        Commands::Token { user, sub, grants, hours } => token(user, sub, grants, hours),
    }
}

async fn serve(memory: bool, port: Option<u16>) -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting Rollcall API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set outside development");
    }
    if is_development!() {
        tracing::warn!("Using development settings; do not expose this instance");
    }

    let backend = if memory { StorageBackend::Memory } else { config.storage.backend };
    let source: Arc<dyn SnapshotSource> = match backend {
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            for tenant in store.seed_demo().await {
                tracing::info!(tenant_id = %tenant.id, name = %tenant.name, "seeded demo tenant");
            }
            Arc::new(store)
        }
        StorageBackend::Postgres => Arc::new(
            PgSnapshotSource::connect()
                .await
                .context("failed to connect to PostgreSQL")?,
        ),
    };

    let port = port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Rollcall API listening on http://{}", bind_addr);
    app::serve(listener, AppState::new(source)).await?;

    DatabaseManager::close().await;
    Ok(())
}

fn token(user: String, sub: Option<Uuid>, grants: Vec<RoleGrant>, hours: Option<i64>) -> anyhow::Result<()> {
    let sub = sub.unwrap_or_else(Uuid::new_v4);
    let claims = match hours {
        Some(hours) => Claims::with_expiry(sub, user, grants, Duration::hours(hours)),
        None => Claims::new(sub, user, grants),
    };

    let token = generate_jwt(&claims).context("failed to sign token")?;
    println!("{}", token);
    Ok(())
}
