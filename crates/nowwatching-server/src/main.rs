use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nowwatching_core::config::AppConfig;
use nowwatching_core::db::DbHandle;
use nowwatching_server::{router, AppContext, ServerError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "nowwatching=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "nowwatching", version)]
#[command(about = "Serve SVG badges of what a Trakt user is watching")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short, global = true, env = "NOWWATCHING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show the stored credential and live playback state for a user
    Inspect { uid: String },
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let _guard = init_tracing(&config);

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Inspect { uid } => inspect(config, &uid).await,
    }
}

/// Console logging plus, when configured, a daily rolling log file. The
/// returned guard must live as long as the process.
fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match config.log_directory() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "nowwatching.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    guard
}

async fn serve(config: AppConfig, bind: Option<String>) -> Result<(), ServerError> {
    let db_path = config.ensure_db_path()?;
    let db = DbHandle::open(&db_path)?;
    tracing::info!(path = %db_path.display(), "credential store opened");

    if config.trakt.client_id.is_empty() || config.trakt.client_secret.is_empty() {
        tracing::warn!("TRAKT_CLIENT_ID / TRAKT_CLIENT_SECRET not set, logins will fail");
    }

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let ctx = AppContext::new(config, db)?;
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(%bind, base_url = ctx.config.base_url(), "listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn inspect(config: AppConfig, uid: &str) -> Result<(), ServerError> {
    let db = DbHandle::open(&config.ensure_db_path()?)?;
    let ctx = AppContext::new(config, db)?;

    let Some(record) = ctx.db().get_credential(uid).await? else {
        println!("no credential stored for {uid}");
        return Ok(());
    };

    println!("user:          {uid}");
    println!("access token:  {}", record.token_hint());
    println!(
        "refresh token: {}",
        if record.refresh_token.is_empty() { "missing" } else { "present" }
    );
    let now = Utc::now().timestamp();
    match record.expired_ts.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        Some(at) => println!(
            "expires:       {} ({})",
            at.to_rfc3339(),
            if record.is_expired_at(now) { "expired" } else { "valid" }
        ),
        None => println!("expires:       unknown, refreshed on next use"),
    }

    let playing = ctx.resolver.resolve(uid, false).await?;
    match &playing.item {
        Some(item) => {
            println!("now playing:   [{}] {}", item.kind.as_str(), item.title);
            println!("               {}", item.subtitle);
            if let Some(url) = &item.poster_url {
                println!("poster:        {url}");
            }
        }
        None => println!("now playing:   nothing"),
    }

    let history = ctx.resolver.history(uid, ctx.config.widget.max_recents).await;
    println!("history:       {} entries", history.len());
    for entry in history.iter().take(5) {
        println!(
            "  [{}] {} ({}) {}",
            entry.kind.as_str(),
            entry.title,
            entry.info,
            entry.watched_at
        );
    }
    Ok(())
}
