//! Console front end: one chat per line of stdin.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use coach_core::model::UserId;
use services::{AppServices, Clock, CoachService, Reply, messages};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod render;

#[derive(Parser, Debug)]
#[command(name = "blind-coach", version, about = "Back-rank blindfold chess trainer")]
struct Args {
    /// `SQLite` database URL or path; sessions stay in memory when absent
    #[arg(long = "db", env = "COACH_DB_URL")]
    db_url: Option<String>,

    /// User the console speaks as (prefix a line with `@<id>` to switch)
    #[arg(long, env = "COACH_USER_ID", default_value_t = 1)]
    user_id: u64,

    /// Forget sessions idle for this many minutes
    #[arg(
        long,
        env = "COACH_IDLE_TTL_MINS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    idle_ttl_mins: Option<u32>,
}

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

/// Splits an optional `@<id>` prefix off a console line.
fn split_speaker(line: &str, default: UserId) -> (UserId, &str) {
    if let Some(rest) = line.strip_prefix('@') {
        let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if let Ok(user_id) = id.parse::<UserId>() {
            return (user_id, text.trim());
        }
    }
    (default, line)
}

async fn chat(
    coach: Arc<CoachService>,
    default_user: UserId,
    idle_ttl: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}\n", render::render(&Reply::menu(messages::welcome())));

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(ttl) = idle_ttl {
            coach.evict_idle(ttl).await?;
        }

        let (user_id, text) = split_speaker(line, default_user);
        match coach.handle_text(user_id, text).await {
            Ok(reply) => println!("{}\n", render::render(&reply)),
            Err(err) => warn!(%user_id, error = %err, "message not handled"),
        }
    }
    info!("input closed");
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let db_url = args.db_url.as_deref().map(normalize_sqlite_url);

    // A pooled `sqlite::memory:` database is per connection; use the map instead.
    let services = match db_url.as_deref() {
        None | Some("sqlite::memory:") => {
            info!("sessions kept in memory");
            AppServices::in_memory(Clock::default())
        }
        Some(url) => {
            // Open + migrate SQLite at startup.
            prepare_sqlite_file(url)?;
            let services = AppServices::new_sqlite(url, Clock::default()).await?;
            info!(db_url = %url, "storage ready");
            services
        }
    };

    let idle_ttl = args.idle_ttl_mins.map(|mins| Duration::minutes(i64::from(mins)));
    chat(services.coach(), UserId::new(args.user_id), idle_ttl).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
