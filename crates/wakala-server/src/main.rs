//! wakala server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `WAKALA_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Bootstrapping an admin
//!
//! Staff accounts can only be created by an admin. Create the first one with:
//!
//! ```text
//! cargo run -p wakala-server -- --create-admin admin@example.com
//! ```
//!
//! The password is read from stdin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wakala_api::{AppState, ServerConfig};
use wakala_auth::password;
use wakala_core::{
  actor::{ActorKind, NewActor, RoleName},
  store::{CreateActorOutcome, WorkflowStore},
};
use wakala_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Wakala power-of-attorney server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an admin account with this email (password on stdin) and exit.
  #[arg(long, value_name = "EMAIL")]
  create_admin: Option<String>,

  /// Display name for `--create-admin`.
  #[arg(long, default_value = "Administrator")]
  admin_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WAKALA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if server_cfg.jwt_secret.trim().is_empty() {
    anyhow::bail!("jwt_secret must be set");
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(email) = cli.create_admin {
    return create_admin(&store, &cli.admin_name, &email).await;
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(Arc::new(store), &server_cfg);
  let app = wakala_api::router(state).layer(TraceLayer::new_for_http());

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn create_admin(store: &SqliteStore, name: &str, email: &str) -> anyhow::Result<()> {
  let password = read_password()?;
  if password.chars().count() < wakala_auth::AuthConfig::default().min_password_length {
    anyhow::bail!("password is too short");
  }
  let password_hash = password::hash_password(&password)?;

  let outcome = store
    .create_actor(NewActor {
      kind: ActorKind::User,
      name: name.to_owned(),
      email: email.trim().to_lowercase(),
      password_hash,
      role: RoleName::Admin,
    })
    .await
    .context("failed to create admin")?;

  match outcome {
    CreateActorOutcome::Created(actor) => {
      tracing::info!(actor_id = %actor.id, email = %actor.email, "admin created");
      Ok(())
    }
    CreateActorOutcome::EmailTaken => anyhow::bail!("{email} is already registered"),
  }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absolute_paths_are_untouched() {
    let p = Path::new("/var/lib/wakala/wakala.db");
    assert_eq!(expand_tilde(p), p);
  }

  #[test]
  fn tilde_expands_under_home() {
    let expanded = expand_tilde(Path::new("~/wakala.db"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expanded, PathBuf::from(home).join("wakala.db"));
    }
  }
}
