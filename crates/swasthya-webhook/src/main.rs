//! swasthya server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! knowledge store (seeding it when empty), and serves the messaging webhook.
//!
//! ```
//! cargo run -p swasthya-webhook --bin swasthya -- seed --dataset diseases.json
//! cargo run -p swasthya-webhook --bin swasthya -- alert
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use swasthya_core::{assistant::Assistant, store::KnowledgeStore, translate::Localizer};
use swasthya_store_sqlite::{Dataset, SqliteStore};
use swasthya_translate::HttpTranslator;
use swasthya_webhook::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Swasthya health assistant")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the webhook (default).
  Serve,
  /// Replace the knowledge store's contents and exit.
  Seed {
    /// JSON dataset; the built-in dataset when omitted.
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Date to record case counts under (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    date:    Option<NaiveDate>,
  },
  /// Print today's disease alert.
  Alert {
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// List every disease name in the store, aliases included.
  Diseases,
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
    .add_source(config::Environment::with_prefix("SWASTHYA").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let today = Local::now().date_naive();

  match cli.command.unwrap_or(Command::Serve) {
    Command::Seed { dataset, date } => {
      let dataset = match dataset {
        Some(path) => {
          let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read dataset {path:?}"))?;
          Dataset::from_json(&json).context("failed to parse dataset")?
        }
        None => Dataset::builtin(),
      };
      seed(&store, dataset, date.unwrap_or(today)).await?;
      Ok(())
    }
    Command::Alert { date } => {
      let assistant = build_assistant(store, &server_cfg)?;
      let alert = assistant
        .startup_alert(date.unwrap_or(today))
        .await
        .context("failed to compose alert")?;
      println!("{alert}");
      Ok(())
    }
    Command::Serve => {
      if server_cfg.seed_on_start || store.is_empty().await? {
        seed(&store, Dataset::builtin(), today).await?;
      }
      serve(store, server_cfg).await
    }
    Command::Diseases => {
      let names = store
        .list_all_disease_names()
        .await
        .context("failed to list diseases")?;
      for name in names {
        println!("{name}");
      }
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let assistant = build_assistant(store, &server_cfg)?;
  let state = AppState { assistant: Arc::new(assistant) };

  let app = swasthya_webhook::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn build_assistant(
  store: SqliteStore,
  server_cfg: &ServerConfig,
) -> anyhow::Result<Assistant<SqliteStore, HttpTranslator>> {
  let translator = HttpTranslator::new(server_cfg.translation.clone())
    .context("failed to build translation client")?;
  if !translator.is_enabled() {
    tracing::info!("no translation endpoint configured; replies stay in English");
  }
  let localizer = Localizer::new(translator, server_cfg.translation.timeout());
  Ok(Assistant::new(Arc::new(store), localizer))
}

async fn seed(store: &SqliteStore, dataset: Dataset, date: NaiveDate) -> anyhow::Result<()> {
  let report = store
    .seed(dataset, date)
    .await
    .context("failed to seed knowledge store")?;
  tracing::info!(
    diseases = report.diseases,
    symptoms = report.symptoms,
    links = report.links,
    preventions = report.preventions,
    cases = report.cases,
    %date,
    "seeded knowledge store"
  );
  Ok(())
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
