//! `clash-import`: seeds the champion catalog.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use importer::source::{cdragon, meraki};
use importer::{AssetMirror, CDragonSource, ChampionSource, MerakiSource, Seeder};
use runtime::SqliteCatalog;
use runtime::repository::default_database_url;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceKind {
    /// CommunityDragon raw game data
    Cdragon,
    /// Meraki Analytics curated data
    Meraki,
}

/// Fetch champions, abilities and skins into the local catalog
#[derive(Parser, Debug)]
#[command(name = "clash-import", version)]
struct Args {
    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL", default_value_t = default_database_url())]
    database_url: String,

    /// Upstream schema to read
    #[arg(long, value_enum, env = "IMPORT_SOURCE", default_value = "cdragon")]
    source: SourceKind,

    /// Override the source's base URL
    #[arg(long, env = "IMPORT_BASE_URL")]
    base_url: Option<String>,

    /// Pause between champions in milliseconds
    #[arg(long, env = "IMPORT_DELAY_MS", default_value_t = 50)]
    delay_ms: u64,

    /// Mirror icons, splashes and tiles into this directory
    #[arg(long, env = "IMPORT_ASSET_DIR")]
    mirror_assets: Option<PathBuf>,

    /// Import only the first N champions
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    ensure_database_dir(&args.database_url)?;
    let store = SqliteCatalog::connect(&args.database_url)
        .await
        .with_context(|| format!("failed to open {}", args.database_url))?;

    let http_client = reqwest::Client::builder()
        .user_agent(concat!("clash-import/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let source: Arc<dyn ChampionSource> = match args.source {
        SourceKind::Cdragon => Arc::new(CDragonSource::new(
            args.base_url.as_deref().unwrap_or(cdragon::DEFAULT_BASE_URL),
            http_client.clone(),
        )),
        SourceKind::Meraki => Arc::new(MerakiSource::new(
            args.base_url.as_deref().unwrap_or(meraki::DEFAULT_BASE_URL),
            http_client.clone(),
        )),
    };

    let mut seeder = Seeder::new(source, Arc::new(store))
        .with_delay(Duration::from_millis(args.delay_ms));
    if let Some(dir) = args.mirror_assets {
        tracing::info!(dir = %dir.display(), "mirroring assets");
        seeder = seeder.with_mirror(AssetMirror::new(dir, http_client));
    }
    if let Some(limit) = args.limit {
        seeder = seeder.with_limit(limit);
    }

    let report = seeder.run().await.context("import aborted")?;
    report.log_summary();

    Ok(())
}

/// Creates the parent directory of a file-backed SQLite URL.
fn ensure_database_dir(url: &str) -> Result<()> {
    let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
