use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use skycast::api::AppState;
use skycast::{FavoritesStore, SkycastConfig, SnapshotCache, WeatherClient, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.is_demo_key() {
        tracing::warn!(
            "No API key configured; provider requests will fail with 401. \
             Set SKYCAST_API_KEY or OPENWEATHER_API_KEY."
        );
    }

    let data_dir = shellexpand_home(&config.cache.location);
    let client = WeatherClient::new(config.weather.clone())?;
    let favorites = FavoritesStore::open(data_dir.join("favorites"))?;
    let cache = SnapshotCache::open(data_dir.join("snapshots"))?;

    let state = Arc::new(AppState {
        client,
        favorites,
        cache,
        snapshot_ttl: Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60),
    });

    web::run(state, config.server.port).await;
    Ok(())
}

/// Expand a leading `~` to the home directory
fn shellexpand_home(path: &str) -> std::path::PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return std::path::PathBuf::from(home).join(rest);
    }
    std::path::PathBuf::from(path)
}
