//! Persistent favorite locations
//!
//! An ordered, deduplicated-by-id collection stored as one JSON value under a
//! single fixed key in a fjall keyspace. Every mutation is a read-modify-write
//! of the whole collection; there is no merge or versioning, so writers in
//! separate processes can race and drop each other's update (documented
//! limitation, see DESIGN.md).

use crate::models::FavoriteLocation;
use anyhow::Result;
use fjall::Keyspace;
use std::path::Path;
use tokio::task;
use tracing::{debug, warn};

/// Fixed key the serialized collection lives under
const FAVORITES_KEY: &str = "weather_favorites";

/// Durable store of user-pinned locations
pub struct FavoritesStore {
    store: Keyspace,
}

impl FavoritesStore {
    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let store = db.keyspace("favorites", fjall::KeyspaceCreateOptions::default)?;
        Ok(Self { store })
    }

    /// The full ordered collection, insertion order
    ///
    /// An absent slot is an empty collection. A slot that fails to decode is
    /// also treated as empty; the failure is logged, never surfaced.
    pub async fn list(&self) -> Result<Vec<FavoriteLocation>> {
        let store = self.store.clone();
        let raw: Option<Vec<u8>> = task::spawn_blocking(move || {
            store
                .get(FAVORITES_KEY.as_bytes())
                .map(|v| v.map(|slice| slice.to_vec()))
        })
        .await??;

        let Some(bytes) = raw else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&bytes) {
            Ok(favorites) => Ok(favorites),
            Err(e) => {
                warn!("Discarding undecodable favorites slot: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Append a favorite; no-op if one with the same id is already present
    pub async fn add(&self, favorite: FavoriteLocation) -> Result<()> {
        let mut favorites = self.list().await?;
        if favorites.iter().any(|f| f.id == favorite.id) {
            debug!("Favorite {} already present, skipping", favorite.id);
            return Ok(());
        }
        favorites.push(favorite);
        self.persist(favorites).await
    }

    /// Remove the favorite with the given id; no-op if absent
    pub async fn remove(&self, id: &str) -> Result<()> {
        let mut favorites = self.list().await?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            return Ok(());
        }
        self.persist(favorites).await
    }

    /// Membership test by id
    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.list().await?.iter().any(|f| f.id == id))
    }

    /// Write back the whole collection
    async fn persist(&self, favorites: Vec<FavoriteLocation>) -> Result<()> {
        let bytes = serde_json::to_vec(&favorites)?;
        let store = self.store.clone();
        task::spawn_blocking(move || store.insert(FAVORITES_KEY.as_bytes(), bytes)).await??;
        debug!("Persisted {} favorites", favorites.len());
        Ok(())
    }
}
