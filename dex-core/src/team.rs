//! Persisted team management.
//!
//! The team is a bounded, deduplicated, ordered collection of Pokémon stored
//! as one JSON file: the literal serialized array, no envelope or version
//! field. The store keeps no in-memory mirror; every read loads the file and
//! every mutation rewrites it, so storage stays the single source of truth.

use pokeapi::Pokemon;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Maximum number of Pokémon in a team.
pub const TEAM_LIMIT: usize = 6;

/// Errors from team operations.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("team is already full")]
    Full,

    #[error("{name} is already in the team")]
    Duplicate { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed team store.
pub struct TeamStore {
    path: PathBuf,
}

impl TeamStore {
    /// Create a store persisting to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current team in insertion order. A missing file is an empty team.
    pub async fn list(&self) -> Result<Vec<Pokemon>, TeamError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let team: Vec<Pokemon> = serde_json::from_str(&content)?;
                tracing::debug!(count = team.len(), "loaded team from storage");
                Ok(team)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append a Pokémon and persist.
    ///
    /// Fails with [`TeamError::Full`] at capacity and with
    /// [`TeamError::Duplicate`] when an entry with the same id already
    /// exists; the stored team is untouched in both cases.
    pub async fn add(&self, pokemon: Pokemon) -> Result<(), TeamError> {
        let mut team = self.list().await?;

        if team.len() >= TEAM_LIMIT {
            tracing::warn!(name = %pokemon.name, "cannot add, team is full");
            return Err(TeamError::Full);
        }
        if team.iter().any(|member| member.id == pokemon.id) {
            tracing::warn!(name = %pokemon.name, "already in the team, skipping");
            return Err(TeamError::Duplicate { name: pokemon.name });
        }

        tracing::info!(name = %pokemon.name, "added to team");
        team.push(pokemon);
        self.save(&team).await
    }

    /// Remove the member with the given id and persist.
    ///
    /// Entries are matched by their stable identifier, never by position, so
    /// a stale view cannot remove the wrong member. An unknown id leaves the
    /// team unchanged. Survivor order is preserved.
    pub async fn remove(&self, id: u32) -> Result<(), TeamError> {
        let mut team = self.list().await?;
        let before = team.len();
        team.retain(|member| member.id != id);
        if team.len() < before {
            tracing::info!(id, "removed from team");
        }
        self.save(&team).await
    }

    async fn save(&self, team: &[Pokemon]) -> Result<(), TeamError> {
        let content = serde_json::to_string_pretty(team)?;
        fs::write(&self.path, content).await?;
        tracing::debug!(count = team.len(), "saved team");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pokemon;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TeamStore {
        TeamStore::new(dir.path().join("team.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_team() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add(sample_pokemon(1, "bulbasaur")).await.unwrap();
        store.add(sample_pokemon(4, "charmander")).await.unwrap();

        let team = store.list().await.unwrap();
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].name, "bulbasaur");
        assert_eq!(team[1].name, "charmander");
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(sample_pokemon(1, "bulbasaur")).await.unwrap();

        store.remove(999).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_survives_store_recreation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.json");

        TeamStore::new(&path)
            .add(sample_pokemon(25, "pikachu"))
            .await
            .unwrap();

        // A fresh store over the same file sees the same team.
        let team = TeamStore::new(&path).list().await.unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].id, 25);
    }
}
