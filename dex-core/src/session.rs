//! Session - the primary public API for the team-builder flow.
//!
//! A [`Session`] is the one context object for a user's sitting: it owns the
//! data sources, the team store, the current selection, the memoized name
//! catalog, and the lookup sequence counter. Nothing lives in globals; the
//! session is created at startup, reset between searches, and dropped when
//! the front-end goes away.

use crate::sources::Sources;
use crate::team::{TeamError, TeamStore};
use pokeapi::{MediaClip, Pokemon, TcgCard, TypeRelations};
use rand::seq::SliceRandom;
use std::path::PathBuf;
use thiserror::Error;

/// How many catalog names a suggestion query may return.
const SUGGESTION_LIMIT: usize = 6;

/// Minimum input length before suggestions are offered.
const SUGGESTION_MIN_LEN: usize = 3;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("lookup failed: {0}")]
    Lookup(#[from] pokeapi::Error),

    #[error("team error: {0}")]
    Team(#[from] TeamError),

    #[error("a newer lookup superseded this one")]
    Superseded,

    #[error("empty search input")]
    EmptyQuery,

    #[error("no name catalog available for a random pick")]
    CatalogUnavailable,

    #[error("no Pokémon is currently loaded")]
    NoSelection,
}

/// Lifecycle of the current lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Token identifying one lookup cycle.
///
/// Completion handlers compare their token against the session's newest
/// cycle and discard stale results, so an overlapping search can never
/// overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken(u64);

/// Everything one completed lookup produced.
///
/// The secondary results are independent: a failed relation fetch does not
/// disturb the cards or the loaded Pokémon, and vice versa. Callers render
/// each `Result` into its own panel.
#[derive(Debug)]
pub struct Lookup {
    pub pokemon: Pokemon,
    pub relations: Result<TypeRelations, pokeapi::Error>,
    pub cards: Result<Vec<TcgCard>, pokeapi::Error>,
    pub clip: Result<Option<MediaClip>, pokeapi::Error>,
}

/// Configuration for creating a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// File the team persists to.
    pub team_path: PathBuf,

    /// Maximum suggestions returned per query.
    pub suggestion_limit: usize,

    /// Minimum input length before suggestions appear.
    pub suggestion_min_len: usize,
}

impl SessionConfig {
    /// Create a config persisting the team at the given path.
    pub fn new(team_path: impl Into<PathBuf>) -> Self {
        Self {
            team_path: team_path.into(),
            suggestion_limit: SUGGESTION_LIMIT,
            suggestion_min_len: SUGGESTION_MIN_LEN,
        }
    }

    /// Override the suggestion cap.
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Override the minimum input length for suggestions.
    pub fn with_suggestion_min_len(mut self, len: usize) -> Self {
        self.suggestion_min_len = len;
        self
    }
}

/// A team-builder session.
pub struct Session<S> {
    sources: S,
    team: TeamStore,
    config: SessionConfig,
    catalog: Option<Vec<String>>,
    current: Option<Pokemon>,
    phase: Phase,
    seq: u64,
}

impl<S: Sources> Session<S> {
    /// Create a session over the given sources.
    pub fn new(sources: S, config: SessionConfig) -> Self {
        Self {
            team: TeamStore::new(&config.team_path),
            sources,
            config,
            catalog: None,
            current: None,
            phase: Phase::Idle,
            seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Lookup cycle
    // ------------------------------------------------------------------

    /// Start a new lookup cycle; any in-flight cycle becomes stale.
    pub fn begin(&mut self) -> LookupToken {
        self.seq += 1;
        self.phase = Phase::Loading;
        self.current = None;
        LookupToken(self.seq)
    }

    /// Whether the token still belongs to the newest cycle.
    pub fn is_current(&self, token: LookupToken) -> bool {
        token.0 == self.seq
    }

    /// Commit the primary result of a cycle.
    ///
    /// Returns `false` (and leaves the session untouched) when a newer
    /// cycle has started since the token was issued.
    pub fn commit_selection(&mut self, token: LookupToken, pokemon: Pokemon) -> bool {
        if !self.is_current(token) {
            tracing::warn!(name = %pokemon.name, "discarding stale lookup result");
            return false;
        }
        self.current = Some(pokemon);
        self.phase = Phase::Loaded;
        true
    }

    fn fail(&mut self, token: LookupToken) {
        if self.is_current(token) {
            self.phase = Phase::Failed;
            self.current = None;
        }
    }

    /// Run one full lookup cycle for the given name.
    ///
    /// The primary fetch settles first; on failure the cycle aborts with the
    /// session in [`Phase::Failed`] and the team untouched. On success the
    /// selection commits, then the relation aggregation, card search, and
    /// clip lookup run concurrently; each outcome lands in its own field of
    /// the returned [`Lookup`] so one failing source never hides the others.
    pub async fn lookup(&mut self, input: &str) -> Result<Lookup, SessionError> {
        let name = input.trim().to_lowercase();
        if name.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let token = self.begin();
        tracing::info!(%name, "starting lookup");

        let pokemon = match self.sources.pokemon(&name).await {
            Ok(pokemon) => pokemon,
            Err(e) => {
                tracing::warn!(%name, error = %e, "lookup failed");
                self.fail(token);
                return Err(e.into());
            }
        };

        if !self.commit_selection(token, pokemon.clone()) {
            return Err(SessionError::Superseded);
        }

        let (relations, cards, clip) = futures::join!(
            self.sources.type_relations(&pokemon.types),
            self.sources.cards(&pokemon.name),
            self.sources.clip(&pokemon.name),
        );

        if !self.is_current(token) {
            tracing::warn!(%name, "discarding stale secondary results");
            return Err(SessionError::Superseded);
        }

        if let Err(e) = &relations {
            tracing::warn!(error = %e, "type relations unavailable");
        }
        if let Err(e) = &cards {
            tracing::warn!(error = %e, "cards unavailable");
        }
        if let Err(e) = &clip {
            tracing::warn!(error = %e, "clip unavailable");
        }

        Ok(Lookup {
            pokemon,
            relations,
            cards,
            clip,
        })
    }

    /// Current lookup phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The loaded Pokémon, if any.
    pub fn current(&self) -> Option<&Pokemon> {
        self.current.as_ref()
    }

    /// Reset the selection back to idle.
    pub fn clear_selection(&mut self) {
        self.current = None;
        self.phase = Phase::Idle;
    }

    // ------------------------------------------------------------------
    // Team
    // ------------------------------------------------------------------

    /// Whether "add to team" is available right now.
    pub fn can_add(&self) -> bool {
        self.phase == Phase::Loaded && self.current.is_some()
    }

    /// Add the loaded Pokémon to the team.
    ///
    /// On success the selection resets toward idle. On a capacity or
    /// duplicate failure the selection is retained, so the caller can keep
    /// showing it next to the warning.
    pub async fn add_current_to_team(&mut self) -> Result<(), SessionError> {
        if !self.can_add() {
            return Err(SessionError::NoSelection);
        }
        let pokemon = self.current.clone().ok_or(SessionError::NoSelection)?;
        self.team.add(pokemon).await?;
        self.clear_selection();
        Ok(())
    }

    /// Current team, freshly read from storage.
    pub async fn team(&self) -> Result<Vec<Pokemon>, TeamError> {
        self.team.list().await
    }

    /// Remove a team member by its stable id. The selection is untouched.
    pub async fn remove_from_team(&self, id: u32) -> Result<(), TeamError> {
        self.team.remove(id).await
    }

    /// The underlying team store.
    pub fn team_store(&self) -> &TeamStore {
        &self.team
    }

    /// Consume the session and hand back its sources.
    ///
    /// Mostly useful in tests that inspect scripted-source call counters.
    pub fn into_sources(self) -> S {
        self.sources
    }

    // ------------------------------------------------------------------
    // Catalog, random pick, suggestions
    // ------------------------------------------------------------------

    /// Best-effort catalog preload.
    ///
    /// A failure only disables the assist features (suggestions and random
    /// pick); it is logged and otherwise swallowed.
    pub async fn preload_catalog(&mut self) {
        if self.catalog.is_some() {
            return;
        }
        match self.sources.all_names().await {
            Ok(names) => {
                tracing::info!(count = names.len(), "name catalog preloaded");
                self.catalog = Some(names);
            }
            Err(e) => tracing::warn!(error = %e, "could not preload name catalog"),
        }
    }

    /// Whether the name catalog is available.
    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    async fn ensure_catalog(&mut self) -> Result<(), SessionError> {
        if self.catalog.is_none() {
            let names = self
                .sources
                .all_names()
                .await
                .map_err(|_| SessionError::CatalogUnavailable)?;
            if names.is_empty() {
                return Err(SessionError::CatalogUnavailable);
            }
            self.catalog = Some(names);
        }
        Ok(())
    }

    /// Look up a uniformly random catalog name through the normal flow.
    pub async fn random_lookup(&mut self) -> Result<Lookup, SessionError> {
        self.ensure_catalog().await?;
        let name = {
            let names = self.catalog.as_deref().unwrap_or(&[]);
            names
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or(SessionError::CatalogUnavailable)?
        };
        tracing::info!(%name, "random pick");
        self.lookup(&name).await
    }

    /// Catalog names containing the input, case-insensitive.
    ///
    /// Below the minimum input length, or without a catalog, this returns
    /// nothing, which front-ends render as a hidden suggestion box.
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        let term = input.trim().to_lowercase();
        if term.chars().count() < self.config.suggestion_min_len {
            return Vec::new();
        }
        let Some(names) = self.catalog.as_deref() else {
            return Vec::new();
        };
        names
            .iter()
            .filter(|name| name.to_lowercase().contains(&term))
            .take(self.config.suggestion_limit)
            .map(String::as_str)
            .collect()
    }
}
