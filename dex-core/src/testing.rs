//! Testing utilities for the team-builder flows.
//!
//! `MockSources` mirrors the live provider bundle with scripted results and
//! per-endpoint call counters, so integration tests can assert both the
//! rendered outcome and the absence of network traffic. The `sample_*`
//! helpers build small fixture records.

use crate::sources::Sources;
use pokeapi::{Error, MediaClip, Pokemon, StatValue, TcgCard, TypeRelations};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a small Pokémon record for tests.
pub fn sample_pokemon(id: u32, name: &str) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        sprite: Some(format!("https://img.example/{name}.png")),
        types: vec!["grass".to_string(), "poison".to_string()],
        stats: vec![
            StatValue {
                name: "hp".to_string(),
                value: 45,
            },
            StatValue {
                name: "speed".to_string(),
                value: 45,
            },
        ],
        abilities: vec!["overgrow".to_string()],
    }
}

/// Build a card record for tests.
pub fn sample_card(name: &str) -> TcgCard {
    TcgCard {
        name: name.to_string(),
        image: Some(format!("https://cards.example/{name}.png")),
        set_name: Some("Base Set".to_string()),
    }
}

/// Build a clip record for tests.
pub fn sample_clip(title: &str) -> MediaClip {
    MediaClip {
        title: title.to_string(),
        embed_url: format!("https://clips.example/{title}"),
    }
}

/// Per-endpoint call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub pokemon: AtomicUsize,
    pub relations: AtomicUsize,
    pub cards: AtomicUsize,
    pub clip: AtomicUsize,
    pub names: AtomicUsize,
}

/// Scripted provider bundle.
///
/// Every endpoint returns a scripted value; `failing_*` builders script a
/// provider outage instead. Lookups for names that were never scripted
/// resolve to [`Error::NotFound`], like the live provider would.
pub struct MockSources {
    pokemon: HashMap<String, Pokemon>,
    relations: Option<TypeRelations>,
    cards: Option<Vec<TcgCard>>,
    clip: Option<Option<MediaClip>>,
    names: Option<Vec<String>>,
    /// How often each endpoint was hit.
    pub calls: CallCounts,
}

impl Default for MockSources {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSources {
    /// Empty sources: no known Pokémon, empty-but-healthy secondaries.
    pub fn new() -> Self {
        Self {
            pokemon: HashMap::new(),
            relations: Some(TypeRelations::default()),
            cards: Some(Vec::new()),
            clip: Some(None),
            names: Some(Vec::new()),
            calls: CallCounts::default(),
        }
    }

    /// Make a Pokémon resolvable by its name.
    pub fn with_pokemon(mut self, pokemon: Pokemon) -> Self {
        self.pokemon.insert(pokemon.name.clone(), pokemon);
        self
    }

    /// Script the relation aggregation result.
    pub fn with_relations(mut self, relations: TypeRelations) -> Self {
        self.relations = Some(relations);
        self
    }

    /// Script a relation-provider outage.
    pub fn failing_relations(mut self) -> Self {
        self.relations = None;
        self
    }

    /// Script the card-search result.
    pub fn with_cards(mut self, cards: Vec<TcgCard>) -> Self {
        self.cards = Some(cards);
        self
    }

    /// Script a card-provider outage.
    pub fn failing_cards(mut self) -> Self {
        self.cards = None;
        self
    }

    /// Script the clip result.
    pub fn with_clip(mut self, clip: MediaClip) -> Self {
        self.clip = Some(Some(clip));
        self
    }

    /// Script a clip-provider outage.
    pub fn failing_clip(mut self) -> Self {
        self.clip = None;
        self
    }

    /// Script the name catalog.
    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Script a catalog outage.
    pub fn failing_names(mut self) -> Self {
        self.names = None;
        self
    }
}

fn outage() -> Error {
    Error::Network("scripted outage".to_string())
}

impl Sources for MockSources {
    async fn pokemon(&self, name: &str) -> Result<Pokemon, Error> {
        self.calls.pokemon.fetch_add(1, Ordering::SeqCst);
        self.pokemon.get(name).cloned().ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })
    }

    async fn type_relations(&self, _types: &[String]) -> Result<TypeRelations, Error> {
        self.calls.relations.fetch_add(1, Ordering::SeqCst);
        self.relations.clone().ok_or_else(outage)
    }

    async fn cards(&self, _term: &str) -> Result<Vec<TcgCard>, Error> {
        self.calls.cards.fetch_add(1, Ordering::SeqCst);
        self.cards.clone().ok_or_else(outage)
    }

    async fn clip(&self, _term: &str) -> Result<Option<MediaClip>, Error> {
        self.calls.clip.fetch_add(1, Ordering::SeqCst);
        self.clip.clone().ok_or_else(outage)
    }

    async fn all_names(&self) -> Result<Vec<String>, Error> {
        self.calls.names.fetch_add(1, Ordering::SeqCst);
        self.names.clone().ok_or_else(outage)
    }
}
