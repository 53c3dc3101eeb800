//! Client for the Pokémon, type, and name-catalog endpoints.

use crate::{http_client, into_api_error, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Default PokeAPI base URL.
pub const POKE_API_BASE: &str = "https://pokeapi.co/api/v2";

/// How many catalog entries to request; large enough to cover every
/// generation in one page.
const CATALOG_PAGE_LIMIT: u32 = 100_000;

/// Normalized record of one Pokémon's displayable attributes.
///
/// Built from a raw provider payload and immutable afterwards. This is the
/// only record that gets persisted (as a team member), so it carries serde
/// derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    /// Lowercase canonical name.
    pub name: String,
    /// Preferred artwork URL, `None` when the provider has no image at all.
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub stats: Vec<StatValue>,
    pub abilities: Vec<String>,
}

/// One named base statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: i32,
}

/// Aggregated damage relations across a Pokémon's types.
///
/// Each list is deduplicated by type name, ordered by first appearance
/// across the per-type responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRelations {
    /// Types this Pokémon deals double damage to.
    pub strengths: Vec<String>,
    /// Types this Pokémon takes double damage from.
    pub weaknesses: Vec<String>,
    /// Types this Pokémon takes half damage from.
    pub resistances: Vec<String>,
    /// Types this Pokémon takes no damage from.
    pub immunities: Vec<String>,
}

impl TypeRelations {
    fn union(responses: &[ApiDamageRelations]) -> Self {
        let mut agg = Self::default();
        for relations in responses {
            push_unique(&mut agg.strengths, &relations.double_damage_to);
            push_unique(&mut agg.weaknesses, &relations.double_damage_from);
            push_unique(&mut agg.resistances, &relations.half_damage_from);
            push_unique(&mut agg.immunities, &relations.no_damage_from);
        }
        agg
    }
}

fn push_unique(into: &mut Vec<String>, relations: &[NamedRef]) {
    for relation in relations {
        if !into.iter().any(|existing| existing == &relation.name) {
            into.push(relation.name.clone());
        }
    }
}

fn dedup_preserving_order(types: &[String]) -> Vec<&str> {
    let mut unique: Vec<&str> = Vec::new();
    for t in types {
        if !unique.contains(&t.as_str()) {
            unique.push(t);
        }
    }
    unique
}

/// PokeAPI client.
#[derive(Clone)]
pub struct DexClient {
    client: reqwest::Client,
    base: String,
    names: Arc<OnceCell<Vec<String>>>,
}

impl Default for DexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DexClient {
    /// Create a client against the public PokeAPI.
    pub fn new() -> Self {
        Self::with_base(POKE_API_BASE)
    }

    /// Create a client against a custom base URL.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base: base.into(),
            names: Arc::new(OnceCell::new()),
        }
    }

    /// Look up one Pokémon by its lowercase name.
    ///
    /// An unknown name maps to [`Error::NotFound`]; there is no retry.
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, Error> {
        tracing::debug!(%name, "requesting pokemon");
        let url = format!("{}/pokemon/{name}", self.base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(into_api_error(response).await);
        }

        let raw: ApiPokemon = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        tracing::debug!(id = raw.id, "pokemon response received");
        Ok(raw.into())
    }

    /// Aggregate damage relations over the given type names.
    ///
    /// Duplicates in the input are collapsed first. An empty input resolves
    /// to the zero-valued relations without touching the network. The
    /// per-type lookups run concurrently and the join is all-or-nothing:
    /// one failing lookup fails the aggregation, since partial type data
    /// would be misleading.
    pub async fn type_relations(&self, types: &[String]) -> Result<TypeRelations, Error> {
        let unique = dedup_preserving_order(types);
        if unique.is_empty() {
            return Ok(TypeRelations::default());
        }

        tracing::debug!(types = ?unique, "loading type relations");
        let lookups = unique.iter().map(|t| self.type_damage(t));
        let responses = futures::future::try_join_all(lookups).await?;
        Ok(TypeRelations::union(&responses))
    }

    async fn type_damage(&self, type_name: &str) -> Result<ApiDamageRelations, Error> {
        let url = format!("{}/type/{type_name}", self.base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                name: type_name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(into_api_error(response).await);
        }

        let raw: ApiType = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(raw.damage_relations)
    }

    /// The full name catalog, fetched once per client.
    ///
    /// Concurrent callers share a single in-flight request; a failed fetch
    /// leaves the memo empty so a later call can retry.
    pub async fn all_names(&self) -> Result<Vec<String>, Error> {
        self.names
            .get_or_try_init(|| self.fetch_all_names())
            .await
            .cloned()
    }

    async fn fetch_all_names(&self) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}/pokemon?limit={CATALOG_PAGE_LIMIT}&offset=0",
            self.base
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(into_api_error(response).await);
        }

        let raw: ApiNameList = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        let names: Vec<String> = raw.results.into_iter().map(|entry| entry.name).collect();
        tracing::info!(count = names.len(), "name catalog loaded");
        Ok(names)
    }
}

// ============================================================================
// Raw provider payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPokemon {
    id: u32,
    name: String,
    sprites: ApiSprites,
    types: Vec<ApiTypeSlot>,
    stats: Vec<ApiStat>,
    abilities: Vec<ApiAbilitySlot>,
}

#[derive(Debug, Deserialize)]
struct ApiSprites {
    front_default: Option<String>,
    #[serde(default)]
    other: ApiOtherSprites,
}

#[derive(Debug, Default, Deserialize)]
struct ApiOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: ApiArtwork,
}

#[derive(Debug, Default, Deserialize)]
struct ApiArtwork {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiTypeSlot {
    r#type: NamedRef,
}

#[derive(Debug, Deserialize)]
struct ApiStat {
    base_stat: i32,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct ApiAbilitySlot {
    ability: NamedRef,
}

impl From<ApiPokemon> for Pokemon {
    fn from(raw: ApiPokemon) -> Self {
        // High-resolution artwork when present, default sprite otherwise.
        let sprite = raw
            .sprites
            .other
            .official_artwork
            .front_default
            .or(raw.sprites.front_default);

        Self {
            id: raw.id,
            name: raw.name,
            sprite,
            types: raw.types.into_iter().map(|t| t.r#type.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| StatValue {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiType {
    damage_relations: ApiDamageRelations,
}

#[derive(Debug, Default, Deserialize)]
struct ApiDamageRelations {
    #[serde(default)]
    double_damage_to: Vec<NamedRef>,
    #[serde(default)]
    double_damage_from: Vec<NamedRef>,
    #[serde(default)]
    half_damage_from: Vec<NamedRef>,
    #[serde(default)]
    no_damage_from: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct ApiNameList {
    results: Vec<NamedRef>,
}
