//! Trading-card search client.
//!
//! The two observed card providers expose incompatible query languages and
//! payload shapes, so each gets its own adapter behind the one normalized
//! [`TcgCard`] record instead of a chain of optional-field fallbacks.

use crate::{http_client, into_api_error, Error};
use serde::Deserialize;

/// pokemontcg.io card-search endpoint.
pub const POKEMON_TCG_ENDPOINT: &str = "https://api.pokemontcg.io/v2/cards";

/// TCGdex card-search endpoint (English catalog).
pub const TCGDEX_ENDPOINT: &str = "https://api.tcgdex.net/v2/en/cards";

/// More cards than this would flood the gallery.
const CARD_LIMIT: usize = 4;

const TCGDEX_IMAGE_QUALITY: &str = "high";
const TCGDEX_IMAGE_EXTENSION: &str = "png";

/// Normalized trading-card record.
#[derive(Debug, Clone, PartialEq)]
pub struct TcgCard {
    pub name: String,
    /// Full image URL, `None` when the provider had no usable image.
    pub image: Option<String>,
    /// Owning set/expansion name, when the provider reports one.
    pub set_name: Option<String>,
}

impl TcgCard {
    /// Image URL, or the caller's placeholder when the provider had none.
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }
}

/// Which provider variant the client speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardApi {
    /// pokemontcg.io: `q=name:<term>` queries, `{data: [...]}` payloads,
    /// ready-to-use image URLs.
    PokemonTcg,
    /// TCGdex: `name=like:<term>` queries, bare-array payloads, image base
    /// URLs that need a quality/extension suffix.
    Tcgdex,
}

/// Card-search client.
#[derive(Clone)]
pub struct CardClient {
    client: reqwest::Client,
    endpoint: String,
    api: CardApi,
}

impl CardClient {
    /// Create a client for the given provider's public endpoint.
    pub fn new(api: CardApi) -> Self {
        let endpoint = match api {
            CardApi::PokemonTcg => POKEMON_TCG_ENDPOINT,
            CardApi::Tcgdex => TCGDEX_ENDPOINT,
        };
        Self::with_endpoint(api, endpoint)
    }

    /// Create a client against a custom endpoint.
    pub fn with_endpoint(api: CardApi, endpoint: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            endpoint: endpoint.into(),
            api,
        }
    }

    /// Search cards matching the term.
    ///
    /// The term is normalized first; an empty normalized term resolves to no
    /// cards without a request. The pokemontcg.io variant retries once with
    /// a wildcard query when the exact-name query comes back empty.
    pub async fn cards(&self, term: &str) -> Result<Vec<TcgCard>, Error> {
        let term = normalize_term(term);
        if term.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(%term, api = ?self.api, "requesting cards");
        let mut cards = self.search(&term, false).await?;
        if cards.is_empty() && self.api == CardApi::PokemonTcg {
            tracing::debug!(%term, "exact-name query empty, widening to wildcard");
            cards = self.search(&term, true).await?;
        }

        let cards = finish(cards, &term);
        tracing::debug!(%term, count = cards.len(), "card search finished");
        Ok(cards)
    }

    async fn search(&self, term: &str, wildcard: bool) -> Result<Vec<TcgCard>, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(term, wildcard))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(into_api_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        parse_cards(self.api, &body)
    }

    fn query_params(&self, term: &str, wildcard: bool) -> Vec<(&'static str, String)> {
        match self.api {
            CardApi::PokemonTcg => {
                let query = if wildcard {
                    format!("name:{term}*")
                } else {
                    format!("name:{term}")
                };
                vec![("q", query), ("pageSize", CARD_LIMIT.to_string())]
            }
            CardApi::Tcgdex => vec![("name", format!("like:{term}"))],
        }
    }
}

/// Trim, lowercase, strip quote characters, collapse runs of whitespace.
fn normalize_term(term: &str) -> String {
    let cleaned: String = term
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\\'))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep cards whose name contains the term, capped for the gallery.
fn finish(mut cards: Vec<TcgCard>, term: &str) -> Vec<TcgCard> {
    cards.retain(|card| card.name.to_lowercase().contains(term));
    cards.truncate(CARD_LIMIT);
    cards
}

fn parse_cards(api: CardApi, body: &str) -> Result<Vec<TcgCard>, Error> {
    match api {
        CardApi::PokemonTcg => {
            let raw: PtcgResponse =
                serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;
            Ok(raw.data.into_iter().filter_map(PtcgCard::into_card).collect())
        }
        CardApi::Tcgdex => {
            let raw: TcgdexResponse =
                serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;
            let cards = match raw {
                TcgdexResponse::List(cards) => cards,
                TcgdexResponse::Wrapped { data } => data,
            };
            Ok(cards.into_iter().filter_map(TcgdexCard::into_card).collect())
        }
    }
}

// ============================================================================
// pokemontcg.io payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct PtcgResponse {
    #[serde(default)]
    data: Vec<PtcgCard>,
}

#[derive(Debug, Deserialize)]
struct PtcgCard {
    name: Option<String>,
    images: Option<PtcgImages>,
    set: Option<PtcgSet>,
}

#[derive(Debug, Deserialize)]
struct PtcgImages {
    small: Option<String>,
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PtcgSet {
    name: Option<String>,
}

impl PtcgCard {
    fn into_card(self) -> Option<TcgCard> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let image = self.images.and_then(|i| i.small.or(i.large));
        let set_name = self.set.and_then(|s| s.name);
        Some(TcgCard {
            name,
            image,
            set_name,
        })
    }
}

// ============================================================================
// TCGdex payloads
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TcgdexResponse {
    Wrapped { data: Vec<TcgdexCard> },
    List(Vec<TcgdexCard>),
}

#[derive(Debug, Deserialize)]
struct TcgdexCard {
    name: Option<String>,
    /// Image base URL, completed with a quality/extension suffix.
    image: Option<String>,
    set: Option<TcgdexSet>,
}

/// TCGdex reports the owning set either as an object or a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TcgdexSet {
    Named { name: String },
    Flat(String),
}

impl TcgdexCard {
    fn into_card(self) -> Option<TcgCard> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let image = self
            .image
            .map(|base| format!("{base}/{TCGDEX_IMAGE_QUALITY}.{TCGDEX_IMAGE_EXTENSION}"));
        let set_name = self.set.map(|s| match s {
            TcgdexSet::Named { name } => name,
            TcgdexSet::Flat(name) => name,
        });
        Some(TcgCard {
            name,
            image,
            set_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  Pikachu  "), "pikachu");
        assert_eq!(normalize_term("\"mr.' mime\\\""), "mr. mime");
        assert_eq!(normalize_term("tapu   koko"), "tapu koko");
        assert_eq!(normalize_term("   "), "");
        assert_eq!(normalize_term(""), "");
    }

    #[test]
    fn test_query_params_per_variant() {
        let ptcg = CardClient::new(CardApi::PokemonTcg);
        assert_eq!(
            ptcg.query_params("pikachu", false),
            vec![
                ("q", "name:pikachu".to_string()),
                ("pageSize", "4".to_string())
            ]
        );
        assert_eq!(
            ptcg.query_params("pikachu", true)[0],
            ("q", "name:pikachu*".to_string())
        );

        let tcgdex = CardClient::new(CardApi::Tcgdex);
        assert_eq!(
            tcgdex.query_params("pikachu", false),
            vec![("name", "like:pikachu".to_string())]
        );
    }

    #[test]
    fn test_parse_pokemontcg_payload() {
        let body = r#"{
            "data": [
                {
                    "name": "Pikachu",
                    "images": {"small": "https://img/small/1.png", "large": "https://img/large/1.png"},
                    "set": {"name": "Base Set"}
                },
                {
                    "name": "Pikachu V",
                    "images": {"small": null, "large": "https://img/large/2.png"},
                    "set": null
                },
                {
                    "name": null,
                    "images": {"small": "https://img/small/3.png", "large": null},
                    "set": {"name": "Junk"}
                }
            ]
        }"#;

        let cards = parse_cards(CardApi::PokemonTcg, body).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Pikachu");
        assert_eq!(cards[0].image.as_deref(), Some("https://img/small/1.png"));
        assert_eq!(cards[0].set_name.as_deref(), Some("Base Set"));
        // large image used when small is missing, nameless entry discarded
        assert_eq!(cards[1].image.as_deref(), Some("https://img/large/2.png"));
        assert_eq!(cards[1].set_name, None);
    }

    #[test]
    fn test_parse_tcgdex_bare_array() {
        let body = r#"[
            {"name": "Pikachu", "image": "https://assets.tcgdex.net/en/base/base1/58", "set": {"name": "Base Set"}},
            {"name": "Raichu", "image": null, "set": "Jungle"}
        ]"#;

        let cards = parse_cards(CardApi::Tcgdex, body).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(
            cards[0].image.as_deref(),
            Some("https://assets.tcgdex.net/en/base/base1/58/high.png")
        );
        assert_eq!(cards[0].set_name.as_deref(), Some("Base Set"));
        assert_eq!(cards[1].image, None);
        assert_eq!(cards[1].set_name.as_deref(), Some("Jungle"));
    }

    #[test]
    fn test_parse_tcgdex_wrapped_payload() {
        let body = r#"{"data": [{"name": "Eevee", "image": "https://assets/ee", "set": null}]}"#;
        let cards = parse_cards(CardApi::Tcgdex, body).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Eevee");
    }

    #[test]
    fn test_finish_filters_and_caps() {
        let card = |name: &str| TcgCard {
            name: name.to_string(),
            image: None,
            set_name: None,
        };
        let cards = vec![
            card("Pikachu"),
            card("Surfing Pikachu"),
            card("Raichu"),
            card("Pikachu V"),
            card("Pikachu VMAX"),
            card("Flying Pikachu"),
        ];

        let kept = finish(cards, "pikachu");
        assert_eq!(kept.len(), CARD_LIMIT);
        assert!(kept.iter().all(|c| c.name.to_lowercase().contains("pikachu")));
    }

    #[test]
    fn test_image_or_placeholder() {
        let card = TcgCard {
            name: "Pikachu".to_string(),
            image: None,
            set_name: None,
        };
        assert_eq!(card.image_or("placeholder.png"), "placeholder.png");

        let card = TcgCard {
            image: Some("https://img/1.png".to_string()),
            ..card
        };
        assert_eq!(card.image_or("placeholder.png"), "https://img/1.png");
    }

    #[tokio::test]
    async fn test_empty_term_makes_no_request() {
        // Unroutable endpoint: any network attempt would error.
        let client = CardClient::with_endpoint(CardApi::PokemonTcg, "http://127.0.0.1:1/cards");
        assert!(client.cards("").await.unwrap().is_empty());
        assert!(client.cards("   ").await.unwrap().is_empty());
        assert!(client.cards("\"'\\").await.unwrap().is_empty());
    }
}
