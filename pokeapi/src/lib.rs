//! Minimal clients for the external data providers behind the Pokédex
//! team builder.
//!
//! This crate provides one focused client per provider:
//! - [`DexClient`] for Pokémon details, type damage relations, and the full
//!   name catalog
//! - [`CardClient`] for trading-card searches, with an explicit adapter per
//!   provider variant
//! - [`MediaClient`] for animated-clip lookups
//!
//! Raw provider payloads are deserialized into private `Api*` types and
//! mapped into the normalized records the rest of the workspace consumes.

use thiserror::Error;

mod cards;
mod dex;
mod media;

pub use cards::{CardApi, CardClient, TcgCard, POKEMON_TCG_ENDPOINT, TCGDEX_ENDPOINT};
pub use dex::{DexClient, Pokemon, StatValue, TypeRelations, POKE_API_BASE};
pub use media::{MediaClient, MediaClip, GIPHY_ENDPOINT};

/// Errors that can occur when talking to any of the providers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no match for \"{name}\"")]
    NotFound { name: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("API key not configured")]
    NoApiKey,
}

impl Error {
    /// Whether this is the provider saying "unknown name" rather than an
    /// infrastructure failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// HTTP client with the timeouts every provider client uses.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
}

/// Turn a non-success response into an [`Error::Api`].
pub(crate) async fn into_api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Error::Api { status, message }
}
