//! Animated-clip lookup against the Giphy search API.

use crate::{http_client, into_api_error, Error};
use serde::Deserialize;

/// Giphy search endpoint.
pub const GIPHY_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/search";

/// One embeddable animated clip.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaClip {
    pub title: String,
    pub embed_url: String,
}

/// Giphy client.
#[derive(Clone)]
pub struct MediaClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl MediaClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, GIPHY_ENDPOINT)
    }

    /// Create a client against a custom endpoint.
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from the `GIPHY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GIPHY_API_KEY").map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// First matching clip for the term.
    ///
    /// `Ok(None)` when the provider has nothing; that is a valid empty
    /// state, not a failure.
    pub async fn clip(&self, term: &str) -> Result<Option<MediaClip>, Error> {
        tracing::debug!(%term, "requesting clip");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("q", term),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(into_api_error(response).await);
        }

        let raw: GiphyResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(raw.data.into_iter().next().map(|gif| MediaClip {
            title: gif.title.unwrap_or_default(),
            embed_url: gif.embed_url,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    #[serde(default)]
    data: Vec<GiphyGif>,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    title: Option<String>,
    embed_url: String,
}
