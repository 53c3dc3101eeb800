//! The seam between the session and the remote providers.

use pokeapi::{
    CardApi, CardClient, DexClient, Error, MediaClient, MediaClip, Pokemon, TcgCard, TypeRelations,
};
use std::future::Future;

/// Data sources a session draws from.
///
/// [`LiveSources`] talks to the real providers; the testing module's
/// `MockSources` scripts every endpoint so flows run without network access.
pub trait Sources {
    /// Primary creature lookup by lowercase name.
    fn pokemon(&self, name: &str) -> impl Future<Output = Result<Pokemon, Error>> + Send;

    /// Aggregated damage relations for the given type names.
    fn type_relations(
        &self,
        types: &[String],
    ) -> impl Future<Output = Result<TypeRelations, Error>> + Send;

    /// Card search for the term.
    fn cards(&self, term: &str) -> impl Future<Output = Result<Vec<TcgCard>, Error>> + Send;

    /// Animated-clip lookup; `None` is a valid empty result.
    fn clip(&self, term: &str) -> impl Future<Output = Result<Option<MediaClip>, Error>> + Send;

    /// The full name catalog.
    fn all_names(&self) -> impl Future<Output = Result<Vec<String>, Error>> + Send;
}

/// The live provider bundle.
#[derive(Clone)]
pub struct LiveSources {
    dex: DexClient,
    cards: CardClient,
    media: MediaClient,
}

impl LiveSources {
    /// Bundle explicit clients.
    pub fn new(dex: DexClient, cards: CardClient, media: MediaClient) -> Self {
        Self { dex, cards, media }
    }

    /// Default public endpoints; the media key comes from `GIPHY_API_KEY`.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            DexClient::new(),
            CardClient::new(CardApi::PokemonTcg),
            MediaClient::from_env()?,
        ))
    }
}

impl Sources for LiveSources {
    async fn pokemon(&self, name: &str) -> Result<Pokemon, Error> {
        self.dex.pokemon(name).await
    }

    async fn type_relations(&self, types: &[String]) -> Result<TypeRelations, Error> {
        self.dex.type_relations(types).await
    }

    async fn cards(&self, term: &str) -> Result<Vec<TcgCard>, Error> {
        self.cards.cards(term).await
    }

    async fn clip(&self, term: &str) -> Result<Option<MediaClip>, Error> {
        self.media.clip(term).await
    }

    async fn all_names(&self) -> Result<Vec<String>, Error> {
        self.dex.all_names().await
    }
}
