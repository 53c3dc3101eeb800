//! Core logic of the Pokédex team builder.
//!
//! This crate provides:
//! - A persisted, bounded, deduplicated team of Pokémon
//! - The lookup session flow (search, random pick, typeahead suggestions)
//! - A data-source seam so flows are testable without network access
//!
//! # Quick Start
//!
//! ```ignore
//! use dex_core::{LiveSources, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sources = LiveSources::from_env()?;
//!     let mut session = Session::new(sources, SessionConfig::new("team.json"));
//!
//!     let lookup = session.lookup("pikachu").await?;
//!     println!("{} has {} types", lookup.pokemon.name, lookup.pokemon.types.len());
//!
//!     session.add_current_to_team().await?;
//!     Ok(())
//! }
//! ```

pub mod session;
pub mod sources;
pub mod team;
pub mod testing;

// Primary public API
pub use session::{Lookup, LookupToken, Phase, Session, SessionConfig, SessionError};
pub use sources::{LiveSources, Sources};
pub use team::{TeamError, TeamStore, TEAM_LIMIT};
pub use testing::{sample_card, sample_clip, sample_pokemon, MockSources};
