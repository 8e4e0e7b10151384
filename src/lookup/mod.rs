//! Lookup of board games in an external catalog

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use crate::lookup::bgg::BggClient;
pub use crate::lookup::debounce::Debouncer;

mod bgg;
mod debounce;

/// Queries shorter than this are not sent to the catalog
pub const MIN_QUERY_LENGTH: usize = 2;
/// The maximum number of search results
pub const MAX_SEARCH_RESULTS: usize = 5;

/// A search hit
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Identifier in the catalog
    #[schema(example = "13")]
    pub id: String,
    /// Primary name
    #[schema(example = "CATAN")]
    pub name: String,
    /// Year of publication, empty if unknown
    #[schema(example = "1995")]
    pub year: String,
}

/// The full record of a game
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct GameDetails {
    #[schema(example = "13")]
    pub id: String,
    #[schema(example = "CATAN")]
    pub name: String,
    #[schema(example = "1995")]
    pub year: String,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    #[schema(example = 3)]
    pub min_players: u32,
    #[schema(example = 4)]
    pub max_players: u32,
    /// Playing time in minutes
    #[schema(example = 120)]
    pub playing_time: u32,
}

/// The errors that can occur while talking to a catalog
#[derive(Debug)]
pub enum LookupError {
    /// The request could not be sent or the response not received
    Transport(reqwest::Error),
    /// The catalog answered with a non-success status
    Status(reqwest::StatusCode),
    /// The response could not be parsed
    Parse(quick_xml::DeError),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Transport(err) => write!(f, "Transport error: {err}"),
            LookupError::Status(status) => write!(f, "Catalog responded with {status}"),
            LookupError::Parse(err) => write!(f, "Invalid response: {err}"),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<quick_xml::DeError> for LookupError {
    fn from(value: quick_xml::DeError) -> Self {
        Self::Parse(value)
    }
}

/// An external catalog of board games
#[async_trait]
pub trait GameLookup: Send + Sync {
    /// Search games by name, best match first
    async fn search(&self, query: &str) -> Result<Vec<GameSummary>, LookupError>;

    /// Retrieve the full record of a game
    async fn details(&self, id: &str) -> Result<Option<GameDetails>, LookupError>;
}

/// The outcome of [GameCatalog::search]
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Up to [MAX_SEARCH_RESULTS] games
    Games(Vec<GameSummary>),
    /// A newer query of the same client arrived within the quiet period
    Superseded,
    /// The catalog could not be reached, the error was logged
    Failed,
}

/// The outcome of [GameCatalog::details]
#[derive(Debug, PartialEq, Eq)]
pub enum DetailsOutcome {
    /// The catalog knows the game
    Found(GameDetails),
    /// The catalog doesn't know the game
    Missing,
    /// The catalog could not be reached, the error was logged
    Failed,
}

/// A [GameLookup] with debounced search.
///
/// Failures are logged here and reported as outcome, never as error.
pub struct GameCatalog {
    lookup: Arc<dyn GameLookup>,
    debouncer: Debouncer,
}

impl GameCatalog {
    /// Wrap `lookup`
    pub fn new(lookup: Arc<dyn GameLookup>, debouncer: Debouncer) -> Self {
        Self { lookup, debouncer }
    }

    /// Search on behalf of `client`.
    ///
    /// Only the latest query of a client within the quiet period reaches the catalog.
    pub async fn search(&self, client: Uuid, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return SearchOutcome::Games(Vec::new());
        }

        if !self.debouncer.settle(client).await {
            return SearchOutcome::Superseded;
        }

        match self.lookup.search(query).await {
            Ok(mut games) => {
                games.truncate(MAX_SEARCH_RESULTS);
                SearchOutcome::Games(games)
            }
            Err(err) => {
                error!("Error searching games: {err}");
                SearchOutcome::Failed
            }
        }
    }

    /// Retrieve the full record of a game
    pub async fn details(&self, id: &str) -> DetailsOutcome {
        match self.lookup.details(id).await {
            Ok(Some(details)) => DetailsOutcome::Found(details),
            Ok(None) => DetailsOutcome::Missing,
            Err(err) => {
                error!("Error fetching game details: {err}");
                DetailsOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    struct Numbered;

    #[async_trait]
    impl GameLookup for Numbered {
        async fn search(&self, query: &str) -> Result<Vec<GameSummary>, LookupError> {
            Ok((0..8)
                .map(|i| GameSummary {
                    id: i.to_string(),
                    name: format!("{query} {i}"),
                    year: String::new(),
                })
                .collect())
        }

        async fn details(&self, _id: &str) -> Result<Option<GameDetails>, LookupError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn overlapping_search_supersedes_older_one() {
        let catalog = Arc::new(GameCatalog::new(
            Arc::new(Numbered),
            Debouncer::new(Duration::from_millis(50)),
        ));
        let client = Uuid::new_v4();

        let first = tokio::spawn({
            let catalog = catalog.clone();
            async move { catalog.search(client, "cat").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = catalog.search(client, "catan").await;

        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
        match second {
            SearchOutcome::Games(games) => {
                assert_eq!(games.len(), MAX_SEARCH_RESULTS);
                assert_eq!(games[0].name, "catan 0");
            }
            other => panic!("Unexpected outcome: {other:?}"),
        }
    }
}
