use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ParticipantRef;

/// Snapshot of the played game
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    /// Uuid of the game within the event
    pub uuid: Uuid,
    /// Title at the time of recording
    #[schema(example = "Catan")]
    pub title: String,
}

/// The recorded outcome of one game played at an event.
///
/// If `winner` is set, it is one of `players`.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Primary key of the result
    pub uuid: Uuid,
    /// The game that was played
    pub game: GameRef,
    /// The winner, if there was one
    pub winner: Option<ParticipantRef>,
    /// Everyone that played
    pub players: Vec<ParticipantRef>,
    /// Point in time the result was recorded
    pub created_at: DateTime<Utc>,
}
