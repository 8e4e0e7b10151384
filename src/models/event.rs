use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ChatMessage, EventRating, GameResult};

/// Snapshot of an account at the time it was added to an event.
///
/// Renaming an account afterwards does not update existing snapshots.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRef {
    /// Uuid of the account
    pub uuid: Uuid,
    /// Nickname at the time of joining
    #[schema(example = "JohnDice")]
    pub nickname: String,
}

/// The direction of a vote
#[derive(Serialize, Deserialize, ToSchema, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VoteKind {
    /// The voter wants to play this game
    Up,
    /// The voter would rather not
    Down,
}

/// A single vote of a participant for a game
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameVote {
    /// The voting account
    pub account: Uuid,
    /// Up or down
    pub kind: VoteKind,
}

/// Counted votes of a game
#[derive(Serialize, Deserialize, ToSchema, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    /// Votes in favour
    #[schema(example = 3)]
    pub up: usize,
    /// Votes against
    #[schema(example = 1)]
    pub down: usize,
    /// All votes
    #[schema(example = 4)]
    pub total: usize,
}

/// A candidate game of an event
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Primary key of the game, scoped to its event
    pub uuid: Uuid,
    /// Title of the game
    #[schema(example = "Catan")]
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Identifier in the external game catalog, if it was picked from there
    pub catalog_id: Option<String>,
    /// The votes of the participants
    pub votes: Vec<GameVote>,
}

impl Game {
    /// Count the votes of this game
    pub fn tally(&self) -> VoteTally {
        let up = self
            .votes
            .iter()
            .filter(|v| v.kind == VoteKind::Up)
            .count();

        VoteTally {
            up,
            down: self.votes.len() - up,
            total: self.votes.len(),
        }
    }
}

/// A scheduled board game meetup
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Primary key of the event
    pub uuid: Uuid,
    /// Name of the event
    #[schema(example = "Catan Championship")]
    pub name: String,
    /// Description of the event
    pub description: String,
    /// The venue
    #[schema(example = "Board & Brew Cafe")]
    pub location: String,
    /// The city of the venue
    #[schema(example = "New York")]
    pub city: String,
    /// The point in time the event takes place
    pub date: DateTime<Utc>,
    /// The maximum count of participants, including the host
    #[schema(example = 6)]
    pub max_players: u32,
    /// The account that created the event
    pub host: ParticipantRef,
    /// All participants, the host included
    pub participants: Vec<ParticipantRef>,
    /// Candidate games
    pub games: Vec<Game>,
    /// Set by the host once the meetup took place
    pub is_completed: bool,
    /// The chat log, in order of arrival
    pub chat: Vec<ChatMessage>,
    /// Ratings, at most one per participant
    pub ratings: Vec<EventRating>,
    /// Recorded outcomes of played games
    pub results: Vec<GameResult>,
}

impl Event {
    /// Checks if `account` is the host
    pub fn is_host(&self, account: Uuid) -> bool {
        self.host.uuid == account
    }

    /// Checks if `account` is on the participant list
    pub fn is_participant(&self, account: Uuid) -> bool {
        self.participants.iter().any(|p| p.uuid == account)
    }

    /// Checks if no further participants can join
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_players as usize
    }

    /// The mean of all ratings, if there are any
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }

        let sum: u32 = self.ratings.iter().map(|r| r.rating as u32).sum();
        Some(sum as f64 / self.ratings.len() as f64)
    }
}
