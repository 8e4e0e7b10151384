use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ParticipantRef;

/// The lowest allowed rating
pub const MIN_RATING: u8 = 1;
/// The highest allowed rating
pub const MAX_RATING: u8 = 5;

/// A rating of a completed event, at most one per rater
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventRating {
    /// Primary key of the rating
    pub uuid: Uuid,
    /// The rating participant
    pub rater: ParticipantRef,
    /// Between 1 and 5
    #[schema(example = 4)]
    pub rating: u8,
    /// Optional free text
    pub comment: Option<String>,
    /// Point in time the rating was given
    pub created_at: DateTime<Utc>,
}
