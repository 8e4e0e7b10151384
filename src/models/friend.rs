use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The state of a friendship
#[derive(Serialize, Deserialize, ToSchema, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FriendStatus {
    /// The receiver has not answered yet
    Pending,
    /// Both accounts are friends
    Accepted,
}

/// The representation of a friendship between two accounts.
///
/// Only one edge exists per pair of accounts, regardless of its direction.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FriendEdge {
    /// Primary key of this friendship
    pub uuid: Uuid,
    /// The account that sent the request
    pub from: Uuid,
    /// The account that received the request
    pub to: Uuid,
    /// The current state
    pub status: FriendStatus,
    /// Point in time the request was sent
    pub created_at: DateTime<Utc>,
}

impl FriendEdge {
    /// Checks if `account` is one of both ends
    pub fn touches(&self, account: Uuid) -> bool {
        self.from == account || self.to == account
    }

    /// Checks if this edge connects `a` and `b`, in any direction
    pub fn connects(&self, a: Uuid, b: Uuid) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The end of the edge that is not `account`
    pub fn other(&self, account: Uuid) -> Uuid {
        if self.from == account {
            self.to
        } else {
            self.from
        }
    }
}

/// A pending request as seen by its receiver
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// The uuid of the underlying [FriendEdge]
    pub uuid: Uuid,
    /// The account that sent the request
    pub from: Uuid,
    /// Nickname of the requesting account
    #[schema(example = "AliceCards")]
    pub from_nickname: String,
    /// City of the requesting account
    pub from_city: String,
    /// Point in time the request was sent
    pub created_at: DateTime<Utc>,
}
