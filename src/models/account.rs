use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ParticipantRef;

/// A user account as it is visible to clients.
///
/// This is also the shape of the signed-in snapshot that is kept on the client side.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The primary key of an account
    pub uuid: Uuid,

    /// The email address, unique across all accounts
    #[schema(example = "john@example.com")]
    pub email: String,

    /// The name that is displayed for this user
    #[schema(example = "JohnDice")]
    pub nickname: String,

    /// The city the user plays in
    #[schema(example = "New York")]
    pub city: String,

    /// Reference to a profile photo
    pub photo_url: Option<String>,

    /// Whether this snapshot belongs to a signed-in session
    pub is_logged_in: bool,
}

impl Account {
    /// Snapshot of this account for event rosters
    pub fn as_participant(&self) -> ParticipantRef {
        ParticipantRef {
            uuid: self.uuid,
            nickname: self.nickname.clone(),
        }
    }
}

/// The stored representation of an account.
///
/// In contrast to [Account], this holds the password hash.
#[derive(Clone, Debug)]
pub struct AccountRecord {
    /// The primary key of an account
    pub uuid: Uuid,
    /// The email address, unique across all accounts
    pub email: String,
    /// The name that is displayed for this user
    pub nickname: String,
    /// The city the user plays in
    pub city: String,
    /// Reference to a profile photo
    pub photo_url: Option<String>,
    /// The argon2 hash of the password
    pub password_hash: String,
}

impl AccountRecord {
    /// Convert into the public representation
    pub fn to_account(&self, is_logged_in: bool) -> Account {
        Account {
            uuid: self.uuid,
            email: self.email.clone(),
            nickname: self.nickname.clone(),
            city: self.city.clone(),
            photo_url: self.photo_url.clone(),
            is_logged_in,
        }
    }
}
