//! The errors of the state managers

use std::fmt::{Display, Formatter};

/// The category of a [StoreError]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not signed in or wrong role
    Authorization,
    /// The request itself is invalid
    Validation,
    /// A referenced entity does not exist
    NotFound,
    /// Something broke that the caller can't fix
    Internal,
}

/// All errors that can occur while operating on the stores
#[derive(Debug)]
pub enum StoreError {
    /// The operation requires a signed-in account
    NotSignedIn,
    /// Only the host may do this
    NotHost,
    /// Only participants may do this
    NotParticipant,
    /// The receiver of a friend request has to answer it
    NotRequestReceiver,

    /// No account matched email and password
    LoginFailed,
    /// A required field was empty
    MissingField(&'static str),
    /// The email can't be parsed
    InvalidEmail,
    /// The password is too short
    InvalidPassword,
    /// There is already an account with this email
    EmailAlreadyInUse,
    /// Users can't befriend themselves
    CannotBefriendSelf,
    /// There is already an edge between both accounts
    FriendshipAlreadyExists,
    /// The request was accepted before
    AlreadyFriends,
    /// The event date lies in the past
    DateInPast,
    /// The capacity must be at least one
    InvalidMaxPlayers,
    /// The capacity can't drop below the current participant count
    MaxPlayersBelowParticipants,
    /// An update without any field
    EmptyUpdate,
    /// The account is already on the roster
    AlreadyParticipant,
    /// No more free places
    EventFull,
    /// The host can't leave their own event
    HostCannotLeave,
    /// The event has not been marked complete yet
    EventNotCompleted,
    /// The account rated this event before
    AlreadyRated,
    /// The rating is out of range
    InvalidRating,
    /// The chat message exceeds the maximum length
    MessageTooLong,
    /// A game result without players
    NoPlayers,
    /// A listed player is not on the roster
    PlayerNotParticipant,
    /// The winner did not play
    WinnerNotAPlayer,

    /// Unknown account
    UnknownAccount,
    /// Unknown event
    UnknownEvent,
    /// Unknown game within an event
    UnknownGame,
    /// Unknown friend request
    UnknownFriendRequest,

    /// A password could not be hashed or a stored hash is invalid
    Hash(argon2::password_hash::Error),
    /// The signed-in snapshot could not be read or written
    Snapshot(String),
}

impl StoreError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotSignedIn
            | StoreError::NotHost
            | StoreError::NotParticipant
            | StoreError::NotRequestReceiver
            | StoreError::LoginFailed => ErrorKind::Authorization,
            StoreError::UnknownAccount
            | StoreError::UnknownEvent
            | StoreError::UnknownGame
            | StoreError::UnknownFriendRequest => ErrorKind::NotFound,
            StoreError::Hash(_) | StoreError::Snapshot(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotSignedIn => write!(f, "You must be logged in to do this"),
            StoreError::NotHost => write!(f, "Only the host can do this"),
            StoreError::NotParticipant => write!(f, "You must be part of the event to do this"),
            StoreError::NotRequestReceiver => {
                write!(f, "Only the receiver can answer a friend request")
            }
            StoreError::LoginFailed => write!(f, "Invalid email or password"),
            StoreError::MissingField(field) => write!(f, "The field {field} is required"),
            StoreError::InvalidEmail => write!(f, "The email address is invalid"),
            StoreError::InvalidPassword => write!(f, "Password must be at least 6 characters"),
            StoreError::EmailAlreadyInUse => write!(f, "Email already in use"),
            StoreError::CannotBefriendSelf => write!(f, "You can't befriend yourself"),
            StoreError::FriendshipAlreadyExists => {
                write!(f, "There is already a friendship or request with this user")
            }
            StoreError::AlreadyFriends => write!(f, "You are already friends"),
            StoreError::DateInPast => write!(f, "Event date must be in the future"),
            StoreError::InvalidMaxPlayers => write!(f, "An event needs at least one place"),
            StoreError::MaxPlayersBelowParticipants => {
                write!(f, "The event already has more participants")
            }
            StoreError::EmptyUpdate => write!(f, "Nothing to update"),
            StoreError::AlreadyParticipant => {
                write!(f, "You are already participating in this event")
            }
            StoreError::EventFull => write!(f, "This event is full"),
            StoreError::HostCannotLeave => {
                write!(f, "As the host, you cannot leave your own event")
            }
            StoreError::EventNotCompleted => write!(f, "The event has not been completed yet"),
            StoreError::AlreadyRated => write!(f, "You have already rated this event"),
            StoreError::InvalidRating => write!(f, "A rating must be between 1 and 5"),
            StoreError::MessageTooLong => write!(f, "The message is too long"),
            StoreError::NoPlayers => write!(f, "A result needs at least one player"),
            StoreError::PlayerNotParticipant => {
                write!(f, "All players must be participants of the event")
            }
            StoreError::WinnerNotAPlayer => write!(f, "The winner must be one of the players"),
            StoreError::UnknownAccount => write!(f, "User not found"),
            StoreError::UnknownEvent => write!(f, "Event not found"),
            StoreError::UnknownGame => write!(f, "Game not found"),
            StoreError::UnknownFriendRequest => write!(f, "Friend request not found"),
            StoreError::Hash(_) => write!(f, "Internal server error"),
            StoreError::Snapshot(_) => write!(f, "Internal server error"),
        }
    }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Hash(value)
    }
}
