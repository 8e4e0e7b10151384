//! This module holds the handler of meeplemeet

use std::fmt::{Display, Formatter};

use actix_session::SessionGetError;
use actix_web::body::BoxBody;
use actix_web::error::JsonPayloadError;
use actix_web::HttpResponse;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub use crate::server::handler::accounts::*;
pub use crate::server::handler::auth::*;
pub use crate::server::handler::chats::*;
pub use crate::server::handler::events::*;
pub use crate::server::handler::friends::*;
pub use crate::server::handler::games::*;
pub use crate::server::handler::health::*;
pub use crate::server::handler::version::*;
pub use crate::server::handler::websocket::*;
use crate::store::{ErrorKind, StoreError};

pub mod accounts;
pub mod auth;
pub mod chats;
pub mod events;
pub mod friends;
pub mod games;
pub mod health;
pub mod version;
pub mod websocket;

/// The result that is used throughout the complete api.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize_repr, ToSchema, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub(crate) enum ApiStatusCode {
    Unauthenticated = 1000,
    LoginFailed = 1001,
    NotHost = 1002,
    NotParticipant = 1003,
    NotRequestReceiver = 1004,

    MissingField = 1100,
    InvalidEmail = 1101,
    InvalidPassword = 1102,
    EmailAlreadyInUse = 1103,
    CannotBefriendSelf = 1104,
    FriendshipAlreadyExists = 1105,
    AlreadyFriends = 1106,

    DateInPast = 1200,
    InvalidMaxPlayers = 1201,
    MaxPlayersBelowParticipants = 1202,
    EmptyJson = 1203,
    AlreadyParticipant = 1204,
    EventFull = 1205,
    HostCannotLeave = 1206,
    EventNotCompleted = 1207,
    AlreadyRated = 1208,
    InvalidRating = 1209,
    MessageTooLong = 1210,
    NoPlayers = 1211,
    PlayerNotParticipant = 1212,
    WinnerNotAPlayer = 1213,

    InvalidUuid = 1300,
    InvalidEventUuid = 1301,
    InvalidGameUuid = 1302,
    InvalidFriendRequestUuid = 1303,
    NotFound = 1304,
    InvalidJson = 1305,

    InternalServerError = 2000,
    SessionError = 2001,
}

impl From<&StoreError> for ApiStatusCode {
    fn from(value: &StoreError) -> Self {
        match value {
            StoreError::NotSignedIn => Self::Unauthenticated,
            StoreError::NotHost => Self::NotHost,
            StoreError::NotParticipant => Self::NotParticipant,
            StoreError::NotRequestReceiver => Self::NotRequestReceiver,
            StoreError::LoginFailed => Self::LoginFailed,
            StoreError::MissingField(_) => Self::MissingField,
            StoreError::InvalidEmail => Self::InvalidEmail,
            StoreError::InvalidPassword => Self::InvalidPassword,
            StoreError::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            StoreError::CannotBefriendSelf => Self::CannotBefriendSelf,
            StoreError::FriendshipAlreadyExists => Self::FriendshipAlreadyExists,
            StoreError::AlreadyFriends => Self::AlreadyFriends,
            StoreError::DateInPast => Self::DateInPast,
            StoreError::InvalidMaxPlayers => Self::InvalidMaxPlayers,
            StoreError::MaxPlayersBelowParticipants => Self::MaxPlayersBelowParticipants,
            StoreError::EmptyUpdate => Self::EmptyJson,
            StoreError::AlreadyParticipant => Self::AlreadyParticipant,
            StoreError::EventFull => Self::EventFull,
            StoreError::HostCannotLeave => Self::HostCannotLeave,
            StoreError::EventNotCompleted => Self::EventNotCompleted,
            StoreError::AlreadyRated => Self::AlreadyRated,
            StoreError::InvalidRating => Self::InvalidRating,
            StoreError::MessageTooLong => Self::MessageTooLong,
            StoreError::NoPlayers => Self::NoPlayers,
            StoreError::PlayerNotParticipant => Self::PlayerNotParticipant,
            StoreError::WinnerNotAPlayer => Self::WinnerNotAPlayer,
            StoreError::UnknownAccount => Self::InvalidUuid,
            StoreError::UnknownEvent => Self::InvalidEventUuid,
            StoreError::UnknownGame => Self::InvalidGameUuid,
            StoreError::UnknownFriendRequest => Self::InvalidFriendRequestUuid,
            StoreError::Hash(_) => Self::InternalServerError,
            StoreError::Snapshot(_) => Self::SessionError,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub(crate) struct ApiErrorResponse {
    #[schema(example = "Error message is here")]
    message: String,
    #[schema(example = 1000)]
    status_code: ApiStatusCode,
}

impl ApiErrorResponse {
    fn new(status_code: ApiStatusCode, message: String) -> Self {
        Self {
            message,
            status_code,
        }
    }
}

/// A uuid in the path of a request
#[derive(Deserialize, IntoParams)]
pub struct PathUuid {
    pub(crate) uuid: Uuid,
}

/// This enum holds all possible error types that can occur in the API
#[derive(Debug)]
pub enum ApiError {
    /// The user is not allowed to access the resource
    Unauthenticated,
    /// The requested route does not exist
    NotFound,
    /// The json body could not be parsed
    InvalidJson(JsonPayloadError),
    /// Unspecified error on the server side
    InternalServerError,

    /// The session could not be read
    SessionGet(SessionGetError),

    /// The stores rejected the operation
    Store(StoreError),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthenticated => write!(f, "Unauthenticated"),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::InvalidJson(err) => write!(f, "Invalid json: {err}"),
            ApiError::InternalServerError => write!(f, "Internal server error"),
            ApiError::SessionGet(_) => write!(f, "Session error occurred"),
            ApiError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ApiError::Unauthenticated => {
                trace!("Unauthenticated");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::Unauthenticated,
                    self.to_string(),
                ))
            }
            ApiError::NotFound => HttpResponse::NotFound().json(ApiErrorResponse::new(
                ApiStatusCode::NotFound,
                self.to_string(),
            )),
            ApiError::InvalidJson(err) => {
                debug!("Received invalid json: {err}");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::InvalidJson,
                    self.to_string(),
                ))
            }
            ApiError::InternalServerError => HttpResponse::InternalServerError().json(
                ApiErrorResponse::new(ApiStatusCode::InternalServerError, self.to_string()),
            ),
            ApiError::SessionGet(err) => {
                error!("Session get error: {err}");

                HttpResponse::InternalServerError().json(ApiErrorResponse::new(
                    ApiStatusCode::SessionError,
                    self.to_string(),
                ))
            }
            ApiError::Store(err) => {
                let body = ApiErrorResponse::new(ApiStatusCode::from(err), self.to_string());

                match err.kind() {
                    ErrorKind::Internal => {
                        error!("Store error: {err:?}");
                        HttpResponse::InternalServerError().json(body)
                    }
                    _ => {
                        debug!("Rejected request: {err}");
                        HttpResponse::BadRequest().json(body)
                    }
                }
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SessionGetError> for ApiError {
    fn from(value: SessionGetError) -> Self {
        Self::SessionGet(value)
    }
}
