//! This module holds the definition of the swagger declaration

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::server::{handler, SESSION_COOKIE};

struct CookieSecurity;

impl Modify for CookieSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            )
        }
    }
}

/// Helper struct for the openapi definitions.
#[derive(OpenApi)]
#[openapi(
    paths(
        handler::version,
        handler::health,
        handler::register_account,
        handler::login,
        handler::login_with_google,
        handler::logout,
        handler::get_me,
        handler::update_me,
        handler::search_accounts,
        handler::lookup_account,
        handler::get_friends,
        handler::create_friend_request,
        handler::accept_friend_request,
        handler::decline_friend_request,
        handler::get_events,
        handler::create_event,
        handler::get_my_events,
        handler::get_event,
        handler::update_event,
        handler::join_event,
        handler::leave_event,
        handler::complete_event,
        handler::rate_event,
        handler::add_game,
        handler::vote_game,
        handler::add_game_result,
        handler::send_chat_message,
        handler::search_games,
        handler::get_game_details,
        handler::websocket,
    ),
    components(schemas(
        handler::ApiErrorResponse,
        handler::ApiStatusCode,
        handler::VersionResponse,
        handler::HealthResponse,
        handler::AccountRegistrationRequest,
        handler::LoginRequest,
        handler::MeResponse,
        handler::UpdateAccountRequest,
        handler::PublicAccountResponse,
        handler::SearchAccountsRequest,
        handler::SearchAccountsResponse,
        handler::FriendsResponse,
        handler::CreateFriendRequest,
        handler::EventResponse,
        handler::GetEventsResponse,
        handler::MyEventsResponse,
        handler::RateEventRequest,
        handler::VoteRequest,
        handler::ChatMessageRequest,
        handler::ChatMessageResponse,
        handler::SearchGamesResponse,
        handler::GameDetailsResponse,
    )),
    modifiers(&CookieSecurity)
)]
pub struct ApiDoc;
