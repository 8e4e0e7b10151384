//! Candidate games of events and the external game catalog

use actix_session::Session;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::chan::WsManagerChan;
use crate::lookup::{DetailsOutcome, GameCatalog, GameDetails, GameSummary, SearchOutcome};
use crate::models::{Game, GameResult, VoteKind, VoteTally};
use crate::server::handler::events::notify_participants;
use crate::server::handler::{ApiError, ApiErrorResponse, ApiResult, PathUuid};
use crate::server::session::current_account;
use crate::store::{EventRoster, IdentityService, NewGame, NewGameResult};

/// Add a candidate game to an event
///
/// Every participant can add games.
#[utoipa::path(
    tag = "Games",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Game has been added", body = Game),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    request_body = NewGame,
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/games")]
pub async fn add_game(
    path: Path<PathUuid>,
    req: Json<NewGame>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<Game>> {
    let actor = current_account(&identity, &session).await?;

    let game = roster
        .add_game(actor.as_ref(), path.uuid, req.into_inner())
        .await?;

    if let Some(event) = roster.get_event(path.uuid).await {
        notify_participants(&ws_manager_chan, &event).await;
    }

    Ok(Json(game))
}

/// The event and game of a vote
#[derive(Deserialize, IntoParams)]
pub struct PathEventGame {
    /// The event
    uuid: Uuid,
    /// The candidate game of the event
    game_uuid: Uuid,
}

/// A vote for a candidate game
#[derive(Deserialize, ToSchema)]
pub struct VoteRequest {
    kind: VoteKind,
}

/// Vote for a candidate game
///
/// Sending the same vote again removes it, the opposite vote replaces it.
#[utoipa::path(
    tag = "Games",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the new tally of the game", body = VoteTally),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathEventGame),
    request_body = VoteRequest,
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/games/{game_uuid}/vote")]
pub async fn vote_game(
    path: Path<PathEventGame>,
    req: Json<VoteRequest>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<VoteTally>> {
    let actor = current_account(&identity, &session).await?;

    let tally = roster
        .vote_game(actor.as_ref(), path.uuid, path.game_uuid, req.kind)
        .await?;

    if let Some(event) = roster.get_event(path.uuid).await {
        notify_participants(&ws_manager_chan, &event).await;
    }

    Ok(Json(tally))
}

/// Record the outcome of a played game
#[utoipa::path(
    tag = "Games",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Result has been recorded", body = GameResult),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    request_body = NewGameResult,
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/results")]
pub async fn add_game_result(
    path: Path<PathUuid>,
    req: Json<NewGameResult>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<GameResult>> {
    let actor = current_account(&identity, &session).await?;

    let result = roster
        .add_game_result(actor.as_ref(), path.uuid, req.into_inner())
        .await?;

    if let Some(event) = roster.get_event(path.uuid).await {
        notify_participants(&ws_manager_chan, &event).await;
    }

    Ok(Json(result))
}

/// The query of a game search
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchGamesQuery {
    /// Part of a game title
    #[param(example = "catan")]
    query: String,
}

/// The hits of a game search
///
/// `notice` is set if the catalog could not be reached.
#[derive(Serialize, ToSchema)]
pub struct SearchGamesResponse {
    games: Vec<GameSummary>,
    /// A newer search of the same account replaced this one
    superseded: bool,
    #[schema(example = "Game search is currently unavailable")]
    notice: Option<String>,
}

/// Search the game catalog
///
/// Queries shorter than two characters yield no games. Only the latest search of an account
/// within the quiet period is answered, older ones are marked as superseded.
#[utoipa::path(
    tag = "Games",
    context_path = "/api/v1/games",
    responses(
        (status = 200, description = "Returns the found games", body = SearchGamesResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(SearchGamesQuery),
    security(("session_cookie" = []))
)]
#[get("/search")]
pub async fn search_games(
    query: Query<SearchGamesQuery>,
    identity: Data<IdentityService>,
    catalog: Data<GameCatalog>,
    session: Session,
) -> ApiResult<Json<SearchGamesResponse>> {
    let account = current_account(&identity, &session)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    let response = match catalog.search(account.uuid, &query.query).await {
        SearchOutcome::Games(games) => SearchGamesResponse {
            games,
            superseded: false,
            notice: None,
        },
        SearchOutcome::Superseded => SearchGamesResponse {
            games: Vec::new(),
            superseded: true,
            notice: None,
        },
        SearchOutcome::Failed => SearchGamesResponse {
            games: Vec::new(),
            superseded: false,
            notice: Some(String::from("Game search is currently unavailable")),
        },
    };

    Ok(Json(response))
}

/// The record of a game in the catalog
#[derive(Serialize, ToSchema)]
pub struct GameDetailsResponse {
    /// `null` if the catalog doesn't know the game or could not be reached
    game: Option<GameDetails>,
    #[schema(example = "Game details are currently unavailable")]
    notice: Option<String>,
}

/// The catalog id of a game
#[derive(Deserialize, IntoParams)]
pub struct PathGameId {
    #[param(example = "13")]
    id: String,
}

/// Retrieve the details of a game from the catalog
#[utoipa::path(
    tag = "Games",
    context_path = "/api/v1/games",
    responses(
        (status = 200, description = "Returns the game if it is known", body = GameDetailsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathGameId),
    security(("session_cookie" = []))
)]
#[get("/{id}")]
pub async fn get_game_details(
    path: Path<PathGameId>,
    catalog: Data<GameCatalog>,
) -> ApiResult<Json<GameDetailsResponse>> {
    let response = match catalog.details(&path.id).await {
        DetailsOutcome::Found(game) => GameDetailsResponse {
            game: Some(game),
            notice: None,
        },
        DetailsOutcome::Missing => GameDetailsResponse {
            game: None,
            notice: None,
        },
        DetailsOutcome::Failed => GameDetailsResponse {
            game: None,
            notice: Some(String::from("Game details are currently unavailable")),
        },
    };

    Ok(Json(response))
}
