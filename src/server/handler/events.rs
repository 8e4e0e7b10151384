//! Listing, creating and managing events

use actix_session::Session;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, put};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::chan::{broadcast, WsManagerChan, WsMessage};
use crate::models::{Event, EventRating};
use crate::server::handler::{ApiError, ApiErrorResponse, ApiResult, PathUuid};
use crate::server::session::current_account;
use crate::store::{EventFilter, EventPatch, EventRoster, IdentityService, NewEvent, StoreError};

/// An event with its derived values
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(flatten)]
    event: Event,
    /// The mean of all ratings, `null` if there are none
    #[schema(example = 4.5)]
    average_rating: Option<f64>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            average_rating: event.average_rating(),
            event,
        }
    }
}

/// Tell every participant of `event` to fetch it again
pub(crate) async fn notify_participants(ws_manager_chan: &WsManagerChan, event: &Event) {
    broadcast(
        ws_manager_chan,
        event.participants.iter().map(|p| p.uuid),
        WsMessage::EventUpdated {
            event_uuid: event.uuid,
        },
    )
    .await;
}

/// The filters of the event listing
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetEventsQuery {
    /// Only events in exactly this city
    city: Option<String>,
    /// Only events on this day
    #[param(example = "2024-05-01")]
    date: Option<NaiveDate>,
}

/// The events matching the filters
#[derive(Serialize, ToSchema)]
pub struct GetEventsResponse {
    events: Vec<EventResponse>,
}

/// Retrieve all events
///
/// Events are returned in order of creation.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the matching events", body = GetEventsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(GetEventsQuery),
)]
#[get("/events")]
pub async fn get_events(
    query: Query<GetEventsQuery>,
    roster: Data<EventRoster>,
) -> ApiResult<Json<GetEventsResponse>> {
    let query = query.into_inner();
    let filter = EventFilter {
        city: query.city.filter(|c| !c.trim().is_empty()),
        date: query.date,
    };

    let events = roster.filtered_events(&filter).await;

    Ok(Json(GetEventsResponse {
        events: events.into_iter().map(EventResponse::from).collect(),
    }))
}

/// Create a new event
///
/// The creator becomes host and first participant.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Event has been created", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    request_body = NewEvent,
    security(("session_cookie" = []))
)]
#[post("/events")]
pub async fn create_event(
    req: Json<NewEvent>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    session: Session,
) -> ApiResult<Json<EventResponse>> {
    let actor = current_account(&identity, &session).await?;

    let event = roster.create_event(actor.as_ref(), req.into_inner()).await?;

    Ok(Json(EventResponse::from(event)))
}

/// The events of the current account
#[derive(Serialize, ToSchema)]
pub struct MyEventsResponse {
    hosted: Vec<EventResponse>,
    participating: Vec<EventResponse>,
}

/// Retrieve the events the current account hosts or joined
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the events of the account", body = MyEventsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    security(("session_cookie" = []))
)]
#[get("/events/mine")]
pub async fn get_my_events(
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    session: Session,
) -> ApiResult<Json<MyEventsResponse>> {
    let actor = current_account(&identity, &session)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    let mine = roster.my_events(actor.uuid).await;

    Ok(Json(MyEventsResponse {
        hosted: mine.hosted.into_iter().map(EventResponse::from).collect(),
        participating: mine
            .participating
            .into_iter()
            .map(EventResponse::from)
            .collect(),
    }))
}

/// Retrieve a single event
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the event", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
)]
#[get("/events/{uuid}")]
pub async fn get_event(
    path: Path<PathUuid>,
    roster: Data<EventRoster>,
) -> ApiResult<Json<EventResponse>> {
    let event = roster
        .get_event(path.uuid)
        .await
        .ok_or(StoreError::UnknownEvent)?;

    Ok(Json(EventResponse::from(event)))
}

/// Update an event
///
/// Only the host can update an event. Fields that are left out stay as they are.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Event has been updated", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    request_body = EventPatch,
    security(("session_cookie" = []))
)]
#[put("/events/{uuid}")]
pub async fn update_event(
    path: Path<PathUuid>,
    req: Json<EventPatch>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<EventResponse>> {
    let actor = current_account(&identity, &session).await?;

    let event = roster
        .update_event(actor.as_ref(), path.uuid, req.into_inner())
        .await?;

    notify_participants(&ws_manager_chan, &event).await;

    Ok(Json(EventResponse::from(event)))
}

/// Join an event
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Joined the event", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/join")]
pub async fn join_event(
    path: Path<PathUuid>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<EventResponse>> {
    let actor = current_account(&identity, &session).await?;

    let event = roster.join_event(actor.as_ref(), path.uuid).await?;

    notify_participants(&ws_manager_chan, &event).await;

    Ok(Json(EventResponse::from(event)))
}

/// Leave an event
///
/// The host can't leave their own event.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Left the event", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/leave")]
pub async fn leave_event(
    path: Path<PathUuid>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<EventResponse>> {
    let actor = current_account(&identity, &session).await?;

    let event = roster.leave_event(actor.as_ref(), path.uuid).await?;

    notify_participants(&ws_manager_chan, &event).await;

    Ok(Json(EventResponse::from(event)))
}

/// Mark an event as completed
///
/// Only the host can do this. Participants can rate the event afterwards.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Event has been completed", body = EventResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/complete")]
pub async fn complete_event(
    path: Path<PathUuid>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<EventResponse>> {
    let actor = current_account(&identity, &session).await?;

    let event = roster.mark_event_complete(actor.as_ref(), path.uuid).await?;

    notify_participants(&ws_manager_chan, &event).await;

    Ok(Json(EventResponse::from(event)))
}

/// The rating of an event
#[derive(Deserialize, ToSchema)]
pub struct RateEventRequest {
    /// From 1 to 5
    #[schema(example = 5)]
    rating: u8,
    #[schema(example = "Great evening!")]
    comment: Option<String>,
}

/// Rate a completed event
///
/// Every participant can rate an event once.
#[utoipa::path(
    tag = "Events",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Rating has been recorded", body = EventRating),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    request_body = RateEventRequest,
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/ratings")]
pub async fn rate_event(
    path: Path<PathUuid>,
    req: Json<RateEventRequest>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<EventRating>> {
    let actor = current_account(&identity, &session).await?;

    let req = req.into_inner();
    let rating = roster
        .rate_event(actor.as_ref(), path.uuid, req.rating, req.comment)
        .await?;

    if let Some(event) = roster.get_event(path.uuid).await {
        notify_participants(&ws_manager_chan, &event).await;
    }

    Ok(Json(rating))
}
