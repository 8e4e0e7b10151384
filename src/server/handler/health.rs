use actix_web::get;
use actix_web::web::{Data, Json};
use log::error;
use serde::Serialize;
use tokio::sync::oneshot;
use utoipa::ToSchema;

use crate::chan::{WsManagerChan, WsManagerMessage};
use crate::server::handler::{ApiError, ApiErrorResponse, ApiResult};
use crate::store::{EventRoster, IdentityService};

/// The health data of this server
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = 1337)]
    registered_accounts: u64,
    #[schema(example = 42)]
    events: u64,
    #[schema(example = 31337)]
    open_connections: u64,
}

/// Request health data from this server.
///
/// `registered_accounts` are the currently registered user accounts on the server
/// `events` is the number of all events, completed ones included
/// `open_connections` are the currently open websocket connections
#[utoipa::path(
    tag = "Server status",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Health data of this server", body = HealthResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
)]
#[get("/health")]
pub async fn health(
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
) -> ApiResult<Json<HealthResponse>> {
    let (tx, rx) = oneshot::channel();

    if let Err(err) = ws_manager_chan
        .send(WsManagerMessage::RetrieveWsCount(tx))
        .await
    {
        error!("Could not send to ws manager chan: {err}");
        return Err(ApiError::InternalServerError);
    }

    let connections = rx.await.map_err(|err| {
        error!("Error receiving message from ws manager chan: {err}");
        ApiError::InternalServerError
    })?;

    Ok(Json(HealthResponse {
        registered_accounts: identity.account_count().await as u64,
        events: roster.events().await.len() as u64,
        open_connections: connections,
    }))
}
