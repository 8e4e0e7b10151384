//! This module holds all endpoints regarding authentication

use actix_session::Session;
use actix_web::web::{Data, Json};
use actix_web::{post, HttpResponse};
use log::error;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::chan::{WsManagerChan, WsManagerMessage};
use crate::models::Account;
use crate::server::handler::{ApiErrorResponse, ApiResult};
use crate::server::session::identity_store;
use crate::store::IdentityService;

/// The request data of a login request
#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    #[schema(example = "john@example.com")]
    email: String,
    #[schema(example = "super-secure-password")]
    password: String,
}

/// Login to meeplemeet
///
/// On successful login the session cookie holds the returned account.
#[utoipa::path(
    tag = "Authentication",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Login successful", body = Account),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse)
    ),
    request_body = LoginRequest,
)]
#[post("/auth/login")]
pub async fn login(
    req: Json<LoginRequest>,
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<Account>> {
    let mut store = identity_store(&identity, session).await?;

    let account = store.login(&req.email, &req.password).await?;

    Ok(Json(account.clone()))
}

/// Login with a federated account
///
/// This signs in as an arbitrary existing account.
#[utoipa::path(
    tag = "Authentication",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Login successful", body = Account),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse)
    ),
)]
#[post("/auth/google")]
pub async fn login_with_google(
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<Account>> {
    let mut store = identity_store(&identity, session).await?;

    let account = store.login_with_google().await?;

    Ok(Json(account.clone()))
}

/// Log out of this session
///
/// Clears the signed-in account and closes its websockets.
/// Logging out while not being logged in does nothing.
#[utoipa::path(
    tag = "Authentication",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse)
    ),
)]
#[post("/auth/logout")]
pub async fn logout(
    identity: Data<IdentityService>,
    session: Session,
    ws_manager_chan: Data<WsManagerChan>,
) -> ApiResult<HttpResponse> {
    let mut store = identity_store(&identity, session).await?;
    let signed_in = store.current().map(|a| a.uuid);

    store.logout()?;

    if let Some(uuid) = signed_in {
        if let Err(err) = ws_manager_chan
            .send(WsManagerMessage::CloseSocket(uuid))
            .await
        {
            error!("Could not send to ws manager chan: {err}");
        }
    }

    Ok(HttpResponse::Ok().finish())
}
