use actix_session::Session;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::chan::{broadcast, WsManagerChan, WsMessage};
use crate::models::FriendRequest;
use crate::server::handler::{ApiErrorResponse, ApiResult, PathUuid, PublicAccountResponse};
use crate::server::session::identity_store;
use crate::store::IdentityService;

/// The request of a new friendship
#[derive(Deserialize, ToSchema)]
pub struct CreateFriendRequest {
    /// The uuid of the new friend
    uuid: Uuid,
}

/// Create a new friend request
#[utoipa::path(
    tag = "Friends",
    context_path = "/api/v1",
    responses(
        (status = 201, description = "Friend request has been created"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    request_body = CreateFriendRequest,
    security(("session_cookie" = []))
)]
#[post("/friends/request")]
pub async fn create_friend_request(
    req: Json<CreateFriendRequest>,
    identity: Data<IdentityService>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<HttpResponse> {
    let mut store = identity_store(&identity, session).await?;

    let edge = store.send_friend_request(req.uuid).await?;

    broadcast(
        &ws_manager_chan,
        [edge.to],
        WsMessage::FriendshipChanged {
            account_uuid: edge.from,
        },
    )
    .await;

    Ok(HttpResponse::Created().finish())
}

/// The friends and open friend requests of the current account
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendsResponse {
    friends: Vec<PublicAccountResponse>,
    friend_requests: Vec<FriendRequest>,
}

/// Retrieve the friends of the current account
#[utoipa::path(
    tag = "Friends",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the friends and open requests", body = FriendsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    security(("session_cookie" = []))
)]
#[get("/friends")]
pub async fn get_friends(
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<FriendsResponse>> {
    let store = identity_store(&identity, session).await?;

    Ok(Json(FriendsResponse {
        friends: store
            .friends()
            .iter()
            .map(PublicAccountResponse::from)
            .collect(),
        friend_requests: store.friend_requests().to_vec(),
    }))
}

/// Accept a friend request
///
/// Only the receiver of the request can accept it.
#[utoipa::path(
    tag = "Friends",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Friend request has been accepted"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    security(("session_cookie" = []))
)]
#[post("/friends/{uuid}/accept")]
pub async fn accept_friend_request(
    path: Path<PathUuid>,
    identity: Data<IdentityService>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<HttpResponse> {
    let mut store = identity_store(&identity, session).await?;

    let edge = store.accept_friend_request(path.uuid).await?;

    broadcast(
        &ws_manager_chan,
        [edge.from],
        WsMessage::FriendshipChanged {
            account_uuid: edge.to,
        },
    )
    .await;

    Ok(HttpResponse::Ok().finish())
}

/// Decline a friend request
///
/// Both sides of the request can decline it, the requester withdraws it that way.
#[utoipa::path(
    tag = "Friends",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Friend request has been removed"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    security(("session_cookie" = []))
)]
#[post("/friends/{uuid}/decline")]
pub async fn decline_friend_request(
    path: Path<PathUuid>,
    identity: Data<IdentityService>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<HttpResponse> {
    let mut store = identity_store(&identity, session).await?;

    let edge = store.decline_friend_request(path.uuid).await?;

    if let Some(me) = store.current() {
        broadcast(
            &ws_manager_chan,
            [edge.other(me.uuid)],
            WsMessage::FriendshipChanged {
                account_uuid: me.uuid,
            },
        )
        .await;
    }

    Ok(HttpResponse::Ok().finish())
}
