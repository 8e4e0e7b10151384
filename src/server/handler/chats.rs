use actix_session::Session;
use actix_web::post;
use actix_web::web::{Data, Json, Path};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chan::{broadcast, WsManagerChan, WsMessage};
use crate::models::ChatMessage;
use crate::server::handler::{ApiErrorResponse, ApiResult, PathUuid};
use crate::server::session::current_account;
use crate::store::{EventRoster, IdentityService};

/// A new message for the chat of an event
#[derive(Deserialize, ToSchema)]
pub struct ChatMessageRequest {
    #[schema(example = "Who brings the snacks?")]
    text: String,
}

/// The posted message
///
/// `message` is `null` if the text was blank and nothing was posted.
#[derive(Serialize, ToSchema)]
pub struct ChatMessageResponse {
    message: Option<ChatMessage>,
}

/// Post a message to the chat of an event
///
/// Only participants can post. The message is pushed to all other participants
/// via websocket.
#[utoipa::path(
    tag = "Chats",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Message has been posted", body = ChatMessageResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
    request_body = ChatMessageRequest,
    security(("session_cookie" = []))
)]
#[post("/events/{uuid}/chat")]
pub async fn send_chat_message(
    path: Path<PathUuid>,
    req: Json<ChatMessageRequest>,
    identity: Data<IdentityService>,
    roster: Data<EventRoster>,
    ws_manager_chan: Data<WsManagerChan>,
    session: Session,
) -> ApiResult<Json<ChatMessageResponse>> {
    let actor = current_account(&identity, &session).await?;

    let message = roster
        .send_chat_message(actor.as_ref(), path.uuid, &req.text)
        .await?;

    if let (Some(message), Some(event), Some(actor)) =
        (&message, roster.get_event(path.uuid).await, &actor)
    {
        broadcast(
            &ws_manager_chan,
            event
                .participants
                .iter()
                .map(|p| p.uuid)
                .filter(|p| *p != actor.uuid),
            WsMessage::IncomingChatMessage {
                event_uuid: event.uuid,
                message: message.clone(),
            },
        )
        .await;
    }

    Ok(Json(ChatMessageResponse { message }))
}
