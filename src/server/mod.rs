//! This module holds the server definition

use std::net::SocketAddr;
use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_toolbox::tb_middleware::{setup_logging_mw, LoggingMiddlewareConfig};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::middleware::{Compress, ErrorHandlers};
use actix_web::web::{scope, Data, JsonConfig, PayloadConfig, ServiceConfig};
use actix_web::{App, HttpServer};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use log::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::chan::WsManagerChan;
use crate::config::Config;
use crate::lookup::GameCatalog;
use crate::server::error::StartServerError;
use crate::server::handler::*;
use crate::server::middleware::{handle_not_found, json_extractor_error, AuthenticationRequired};
use crate::server::swagger::ApiDoc;
use crate::store::{EventRoster, IdentityService};

pub mod error;
pub mod handler;
pub mod middleware;
pub mod session;
pub mod swagger;

/// The name of the session cookie
pub const SESSION_COOKIE: &str = "meeplemeet_session";

/// Decode the base64 encoded secret key of the configuration
pub fn decode_secret_key(secret_key: &str) -> Result<Key, StartServerError> {
    let bytes = BASE64_STANDARD
        .decode(secret_key.trim())
        .map_err(|err| StartServerError::InvalidSecretKey(err.to_string()))?;

    Key::try_from(bytes.as_slice())
        .map_err(|err| StartServerError::InvalidSecretKey(err.to_string()))
}

/// The session middleware storing the signed-in snapshot in an encrypted cookie
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(secure)
        .build()
}

/// Answers unknown routes with a json error
pub fn not_found_handler<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::NOT_FOUND, handle_not_found)
}

/// Register all routes of the api.
///
/// Expects [IdentityService], [EventRoster], [GameCatalog] and [WsManagerChan] as app data
/// and a session middleware around it.
pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(json_extractor_error))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .service(version)
        .service(
            scope("/api/v1/games")
                .wrap(AuthenticationRequired)
                .service(search_games)
                .service(get_game_details),
        )
        .service(
            scope("/api/v1/ws")
                .wrap(AuthenticationRequired)
                .service(websocket),
        )
        .service(
            scope("/api/v1")
                .service(health)
                .service(register_account)
                .service(login)
                .service(login_with_google)
                .service(logout)
                .service(get_me)
                .service(update_me)
                .service(search_accounts)
                .service(lookup_account)
                .service(get_friends)
                .service(create_friend_request)
                .service(accept_friend_request)
                .service(decline_friend_request)
                .service(get_events)
                .service(create_event)
                .service(get_my_events)
                .service(get_event)
                .service(update_event)
                .service(join_event)
                .service(leave_event)
                .service(complete_event)
                .service(rate_event)
                .service(add_game)
                .service(vote_game)
                .service(add_game_result)
                .service(send_chat_message),
        );
}

/// Start the meeplemeet server
///
/// **Parameter**:
/// - `config`: Reference to a [Config] struct
/// - `identity`: [IdentityService] : accounts and friendships
/// - `roster`: [EventRoster] : all events
/// - `catalog`: [GameCatalog] : the external game lookup
/// - `ws_manager_chan`: [WsManagerChan] : The channel to manage websocket connections
pub async fn start_server(
    config: &Config,
    identity: Arc<IdentityService>,
    roster: Arc<EventRoster>,
    catalog: Arc<GameCatalog>,
    ws_manager_chan: WsManagerChan,
) -> Result<(), StartServerError> {
    let s_addr = SocketAddr::new(config.server.listen_address, config.server.listen_port);
    let key = decode_secret_key(&config.server.secret_key)?;
    let secure_cookies = config.server.secure_cookies;

    let identity = Data::from(identity);
    let roster = Data::from(roster);
    let catalog = Data::from(catalog);

    info!("Starting to listen on {}", s_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(PayloadConfig::default())
            .app_data(identity.clone())
            .app_data(roster.clone())
            .app_data(catalog.clone())
            .app_data(Data::new(ws_manager_chan.clone()))
            .wrap(session_middleware(key.clone(), secure_cookies))
            .wrap(setup_logging_mw(LoggingMiddlewareConfig::default()))
            .wrap(Compress::default())
            .wrap(not_found_handler())
            .configure(configure_routes)
    })
    .bind(s_addr)?
    .run()
    .await?;

    Ok(())
}
