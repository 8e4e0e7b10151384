//! All handlers for the account endpoints live in here

use actix_session::Session;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, put};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Account, FriendRequest};
use crate::server::handler::{ApiErrorResponse, ApiResult, PathUuid};
use crate::server::session::{identity_store, SessionSnapshot};
use crate::store::{IdentityService, IdentityStore, ProfileUpdate, StoreError};

/// The content to register a new account
#[derive(Debug, Deserialize, ToSchema)]
pub struct AccountRegistrationRequest {
    #[schema(example = "new@example.com")]
    email: String,
    #[schema(example = "super-secure-password")]
    password: String,
    #[schema(example = "Nick")]
    nickname: String,
    #[schema(example = "Metro")]
    city: String,
}

/// The parts of an account that are visible to everyone
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccountResponse {
    pub(crate) uuid: Uuid,
    #[schema(example = "AliceCards")]
    pub(crate) nickname: String,
    #[schema(example = "San Francisco")]
    pub(crate) city: String,
    pub(crate) photo_url: Option<String>,
}

impl From<&Account> for PublicAccountResponse {
    fn from(value: &Account) -> Self {
        Self {
            uuid: value.uuid,
            nickname: value.nickname.clone(),
            city: value.city.clone(),
            photo_url: value.photo_url.clone(),
        }
    }
}

/// The identity state of the client
///
/// `account` is `null` if the client is not logged in.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    account: Option<Account>,
    friends: Vec<PublicAccountResponse>,
    friend_requests: Vec<FriendRequest>,
}

impl From<&IdentityStore<SessionSnapshot>> for MeResponse {
    fn from(store: &IdentityStore<SessionSnapshot>) -> Self {
        Self {
            account: store.current().cloned(),
            friends: store.friends().iter().map(PublicAccountResponse::from).collect(),
            friend_requests: store.friend_requests().to_vec(),
        }
    }
}

/// Register a new account
///
/// The new account is logged in right away.
#[utoipa::path(
    tag = "Accounts",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Account got created", body = MeResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    request_body = AccountRegistrationRequest,
)]
#[post("/accounts/register")]
pub async fn register_account(
    req: Json<AccountRegistrationRequest>,
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<MeResponse>> {
    let mut store = identity_store(&identity, session).await?;

    store
        .register(&req.email, &req.password, &req.nickname, &req.city)
        .await?;

    Ok(Json(MeResponse::from(&store)))
}

/// Returns the identity state of the client
#[utoipa::path(
    tag = "Accounts",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the account data of the current user", body = MeResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    security(("session_cookie" = []))
)]
#[get("/accounts/me")]
pub async fn get_me(
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<MeResponse>> {
    let store = identity_store(&identity, session).await?;

    Ok(Json(MeResponse::from(&store)))
}

/// Update account request data
///
/// `photo_url` is optional, an empty string removes the photo.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[schema(example = "Dicey")]
    nickname: String,
    #[schema(example = "Boston")]
    city: String,
    photo_url: Option<String>,
}

/// Updates the currently logged-in account
///
/// Existing event rosters keep the old nickname.
/// Nothing happens if the client is not logged in.
#[utoipa::path(
    tag = "Accounts",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Account has been updated", body = MeResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    request_body = UpdateAccountRequest,
    security(("session_cookie" = []))
)]
#[put("/accounts/me")]
pub async fn update_me(
    req: Json<UpdateAccountRequest>,
    identity: Data<IdentityService>,
    session: Session,
) -> ApiResult<Json<MeResponse>> {
    let mut store = identity_store(&identity, session).await?;

    let req = req.into_inner();
    store
        .update_profile(ProfileUpdate {
            nickname: req.nickname,
            city: req.city,
            photo_url: req.photo_url,
        })
        .await?;

    Ok(Json(MeResponse::from(&store)))
}

/// Retrieve the public details of an account by uuid
#[utoipa::path(
    tag = "Accounts",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the requested account data", body = PublicAccountResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    params(PathUuid),
)]
#[get("/accounts/{uuid}")]
pub async fn lookup_account(
    req: Path<PathUuid>,
    identity: Data<IdentityService>,
) -> ApiResult<Json<PublicAccountResponse>> {
    let account = identity
        .find_account(req.uuid)
        .await
        .ok_or(StoreError::UnknownAccount)?;

    Ok(Json(PublicAccountResponse::from(&account)))
}

/// The request to search accounts by nickname
#[derive(Deserialize, ToSchema)]
pub struct SearchAccountsRequest {
    #[schema(example = "alice")]
    query: String,
}

/// The accounts matching a search
#[derive(Serialize, ToSchema)]
pub struct SearchAccountsResponse {
    accounts: Vec<PublicAccountResponse>,
}

/// Search accounts by nickname
///
/// The search is case-insensitive and matches parts of nicknames.
#[utoipa::path(
    tag = "Accounts",
    context_path = "/api/v1",
    responses(
        (status = 200, description = "Returns the matching accounts", body = SearchAccountsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 500, description = "Server error", body = ApiErrorResponse),
    ),
    request_body = SearchAccountsRequest,
)]
#[post("/accounts/search")]
pub async fn search_accounts(
    req: Json<SearchAccountsRequest>,
    identity: Data<IdentityService>,
) -> ApiResult<Json<SearchAccountsResponse>> {
    let accounts = identity.search_accounts(&req.query).await;

    Ok(Json(SearchAccountsResponse {
        accounts: accounts.iter().map(PublicAccountResponse::from).collect(),
    }))
}
