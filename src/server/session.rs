//! The signed-in snapshot inside the session cookie

use actix_session::Session;
use actix_web::web::Data;
use log::debug;

use crate::models::Account;
use crate::server::handler::ApiResult;
use crate::store::{IdentityService, IdentityStore, SnapshotStore, StoreError};

/// The session key of the account snapshot
pub const ACCOUNT_SNAPSHOT_KEY: &str = "board_game_user";

/// A [SnapshotStore] on top of the cookie session of a request
pub struct SessionSnapshot(pub Session);

impl SnapshotStore for SessionSnapshot {
    fn load(&self) -> Result<Option<Account>, StoreError> {
        self.0
            .get(ACCOUNT_SNAPSHOT_KEY)
            .map_err(|err| StoreError::Snapshot(err.to_string()))
    }

    fn save(&mut self, account: &Account) -> Result<(), StoreError> {
        self.0
            .insert(ACCOUNT_SNAPSHOT_KEY, account)
            .map_err(|err| StoreError::Snapshot(err.to_string()))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.0.remove(ACCOUNT_SNAPSHOT_KEY);
        Ok(())
    }
}

/// Build the identity state of the requesting client
pub async fn identity_store(
    identity: &Data<IdentityService>,
    session: Session,
) -> ApiResult<IdentityStore<SessionSnapshot>> {
    Ok(IdentityStore::restore(identity.clone().into_inner(), SessionSnapshot(session)).await?)
}

/// The signed-in account of the requesting client, if there is one.
///
/// Cheaper than [identity_store] as the friend lists are not derived.
pub async fn current_account(
    identity: &IdentityService,
    session: &Session,
) -> ApiResult<Option<Account>> {
    let mut snapshot = SessionSnapshot(session.clone());

    let saved = snapshot.load()?;
    let had_snapshot = saved.is_some();
    let current = identity.resolve_snapshot(saved).await;

    if had_snapshot && current.is_none() {
        debug!("Dropping snapshot of unknown account");
        snapshot.clear()?;
    }

    Ok(current)
}
