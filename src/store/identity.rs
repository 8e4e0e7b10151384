//! Accounts, sign-in state and friendships

use std::sync::Arc;
use std::time::Duration;

use argon2::password_hash::{Error, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use email_address_parser::EmailAddress;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::thread_rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Account, AccountRecord, FriendEdge, FriendRequest, FriendStatus};
use crate::store::{SharedRepository, SnapshotStore, StoreError};

/// The minimal length of a password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Fields of a profile update
#[derive(Clone, Debug)]
pub struct ProfileUpdate {
    /// The new nickname
    pub nickname: String,
    /// The new city
    pub city: String,
    /// A new photo reference, `None` keeps the current one
    pub photo_url: Option<String>,
}

/// The account logic that is shared between all clients.
///
/// Every public operation waits for the configured latency before it resolves.
pub struct IdentityService {
    accounts: SharedRepository<AccountRecord>,
    friendships: SharedRepository<FriendEdge>,
    latency: Duration,
    tx: Mutex<()>,
}

impl IdentityService {
    /// Create a new service on top of the given repositories
    pub fn new(
        accounts: SharedRepository<AccountRecord>,
        friendships: SharedRepository<FriendEdge>,
        latency: Duration,
    ) -> Self {
        Self {
            accounts,
            friendships,
            latency,
            tx: Mutex::new(()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Create a new account.
    ///
    /// The returned account is signed-out, it's up to the caller to sign it in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
        city: &str,
    ) -> Result<Account, StoreError> {
        self.simulate_latency().await;

        let email = email.trim();
        let nickname = nickname.trim();
        let city = city.trim();

        require("email", email)?;
        require("password", password)?;
        require("nickname", nickname)?;
        require("city", city)?;

        if EmailAddress::parse(email, None).is_none() {
            return Err(StoreError::InvalidEmail);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(StoreError::InvalidPassword);
        }

        let salt = SaltString::generate(&mut thread_rng());
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let _tx = self.tx.lock().await;

        if self.find_by_email(email).await.is_some() {
            return Err(StoreError::EmailAlreadyInUse);
        }

        let record = AccountRecord {
            uuid: Uuid::new_v4(),
            email: email.to_string(),
            nickname: nickname.to_string(),
            city: city.to_string(),
            photo_url: None,
            password_hash,
        };
        self.accounts.insert(record.clone()).await;

        info!("Registered account {}", record.uuid);

        Ok(record.to_account(false))
    }

    /// Check email and password.
    ///
    /// Both have to match exactly.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, StoreError> {
        self.simulate_latency().await;

        let record = self
            .find_by_email(email)
            .await
            .ok_or(StoreError::LoginFailed)?;

        Argon2::default()
            .verify_password(
                password.as_bytes(),
                &PasswordHash::new(&record.password_hash)?,
            )
            .map_err(|e| match e {
                Error::Password => StoreError::LoginFailed,
                _ => StoreError::Hash(e),
            })?;

        Ok(record.to_account(true))
    }

    /// Stand-in for a federated login: picks an arbitrary existing account
    pub async fn any_account(&self) -> Result<Account, StoreError> {
        self.simulate_latency().await;

        let accounts = self.accounts.list().await;
        let record = accounts
            .choose(&mut thread_rng())
            .ok_or(StoreError::UnknownAccount)?;

        Ok(record.to_account(true))
    }

    /// Overwrite nickname, city and optionally the photo of an account
    pub async fn update_profile(
        &self,
        uuid: Uuid,
        update: ProfileUpdate,
    ) -> Result<Account, StoreError> {
        self.simulate_latency().await;

        let nickname = update.nickname.trim();
        let city = update.city.trim();
        require("nickname", nickname)?;
        require("city", city)?;

        let _tx = self.tx.lock().await;

        let mut record = self
            .accounts
            .find(uuid)
            .await
            .ok_or(StoreError::UnknownAccount)?;

        record.nickname = nickname.to_string();
        record.city = city.to_string();
        if let Some(photo_url) = update.photo_url {
            record.photo_url = Some(photo_url).filter(|p| !p.trim().is_empty());
        }

        if !self.accounts.update(record.clone()).await {
            return Err(StoreError::UnknownAccount);
        }

        Ok(record.to_account(true))
    }

    /// Retrieve an account by its uuid
    pub async fn find_account(&self, uuid: Uuid) -> Option<Account> {
        self.accounts
            .find(uuid)
            .await
            .map(|record| record.to_account(false))
    }

    /// Search accounts whose nickname contains `query`, ignoring case
    pub async fn search_accounts(&self, query: &str) -> Vec<Account> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.accounts
            .list()
            .await
            .into_iter()
            .filter(|r| r.nickname.to_lowercase().contains(&query))
            .map(|r| r.to_account(false))
            .collect()
    }

    /// The number of registered accounts
    pub async fn account_count(&self) -> usize {
        self.accounts.list().await.len()
    }

    /// Send a friend request from `from` to `to`.
    ///
    /// Fails if there is already an edge between both, in any direction and any state.
    pub async fn send_friend_request(&self, from: Uuid, to: Uuid) -> Result<FriendEdge, StoreError> {
        self.simulate_latency().await;

        if from == to {
            return Err(StoreError::CannotBefriendSelf);
        }

        let _tx = self.tx.lock().await;

        if self.accounts.find(to).await.is_none() {
            return Err(StoreError::UnknownAccount);
        }

        if self
            .friendships
            .list()
            .await
            .iter()
            .any(|edge| edge.connects(from, to))
        {
            return Err(StoreError::FriendshipAlreadyExists);
        }

        let edge = FriendEdge {
            uuid: Uuid::new_v4(),
            from,
            to,
            status: FriendStatus::Pending,
            created_at: Utc::now(),
        };
        self.friendships.insert(edge.clone()).await;

        debug!("Friend request {} from {from} to {to}", edge.uuid);

        Ok(edge)
    }

    /// Accept a pending request that `receiver` received
    pub async fn accept_friend_request(
        &self,
        receiver: Uuid,
        request: Uuid,
    ) -> Result<FriendEdge, StoreError> {
        self.simulate_latency().await;

        let _tx = self.tx.lock().await;

        let mut edge = self
            .friendships
            .find(request)
            .await
            .ok_or(StoreError::UnknownFriendRequest)?;

        if edge.to != receiver {
            return Err(StoreError::NotRequestReceiver);
        }

        if edge.status == FriendStatus::Accepted {
            return Err(StoreError::AlreadyFriends);
        }

        edge.status = FriendStatus::Accepted;
        if !self.friendships.update(edge.clone()).await {
            return Err(StoreError::UnknownFriendRequest);
        }

        Ok(edge)
    }

    /// Delete a request.
    ///
    /// The receiver declines it, the sender withdraws it.
    pub async fn decline_friend_request(
        &self,
        account: Uuid,
        request: Uuid,
    ) -> Result<FriendEdge, StoreError> {
        self.simulate_latency().await;

        let _tx = self.tx.lock().await;

        let edge = self
            .friendships
            .find(request)
            .await
            .ok_or(StoreError::UnknownFriendRequest)?;

        if !edge.touches(account) {
            return Err(StoreError::UnknownFriendRequest);
        }

        if !self.friendships.delete(edge.uuid).await {
            return Err(StoreError::UnknownFriendRequest);
        }

        Ok(edge)
    }

    /// All accounts that have an accepted friendship with `account`
    pub async fn friends_of(&self, account: Uuid) -> Vec<Account> {
        let mut friends = Vec::new();

        for edge in self.friendships.list().await {
            if edge.status != FriendStatus::Accepted || !edge.touches(account) {
                continue;
            }

            if let Some(record) = self.accounts.find(edge.other(account)).await {
                friends.push(record.to_account(false));
            }
        }

        friends
    }

    /// All pending requests `account` has received
    pub async fn friend_requests_for(&self, account: Uuid) -> Vec<FriendRequest> {
        let mut requests = Vec::new();

        for edge in self.friendships.list().await {
            if edge.status != FriendStatus::Pending || edge.to != account {
                continue;
            }

            if let Some(record) = self.accounts.find(edge.from).await {
                requests.push(FriendRequest {
                    uuid: edge.uuid,
                    from: edge.from,
                    from_nickname: record.nickname,
                    from_city: record.city,
                    created_at: edge.created_at,
                });
            }
        }

        requests
    }

    /// Validate a snapshot against the repository.
    ///
    /// Returns the current state of the account, or `None` if it doesn't exist anymore.
    pub async fn resolve_snapshot(&self, snapshot: Option<Account>) -> Option<Account> {
        let snapshot = snapshot?;

        self.accounts
            .find(snapshot.uuid)
            .await
            .map(|record| record.to_account(true))
    }

    async fn find_by_email(&self, email: &str) -> Option<AccountRecord> {
        self.accounts
            .list()
            .await
            .into_iter()
            .find(|r| r.email == email)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::MissingField(field));
    }
    Ok(())
}

/// The identity state of one client.
///
/// Holds the signed-in account and the friend lists derived from it.
/// The snapshot is read once on [IdentityStore::restore] and rewritten after every
/// successful change of the signed-in account.
pub struct IdentityStore<S> {
    service: Arc<IdentityService>,
    snapshot: S,
    current: Option<Account>,
    friends: Vec<Account>,
    friend_requests: Vec<FriendRequest>,
}

impl<S: SnapshotStore> IdentityStore<S> {
    /// Build the store from the persisted snapshot.
    ///
    /// A snapshot of an account that no longer exists is cleared.
    pub async fn restore(service: Arc<IdentityService>, snapshot: S) -> Result<Self, StoreError> {
        let saved = snapshot.load()?;
        let had_snapshot = saved.is_some();
        let current = service.resolve_snapshot(saved).await;

        let mut store = Self {
            service,
            snapshot,
            current,
            friends: Vec::new(),
            friend_requests: Vec::new(),
        };

        if had_snapshot && store.current.is_none() {
            debug!("Dropping snapshot of unknown account");
            store.snapshot.clear()?;
        }

        store.refresh().await;

        Ok(store)
    }

    /// The signed-in account
    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// Accounts with an accepted friendship with the signed-in account
    pub fn friends(&self) -> &[Account] {
        &self.friends
    }

    /// Pending requests the signed-in account received
    pub fn friend_requests(&self) -> &[FriendRequest] {
        &self.friend_requests
    }

    /// Register a new account and sign it in
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        nickname: &str,
        city: &str,
    ) -> Result<&Account, StoreError> {
        let account = self
            .service
            .register(email, password, nickname, city)
            .await?;

        self.sign_in(Account {
            is_logged_in: true,
            ..account
        })
        .await
    }

    /// Sign in with email and password
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Account, StoreError> {
        let account = self.service.authenticate(email, password).await?;
        self.sign_in(account).await
    }

    /// Sign in as an arbitrary existing account
    pub async fn login_with_google(&mut self) -> Result<&Account, StoreError> {
        let account = self.service.any_account().await?;
        self.sign_in(account).await
    }

    /// Clear the signed-in account and everything derived from it
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.snapshot.clear()?;
        self.current = None;
        self.friends.clear();
        self.friend_requests.clear();
        Ok(())
    }

    /// Update the profile of the signed-in account.
    ///
    /// Does nothing if nobody is signed in.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), StoreError> {
        let Some(current) = &self.current else {
            return Ok(());
        };

        let account = self.service.update_profile(current.uuid, update).await?;
        self.sign_in(account).await?;
        Ok(())
    }

    /// Send a friend request to `target`
    pub async fn send_friend_request(&mut self, target: Uuid) -> Result<FriendEdge, StoreError> {
        let current = self.current_uuid()?;
        let edge = self.service.send_friend_request(current, target).await?;
        self.refresh().await;
        Ok(edge)
    }

    /// Accept a received friend request
    pub async fn accept_friend_request(&mut self, request: Uuid) -> Result<FriendEdge, StoreError> {
        let current = self.current_uuid()?;
        let edge = self.service.accept_friend_request(current, request).await?;
        self.refresh().await;
        Ok(edge)
    }

    /// Decline a received or withdraw a sent friend request
    pub async fn decline_friend_request(
        &mut self,
        request: Uuid,
    ) -> Result<FriendEdge, StoreError> {
        let current = self.current_uuid()?;
        let edge = self.service.decline_friend_request(current, request).await?;
        self.refresh().await;
        Ok(edge)
    }

    fn current_uuid(&self) -> Result<Uuid, StoreError> {
        self.current
            .as_ref()
            .map(|a| a.uuid)
            .ok_or(StoreError::NotSignedIn)
    }

    async fn sign_in(&mut self, account: Account) -> Result<&Account, StoreError> {
        self.snapshot.save(&account)?;
        self.current = Some(account);
        self.refresh().await;

        self.current.as_ref().ok_or(StoreError::NotSignedIn)
    }

    async fn refresh(&mut self) {
        match &self.current {
            Some(current) => {
                self.friends = self.service.friends_of(current.uuid).await;
                self.friend_requests = self.service.friend_requests_for(current.uuid).await;
            }
            None => {
                self.friends.clear();
                self.friend_requests.clear();
            }
        }
    }
}
