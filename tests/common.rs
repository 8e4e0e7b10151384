#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use meeplemeet::models::Account;
use meeplemeet::store::{
    EventRoster, IdentityService, IdentityStore, MemoryRepository, MemorySnapshot, NewEvent,
    NewGame,
};

pub const PASSWORD: &str = "secret1";

pub fn identity_service() -> Arc<IdentityService> {
    Arc::new(IdentityService::new(
        MemoryRepository::shared(),
        MemoryRepository::shared(),
        Duration::ZERO,
    ))
}

pub fn roster() -> EventRoster {
    EventRoster::new(MemoryRepository::shared())
}

/// Register an account and return its signed-in form
pub async fn account(service: &Arc<IdentityService>, email: &str, nickname: &str) -> Account {
    let mut store = IdentityStore::restore(service.clone(), MemorySnapshot::default())
        .await
        .unwrap();

    let account = store
        .register(email, PASSWORD, nickname, "Metro")
        .await
        .unwrap()
        .clone();

    account
}

/// A fresh client that is signed in as `account`
pub async fn client(
    service: &Arc<IdentityService>,
    account: &Account,
) -> IdentityStore<MemorySnapshot> {
    IdentityStore::restore(service.clone(), MemorySnapshot::with(account.clone()))
        .await
        .unwrap()
}

pub fn new_event(name: &str, max_players: u32) -> NewEvent {
    NewEvent {
        name: name.to_string(),
        description: "Bring snacks".to_string(),
        location: "Meeple House".to_string(),
        city: "Metro".to_string(),
        date: Utc::now() + chrono::Duration::days(3),
        max_players,
        games: vec![NewGame {
            title: "Catan".to_string(),
            description: None,
            catalog_id: Some("13".to_string()),
        }],
    }
}
