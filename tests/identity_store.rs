mod common;

use common::{account, client, identity_service, PASSWORD};
use meeplemeet::store::{
    IdentityStore, MemorySnapshot, ProfileUpdate, SnapshotStore, StoreError,
};

#[tokio::test]
async fn register_signs_in_and_rejects_duplicate_email() {
    let service = identity_service();
    let mut store = IdentityStore::restore(service.clone(), MemorySnapshot::default())
        .await
        .unwrap();

    let registered = store
        .register("new@x.com", PASSWORD, "Nick", "Metro")
        .await
        .unwrap()
        .clone();
    assert_eq!(registered.nickname, "Nick");
    assert!(registered.is_logged_in);

    let err = store
        .register("new@x.com", "secret2", "Other", "Elsewhere")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmailAlreadyInUse));

    let current = store.current().unwrap();
    assert_eq!(current.uuid, registered.uuid);
    assert_eq!(current.nickname, "Nick");
    assert_eq!(service.account_count().await, 1);
}

#[tokio::test]
async fn register_validates_input() {
    let service = identity_service();
    let mut store = IdentityStore::restore(service.clone(), MemorySnapshot::default())
        .await
        .unwrap();

    let err = store
        .register("not-an-email", PASSWORD, "Nick", "Metro")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidEmail));

    let err = store
        .register("nick@example.com", "short", "Nick", "Metro")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPassword));

    let err = store
        .register("nick@example.com", PASSWORD, "   ", "Metro")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingField("nickname")));

    assert!(store.current().is_none());
    assert_eq!(service.account_count().await, 0);
}

#[tokio::test]
async fn login_requires_matching_credentials() {
    let service = identity_service();
    let registered = account(&service, "john@example.com", "JohnDice").await;

    let mut store = IdentityStore::restore(service.clone(), MemorySnapshot::default())
        .await
        .unwrap();

    let err = store
        .login("john@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::LoginFailed));
    assert!(store.current().is_none());

    let err = store.login("nobody@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, StoreError::LoginFailed));

    let current = store.login("john@example.com", PASSWORD).await.unwrap();
    assert_eq!(current.uuid, registered.uuid);
    assert!(current.is_logged_in);
}

#[tokio::test]
async fn logout_clears_snapshot() {
    let service = identity_service();
    let mut snapshot = MemorySnapshot::default();

    {
        let mut store = IdentityStore::restore(service.clone(), &mut snapshot)
            .await
            .unwrap();
        store
            .register("new@x.com", PASSWORD, "Nick", "Metro")
            .await
            .unwrap();
    }
    assert_eq!(snapshot.load().unwrap().unwrap().nickname, "Nick");

    {
        let mut store = IdentityStore::restore(service.clone(), &mut snapshot)
            .await
            .unwrap();
        assert_eq!(store.current().unwrap().nickname, "Nick");

        store.logout().unwrap();
        assert!(store.current().is_none());
        assert!(store.friends().is_empty());
    }
    assert!(snapshot.load().unwrap().is_none());
}

#[tokio::test]
async fn restore_drops_snapshot_of_unknown_account() {
    let service = identity_service();
    let other = identity_service();
    let stranger = account(&other, "ghost@example.com", "Ghost").await;

    let mut snapshot = MemorySnapshot::with(stranger);
    let store = IdentityStore::restore(service, &mut snapshot).await.unwrap();

    assert!(store.current().is_none());
    drop(store);
    assert!(snapshot.load().unwrap().is_none());
}

#[tokio::test]
async fn login_with_google_needs_existing_account() {
    let service = identity_service();
    let mut store = IdentityStore::restore(service.clone(), MemorySnapshot::default())
        .await
        .unwrap();

    let err = store.login_with_google().await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownAccount));

    let alice = account(&service, "alice@example.com", "AliceCards").await;
    let current = store.login_with_google().await.unwrap();
    assert_eq!(current.uuid, alice.uuid);
}

#[tokio::test]
async fn update_profile_rewrites_snapshot() {
    let service = identity_service();
    let nick = account(&service, "nick@example.com", "Nick").await;

    let mut snapshot = MemorySnapshot::with(nick.clone());
    let mut store = IdentityStore::restore(service.clone(), &mut snapshot)
        .await
        .unwrap();

    store
        .update_profile(ProfileUpdate {
            nickname: "Dicey".to_string(),
            city: "Boston".to_string(),
            photo_url: Some("https://example.org/me.png".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(store.current().unwrap().nickname, "Dicey");
    drop(store);

    let saved = snapshot.load().unwrap().unwrap();
    assert_eq!(saved.city, "Boston");
    assert_eq!(saved.photo_url.as_deref(), Some("https://example.org/me.png"));

    let found = service.find_account(nick.uuid).await.unwrap();
    assert_eq!(found.nickname, "Dicey");
}

#[tokio::test]
async fn update_profile_while_signed_out_does_nothing() {
    let service = identity_service();
    let mut store = IdentityStore::restore(service, MemorySnapshot::default())
        .await
        .unwrap();

    store
        .update_profile(ProfileUpdate {
            nickname: "Dicey".to_string(),
            city: "Boston".to_string(),
            photo_url: None,
        })
        .await
        .unwrap();

    assert!(store.current().is_none());
}

#[tokio::test]
async fn friend_edge_is_unique_per_pair() {
    let service = identity_service();
    let a = account(&service, "a@example.com", "Anna").await;
    let b = account(&service, "b@example.com", "Bert").await;

    let mut anna = client(&service, &a).await;
    let mut bert = client(&service, &b).await;

    anna.send_friend_request(b.uuid).await.unwrap();

    let err = bert.send_friend_request(a.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::FriendshipAlreadyExists));

    let err = anna.send_friend_request(b.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::FriendshipAlreadyExists));

    let err = anna.send_friend_request(a.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::CannotBefriendSelf));
}

#[tokio::test]
async fn friend_request_needs_sign_in() {
    let service = identity_service();
    let b = account(&service, "b@example.com", "Bert").await;

    let mut store = IdentityStore::restore(service, MemorySnapshot::default())
        .await
        .unwrap();

    let err = store.send_friend_request(b.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::NotSignedIn));
}

#[tokio::test]
async fn only_receiver_accepts() {
    let service = identity_service();
    let a = account(&service, "a@example.com", "Anna").await;
    let b = account(&service, "b@example.com", "Bert").await;

    let mut anna = client(&service, &a).await;
    let edge = anna.send_friend_request(b.uuid).await.unwrap();

    let mut bert = client(&service, &b).await;
    assert_eq!(bert.friend_requests().len(), 1);
    assert_eq!(bert.friend_requests()[0].from_nickname, "Anna");

    let err = anna.accept_friend_request(edge.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::NotRequestReceiver));

    bert.accept_friend_request(edge.uuid).await.unwrap();
    assert!(bert.friend_requests().is_empty());
    assert_eq!(bert.friends()[0].uuid, a.uuid);

    let err = bert.accept_friend_request(edge.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyFriends));

    let anna = client(&service, &a).await;
    assert_eq!(anna.friends()[0].uuid, b.uuid);
}

#[tokio::test]
async fn declined_request_can_be_sent_again() {
    let service = identity_service();
    let a = account(&service, "a@example.com", "Anna").await;
    let b = account(&service, "b@example.com", "Bert").await;
    let c = account(&service, "c@example.com", "Carl").await;

    let mut anna = client(&service, &a).await;
    let edge = anna.send_friend_request(b.uuid).await.unwrap();

    let mut carl = client(&service, &c).await;
    let err = carl.decline_friend_request(edge.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownFriendRequest));

    let mut bert = client(&service, &b).await;
    bert.decline_friend_request(edge.uuid).await.unwrap();
    assert!(bert.friend_requests().is_empty());
    assert!(bert.friends().is_empty());

    let edge = anna.send_friend_request(b.uuid).await.unwrap();
    anna.decline_friend_request(edge.uuid).await.unwrap();

    let bert = client(&service, &b).await;
    assert!(bert.friend_requests().is_empty());
}

#[tokio::test]
async fn search_ignores_case() {
    let service = identity_service();
    account(&service, "alice@example.com", "AliceCards").await;
    account(&service, "king@example.com", "StrategyKing").await;

    let found = service.search_accounts("alice").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].nickname, "AliceCards");
    assert!(!found[0].is_logged_in);

    assert!(service.search_accounts("  ").await.is_empty());
}
