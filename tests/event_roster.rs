mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{account, identity_service, new_event, roster};
use meeplemeet::models::{ChatSender, VoteKind};
use meeplemeet::store::{EventFilter, EventPatch, NewGame, NewGameResult, StoreError};
use uuid::Uuid;

#[tokio::test]
async fn create_event_makes_host_first_participant() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();

    assert_eq!(event.host.uuid, host.uuid);
    assert_eq!(event.participants.len(), 1);
    assert!(event.is_participant(host.uuid));
    assert_eq!(event.games.len(), 1);
    assert!(!event.is_completed);
    assert_eq!(roster.events().await.len(), 1);
}

#[tokio::test]
async fn create_event_validates_input() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let roster = roster();

    let err = roster
        .create_event(None, new_event("Catan Night", 4))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotSignedIn));

    let mut past = new_event("Catan Night", 4);
    past.date = Utc::now() - Duration::hours(1);
    let err = roster.create_event(Some(&host), past).await.unwrap_err();
    assert!(matches!(err, StoreError::DateInPast));

    let err = roster
        .create_event(Some(&host), new_event("Catan Night", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidMaxPlayers));

    let err = roster
        .create_event(Some(&host), new_event(" ", 4))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingField("name")));

    assert!(roster.events().await.is_empty());
}

#[tokio::test]
async fn join_respects_capacity() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Solo Night", 1))
        .await
        .unwrap();

    let err = roster.join_event(Some(&guest), event.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::EventFull));
    assert_eq!(err.to_string(), "This event is full");

    let stored = roster.get_event(event.uuid).await.unwrap();
    assert_eq!(stored.participants.len(), 1);
    assert!(stored.chat.is_empty());
}

#[tokio::test]
async fn join_adds_participant_once() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();

    let joined = roster.join_event(Some(&guest), event.uuid).await.unwrap();
    assert!(joined.is_participant(guest.uuid));
    assert_eq!(joined.chat.len(), 1);
    assert_eq!(joined.chat[0].sender, ChatSender::System);
    assert_eq!(joined.chat[0].text, "Guest joined the event");

    let err = roster.join_event(Some(&guest), event.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyParticipant));

    let err = roster.join_event(None, event.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::NotSignedIn));

    let err = roster
        .join_event(Some(&guest), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownEvent));
}

#[tokio::test]
async fn concurrent_joins_never_overfill() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let roster = Arc::new(roster());

    let event = roster
        .create_event(Some(&host), new_event("Crowded Night", 3))
        .await
        .unwrap();

    let event_uuid = event.uuid;
    let mut guests = Vec::new();
    for i in 0..6 {
        let email = format!("guest{i}@example.com");
        guests.push(account(&service, &email, &format!("Guest{i}")).await);
    }

    let handles = guests
        .into_iter()
        .map(|guest| {
            let roster = roster.clone();
            tokio::spawn(async move { roster.join_event(Some(&guest), event_uuid).await })
        })
        .collect::<Vec<_>>();

    let mut joined = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            joined += 1;
        }
    }

    assert_eq!(joined, 2);
    let stored = roster.get_event(event.uuid).await.unwrap();
    assert_eq!(stored.participants.len(), 3);
}

#[tokio::test]
async fn host_cannot_leave() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let stranger = account(&service, "stranger@example.com", "Stranger").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();
    roster.join_event(Some(&guest), event.uuid).await.unwrap();

    let err = roster.leave_event(Some(&host), event.uuid).await.unwrap_err();
    assert!(matches!(err, StoreError::HostCannotLeave));

    let err = roster
        .leave_event(Some(&stranger), event.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant));

    let left = roster.leave_event(Some(&guest), event.uuid).await.unwrap();
    assert!(!left.is_participant(guest.uuid));
    assert!(left.is_participant(host.uuid));
    assert_eq!(left.chat.last().unwrap().text, "Guest left the event");
}

#[tokio::test]
async fn rating_requires_completion_and_is_unique() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let stranger = account(&service, "stranger@example.com", "Stranger").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();
    roster.join_event(Some(&guest), event.uuid).await.unwrap();

    let err = roster
        .rate_event(Some(&guest), event.uuid, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EventNotCompleted));

    let err = roster
        .mark_event_complete(Some(&guest), event.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotHost));

    let completed = roster
        .mark_event_complete(Some(&host), event.uuid)
        .await
        .unwrap();
    assert!(completed.is_completed);

    let err = roster
        .rate_event(Some(&guest), event.uuid, 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRating));

    let err = roster
        .rate_event(Some(&stranger), event.uuid, 4, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant));

    let rating = roster
        .rate_event(Some(&guest), event.uuid, 5, Some("Great fun ".to_string()))
        .await
        .unwrap();
    assert_eq!(rating.comment.as_deref(), Some("Great fun"));

    let err = roster
        .rate_event(Some(&guest), event.uuid, 3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyRated));

    roster
        .rate_event(Some(&host), event.uuid, 4, None)
        .await
        .unwrap();

    let stored = roster.get_event(event.uuid).await.unwrap();
    assert_eq!(stored.ratings.len(), 2);
    assert_eq!(stored.average_rating(), Some(4.5));
}

#[tokio::test]
async fn chat_ignores_blank_messages() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let stranger = account(&service, "stranger@example.com", "Stranger").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();

    let sent = roster
        .send_chat_message(Some(&host), event.uuid, "   ")
        .await
        .unwrap();
    assert!(sent.is_none());
    assert!(roster.get_event(event.uuid).await.unwrap().chat.is_empty());

    let err = roster
        .send_chat_message(Some(&stranger), event.uuid, "Hi")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant));

    let err = roster
        .send_chat_message(Some(&host), event.uuid, &"a".repeat(3000))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MessageTooLong));

    let message = roster
        .send_chat_message(Some(&host), event.uuid, " Who brings snacks? ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.text, "Who brings snacks?");

    let stored = roster.get_event(event.uuid).await.unwrap();
    assert_eq!(stored.chat.len(), 1);
    assert_eq!(stored.chat[0].uuid, message.uuid);
}

#[tokio::test]
async fn votes_toggle_and_switch() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();
    let game = event.games[0].uuid;

    let err = roster
        .vote_game(Some(&guest), event.uuid, game, VoteKind::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant));

    roster.join_event(Some(&guest), event.uuid).await.unwrap();

    let tally = roster
        .vote_game(Some(&host), event.uuid, game, VoteKind::Up)
        .await
        .unwrap();
    assert_eq!((tally.up, tally.down, tally.total), (1, 0, 1));

    let tally = roster
        .vote_game(Some(&guest), event.uuid, game, VoteKind::Down)
        .await
        .unwrap();
    assert_eq!((tally.up, tally.down, tally.total), (1, 1, 2));

    let tally = roster
        .vote_game(Some(&guest), event.uuid, game, VoteKind::Up)
        .await
        .unwrap();
    assert_eq!((tally.up, tally.down, tally.total), (2, 0, 2));

    let tally = roster
        .vote_game(Some(&host), event.uuid, game, VoteKind::Up)
        .await
        .unwrap();
    assert_eq!((tally.up, tally.down, tally.total), (1, 0, 1));

    let err = roster
        .vote_game(Some(&host), event.uuid, Uuid::new_v4(), VoteKind::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownGame));
}

#[tokio::test]
async fn add_game_requires_participation() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let stranger = account(&service, "stranger@example.com", "Stranger").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();

    let pandemic = NewGame {
        title: "Pandemic".to_string(),
        description: Some("Save the world".to_string()),
        catalog_id: None,
    };

    let err = roster
        .add_game(Some(&stranger), event.uuid, pandemic.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant));

    let game = roster
        .add_game(Some(&host), event.uuid, pandemic)
        .await
        .unwrap();
    assert!(game.votes.is_empty());

    let stored = roster.get_event(event.uuid).await.unwrap();
    assert_eq!(stored.games.len(), 2);
    assert_eq!(stored.games[1].title, "Pandemic");
}

#[tokio::test]
async fn game_results_are_validated() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let stranger = account(&service, "stranger@example.com", "Stranger").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();
    roster.join_event(Some(&guest), event.uuid).await.unwrap();
    let game = event.games[0].uuid;

    let err = roster
        .add_game_result(
            Some(&host),
            event.uuid,
            NewGameResult {
                game,
                players: Vec::new(),
                winner: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NoPlayers));

    let err = roster
        .add_game_result(
            Some(&host),
            event.uuid,
            NewGameResult {
                game,
                players: vec![host.uuid],
                winner: Some(guest.uuid),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::WinnerNotAPlayer));

    let err = roster
        .add_game_result(
            Some(&host),
            event.uuid,
            NewGameResult {
                game,
                players: vec![host.uuid, stranger.uuid],
                winner: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PlayerNotParticipant));

    let err = roster
        .add_game_result(
            Some(&host),
            event.uuid,
            NewGameResult {
                game: Uuid::new_v4(),
                players: vec![host.uuid],
                winner: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownGame));

    let result = roster
        .add_game_result(
            Some(&guest),
            event.uuid,
            NewGameResult {
                game,
                players: vec![host.uuid, guest.uuid, guest.uuid],
                winner: Some(guest.uuid),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.game.title, "Catan");
    assert_eq!(result.players.len(), 2);
    assert_eq!(result.winner.unwrap().nickname, "Guest");

    assert_eq!(roster.get_event(event.uuid).await.unwrap().results.len(), 1);
}

#[tokio::test]
async fn update_event_is_host_only() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let guest = account(&service, "guest@example.com", "Guest").await;
    let roster = roster();

    let event = roster
        .create_event(Some(&host), new_event("Catan Night", 4))
        .await
        .unwrap();
    roster.join_event(Some(&guest), event.uuid).await.unwrap();

    let rename = EventPatch {
        name: Some("Catan Marathon".to_string()),
        ..Default::default()
    };

    let err = roster
        .update_event(Some(&guest), event.uuid, rename.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotHost));

    let err = roster
        .update_event(Some(&host), event.uuid, EventPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyUpdate));

    let err = roster
        .update_event(
            Some(&host),
            event.uuid,
            EventPatch {
                max_players: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MaxPlayersBelowParticipants));

    let updated = roster
        .update_event(Some(&host), event.uuid, rename)
        .await
        .unwrap();
    assert_eq!(updated.name, "Catan Marathon");
    assert_eq!(updated.max_players, 4);
    assert_eq!(updated.location, "Meeple House");
}

#[tokio::test]
async fn filter_by_city_and_day() {
    let service = identity_service();
    let host = account(&service, "host@example.com", "Host").await;
    let roster = roster();

    let first = roster
        .create_event(Some(&host), new_event("Metro Night", 4))
        .await
        .unwrap();

    let mut elsewhere = new_event("Elsewhere Night", 4);
    elsewhere.city = "Elsewhere".to_string();
    elsewhere.date = first.date + Duration::days(2);
    roster.create_event(Some(&host), elsewhere).await.unwrap();

    assert_eq!(roster.filtered_events(&EventFilter::default()).await.len(), 2);

    let metro = roster
        .filtered_events(&EventFilter {
            city: Some("Metro".to_string()),
            date: None,
        })
        .await;
    assert_eq!(metro.len(), 1);
    assert_eq!(metro[0].uuid, first.uuid);

    let same_day = roster
        .filtered_events(&EventFilter {
            city: None,
            date: Some(first.date.date_naive()),
        })
        .await;
    assert_eq!(same_day.len(), 1);
    assert_eq!(same_day[0].uuid, first.uuid);

    let nothing = roster
        .filtered_events(&EventFilter {
            city: Some("Elsewhere".to_string()),
            date: Some(first.date.date_naive()),
        })
        .await;
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn my_events_splits_hosted_and_joined() {
    let service = identity_service();
    let alice = account(&service, "alice@example.com", "Alice").await;
    let bob = account(&service, "bob@example.com", "Bob").await;
    let roster = roster();

    let hosted = roster
        .create_event(Some(&alice), new_event("Alice's Night", 4))
        .await
        .unwrap();
    let joined = roster
        .create_event(Some(&bob), new_event("Bob's Night", 4))
        .await
        .unwrap();
    roster
        .create_event(Some(&bob), new_event("Bob's Other Night", 4))
        .await
        .unwrap();
    roster.join_event(Some(&alice), joined.uuid).await.unwrap();

    let mine = roster.my_events(alice.uuid).await;
    assert_eq!(mine.hosted.len(), 1);
    assert_eq!(mine.hosted[0].uuid, hosted.uuid);
    assert_eq!(mine.participating.len(), 1);
    assert_eq!(mine.participating[0].uuid, joined.uuid);
}
