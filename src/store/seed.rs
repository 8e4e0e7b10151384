//! Demo data for a fresh server

use chrono::{Duration, Utc};
use log::info;

use crate::store::{EventRoster, IdentityService, NewEvent, NewGame, StoreError};

/// The password of all demo accounts
pub const DEMO_PASSWORD: &str = "password123";

fn game(title: &str, description: &str) -> NewGame {
    NewGame {
        title: title.to_string(),
        description: Some(description.to_string()),
        catalog_id: None,
    }
}

/// Register the demo accounts and their events.
///
/// Does nothing if there are accounts already.
pub async fn seed(identity: &IdentityService, roster: &EventRoster) -> Result<(), StoreError> {
    if identity.account_count().await > 0 {
        return Ok(());
    }

    let john = identity
        .register("john@example.com", DEMO_PASSWORD, "JohnDice", "New York")
        .await?;
    let alice = identity
        .register("alice@example.com", DEMO_PASSWORD, "AliceCards", "San Francisco")
        .await?;
    let strategy_king = identity
        .register("king@example.com", DEMO_PASSWORD, "StrategyKing", "Chicago")
        .await?;

    let now = Utc::now();

    roster
        .create_event(
            Some(&john),
            NewEvent {
                name: "Catan Championship".to_string(),
                description:
                    "Join us for a day of resource gathering and strategic trading in Catan!"
                        .to_string(),
                location: "Board & Brew Cafe".to_string(),
                city: "New York".to_string(),
                date: now + Duration::days(1),
                max_players: 6,
                games: vec![game(
                    "Catan",
                    "The classic game of resource management and trading",
                )],
            },
        )
        .await?;

    roster
        .create_event(
            Some(&alice),
            NewEvent {
                name: "Pandemic Cooperative Play".to_string(),
                description:
                    "Let's save the world together in this cooperative game of disease control!"
                        .to_string(),
                location: "Meeple House".to_string(),
                city: "San Francisco".to_string(),
                date: now + Duration::days(7),
                max_players: 4,
                games: vec![game("Pandemic", "A cooperative game of disease control")],
            },
        )
        .await?;

    let strategy_night = roster
        .create_event(
            Some(&strategy_king),
            NewEvent {
                name: "Strategy Game Night".to_string(),
                description: "Multiple strategy games on rotation all night long!".to_string(),
                location: "The Game Table".to_string(),
                city: "Chicago".to_string(),
                date: now + Duration::days(14),
                max_players: 8,
                games: vec![
                    game("Terraforming Mars", "Compete to make Mars habitable"),
                    game("Scythe", "Alternate-history strategy game set in 1920s Europe"),
                ],
            },
        )
        .await?;

    roster.join_event(Some(&john), strategy_night.uuid).await?;

    info!("Seeded demo accounts and events");

    Ok(())
}
