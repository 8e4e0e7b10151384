//! Events, their rosters and everything that happens within them

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use log::{debug, info};
use serde::Deserialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    Account, ChatMessage, ChatSender, Event, EventRating, Game, GameRef, GameResult, GameVote,
    VoteKind, VoteTally, MAX_RATING, MIN_RATING,
};
use crate::store::{SharedRepository, StoreError};

/// The maximum length of a chat message
pub const MAX_MESSAGE_LENGTH: usize = 2048;

/// A game that should be added to an event
#[derive(Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    /// Title of the game
    #[schema(example = "Catan")]
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Identifier in the external game catalog
    pub catalog_id: Option<String>,
}

/// The fields of a new event
#[derive(Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Name of the event
    #[schema(example = "Catan Championship")]
    pub name: String,
    /// Description of the event
    pub description: String,
    /// The venue
    #[schema(example = "Board & Brew Cafe")]
    pub location: String,
    /// The city of the venue
    #[schema(example = "New York")]
    pub city: String,
    /// Must lie in the future
    pub date: DateTime<Utc>,
    /// The maximum count of participants, including the host
    #[schema(example = 6)]
    pub max_players: u32,
    /// Games that are added right away
    #[serde(default)]
    pub games: Vec<NewGame>,
}

/// A partial update of an event.
///
/// At least one field is required.
#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New venue
    pub location: Option<String>,
    /// New city
    pub city: Option<String>,
    /// New date, must lie in the future
    pub date: Option<DateTime<Utc>>,
    /// New capacity, can't drop below the current participant count
    pub max_players: Option<u32>,
}

impl EventPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.city.is_none()
            && self.date.is_none()
            && self.max_players.is_none()
    }
}

/// The outcome of a played game
#[derive(Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResult {
    /// The game of the event that was played
    pub game: Uuid,
    /// The participants that played
    pub players: Vec<Uuid>,
    /// The winner, must be one of `players`
    pub winner: Option<Uuid>,
}

/// Filters for the event listing.
///
/// Unset filters match every event.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Only events in exactly this city
    pub city: Option<String>,
    /// Only events on this calendar day (UTC)
    pub date: Option<NaiveDate>,
}

impl EventFilter {
    /// Checks if `event` passes this filter
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(city) = &self.city {
            if &event.city != city {
                return false;
            }
        }

        if let Some(date) = self.date {
            if event.date.date_naive() != date {
                return false;
            }
        }

        true
    }
}

/// Events an account is involved in
#[derive(Clone, Debug, Default)]
pub struct MyEvents {
    /// Events the account created
    pub hosted: Vec<Event>,
    /// Events the account joined, but doesn't host
    pub participating: Vec<Event>,
}

/// All events and the operations on them.
///
/// Every mutation authorizes `actor` first and leaves the event untouched on failure.
/// Mutations are serialized, so checks and writes can't interleave.
pub struct EventRoster {
    events: SharedRepository<Event>,
    tx: Mutex<()>,
}

impl EventRoster {
    /// Create a roster on top of the given repository
    pub fn new(events: SharedRepository<Event>) -> Self {
        Self {
            events,
            tx: Mutex::new(()),
        }
    }

    /// All events in order of creation
    pub async fn events(&self) -> Vec<Event> {
        self.events.list().await
    }

    /// A single event
    pub async fn get_event(&self, uuid: Uuid) -> Option<Event> {
        self.events.find(uuid).await
    }

    /// All events passing `filter`, in order of creation
    pub async fn filtered_events(&self, filter: &EventFilter) -> Vec<Event> {
        self.events
            .list()
            .await
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect()
    }

    /// Events `account` hosts or participates in
    pub async fn my_events(&self, account: Uuid) -> MyEvents {
        let (hosted, participating): (Vec<Event>, Vec<Event>) = self
            .events
            .list()
            .await
            .into_iter()
            .filter(|e| e.is_participant(account) || e.is_host(account))
            .partition(|e| e.is_host(account));

        MyEvents {
            hosted,
            participating,
        }
    }

    /// Create a new event hosted by `actor`
    pub async fn create_event(
        &self,
        actor: Option<&Account>,
        new: NewEvent,
    ) -> Result<Event, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        let name = required("name", &new.name)?;
        let description = required("description", &new.description)?;
        let location = required("location", &new.location)?;
        let city = required("city", &new.city)?;

        if new.date <= Utc::now() {
            return Err(StoreError::DateInPast);
        }

        if new.max_players == 0 {
            return Err(StoreError::InvalidMaxPlayers);
        }

        let games = new
            .games
            .into_iter()
            .map(build_game)
            .collect::<Result<Vec<_>, _>>()?;

        let host = actor.as_participant();
        let event = Event {
            uuid: Uuid::new_v4(),
            name,
            description,
            location,
            city,
            date: new.date,
            max_players: new.max_players,
            participants: vec![host.clone()],
            host,
            games,
            is_completed: false,
            chat: Vec::new(),
            ratings: Vec::new(),
            results: Vec::new(),
        };

        let _tx = self.tx.lock().await;
        self.events.insert(event.clone()).await;

        info!("Event {} created by {}", event.uuid, actor.uuid);

        Ok(event)
    }

    /// Add `actor` to the participants
    pub async fn join_event(
        &self,
        actor: Option<&Account>,
        event: Uuid,
    ) -> Result<Event, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        self.mutate(event, |event| {
            if event.is_participant(actor.uuid) {
                return Err(StoreError::AlreadyParticipant);
            }

            if event.is_full() {
                return Err(StoreError::EventFull);
            }

            event.participants.push(actor.as_participant());
            event.chat.push(ChatMessage::system(
                event.uuid,
                format!("{} joined the event", actor.nickname),
            ));

            Ok(())
        })
        .await
    }

    /// Remove `actor` from the participants.
    ///
    /// The host can never leave.
    pub async fn leave_event(
        &self,
        actor: Option<&Account>,
        event: Uuid,
    ) -> Result<Event, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        self.mutate(event, |event| {
            if event.is_host(actor.uuid) {
                return Err(StoreError::HostCannotLeave);
            }

            let Some(position) = event
                .participants
                .iter()
                .position(|p| p.uuid == actor.uuid)
            else {
                return Err(StoreError::NotParticipant);
            };

            let participant = event.participants.remove(position);
            event.chat.push(ChatMessage::system(
                event.uuid,
                format!("{} left the event", participant.nickname),
            ));

            Ok(())
        })
        .await
    }

    /// Add a candidate game
    pub async fn add_game(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        game: NewGame,
    ) -> Result<Game, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;
        let game = build_game(game)?;

        self.mutate(event, |event| {
            if !event.is_host(actor.uuid) && !event.is_participant(actor.uuid) {
                return Err(StoreError::NotParticipant);
            }

            event.games.push(game.clone());
            Ok(())
        })
        .await?;

        Ok(game)
    }

    /// Merge the set fields of `patch` into the event
    pub async fn update_event(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        patch: EventPatch,
    ) -> Result<Event, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        if patch.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let name = patch.name.as_deref().map(|v| required("name", v)).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|v| required("description", v))
            .transpose()?;
        let location = patch
            .location
            .as_deref()
            .map(|v| required("location", v))
            .transpose()?;
        let city = patch.city.as_deref().map(|v| required("city", v)).transpose()?;

        if let Some(date) = patch.date {
            if date <= Utc::now() {
                return Err(StoreError::DateInPast);
            }
        }

        self.mutate(event, |event| {
            if !event.is_host(actor.uuid) {
                return Err(StoreError::NotHost);
            }

            if let Some(max_players) = patch.max_players {
                if max_players == 0 {
                    return Err(StoreError::InvalidMaxPlayers);
                }
                if (max_players as usize) < event.participants.len() {
                    return Err(StoreError::MaxPlayersBelowParticipants);
                }
                event.max_players = max_players;
            }

            if let Some(name) = name {
                event.name = name;
            }
            if let Some(description) = description {
                event.description = description;
            }
            if let Some(location) = location {
                event.location = location;
            }
            if let Some(city) = city {
                event.city = city;
            }
            if let Some(date) = patch.date {
                event.date = date;
            }

            Ok(())
        })
        .await
    }

    /// Post a message to the event chat.
    ///
    /// Blank messages are ignored and yield `None`.
    pub async fn send_chat_message(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        text: &str,
    ) -> Result<Option<ChatMessage>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        if text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(StoreError::MessageTooLong);
        }

        let message = ChatMessage {
            uuid: Uuid::new_v4(),
            event,
            sender: ChatSender::Account {
                uuid: actor.uuid,
                nickname: actor.nickname.clone(),
            },
            text: text.to_string(),
            created_at: Utc::now(),
        };

        self.mutate(event, |event| {
            if !event.is_participant(actor.uuid) {
                return Err(StoreError::NotParticipant);
            }

            event.chat.push(message.clone());
            Ok(())
        })
        .await?;

        Ok(Some(message))
    }

    /// Rate a completed event, once per participant
    pub async fn rate_event(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> Result<EventRating, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(StoreError::InvalidRating);
        }

        let rating = EventRating {
            uuid: Uuid::new_v4(),
            rater: actor.as_participant(),
            rating,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        };

        self.mutate(event, |event| {
            if !event.is_participant(actor.uuid) {
                return Err(StoreError::NotParticipant);
            }

            if !event.is_completed {
                return Err(StoreError::EventNotCompleted);
            }

            if event.ratings.iter().any(|r| r.rater.uuid == actor.uuid) {
                return Err(StoreError::AlreadyRated);
            }

            event.ratings.push(rating.clone());
            Ok(())
        })
        .await?;

        Ok(rating)
    }

    /// Record the outcome of a played game
    pub async fn add_game_result(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        result: NewGameResult,
    ) -> Result<GameResult, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        if result.players.is_empty() {
            return Err(StoreError::NoPlayers);
        }

        if let Some(winner) = result.winner {
            if !result.players.contains(&winner) {
                return Err(StoreError::WinnerNotAPlayer);
            }
        }

        let mut recorded = None;
        self.mutate(event, |event| {
            if !event.is_participant(actor.uuid) {
                return Err(StoreError::NotParticipant);
            }

            let game = event
                .games
                .iter()
                .find(|g| g.uuid == result.game)
                .ok_or(StoreError::UnknownGame)?;

            let players = result
                .players
                .iter()
                .unique()
                .map(|player| {
                    event
                        .participants
                        .iter()
                        .find(|p| p.uuid == *player)
                        .cloned()
                        .ok_or(StoreError::PlayerNotParticipant)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let winner = result
                .winner
                .and_then(|w| players.iter().find(|p| p.uuid == w).cloned());

            let game_result = GameResult {
                uuid: Uuid::new_v4(),
                game: GameRef {
                    uuid: game.uuid,
                    title: game.title.clone(),
                },
                winner,
                players,
                created_at: Utc::now(),
            };

            event.results.push(game_result.clone());
            recorded = Some(game_result);
            Ok(())
        })
        .await?;

        recorded.ok_or(StoreError::UnknownEvent)
    }

    /// Vote for a candidate game.
    ///
    /// Repeating a vote removes it, the opposite vote replaces it.
    pub async fn vote_game(
        &self,
        actor: Option<&Account>,
        event: Uuid,
        game: Uuid,
        kind: VoteKind,
    ) -> Result<VoteTally, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        let mut tally = VoteTally::default();
        self.mutate(event, |event| {
            if !event.is_participant(actor.uuid) {
                return Err(StoreError::NotParticipant);
            }

            let candidate = event
                .games
                .iter_mut()
                .find(|g| g.uuid == game)
                .ok_or(StoreError::UnknownGame)?;

            match candidate.votes.iter().position(|v| v.account == actor.uuid) {
                Some(idx) if candidate.votes[idx].kind == kind => {
                    candidate.votes.remove(idx);
                }
                Some(idx) => candidate.votes[idx].kind = kind,
                None => candidate.votes.push(GameVote {
                    account: actor.uuid,
                    kind,
                }),
            }

            tally = candidate.tally();
            Ok(())
        })
        .await?;

        Ok(tally)
    }

    /// Mark the event as completed.
    ///
    /// This can't be undone.
    pub async fn mark_event_complete(
        &self,
        actor: Option<&Account>,
        event: Uuid,
    ) -> Result<Event, StoreError> {
        let actor = actor.ok_or(StoreError::NotSignedIn)?;

        self.mutate(event, |event| {
            if !event.is_host(actor.uuid) {
                return Err(StoreError::NotHost);
            }

            event.is_completed = true;
            Ok(())
        })
        .await
    }

    /// Apply `f` to a copy of the event and write it back if it succeeds
    async fn mutate<F>(&self, uuid: Uuid, f: F) -> Result<Event, StoreError>
    where
        F: FnOnce(&mut Event) -> Result<(), StoreError>,
    {
        let _tx = self.tx.lock().await;

        let mut event = self
            .events
            .find(uuid)
            .await
            .ok_or(StoreError::UnknownEvent)?;

        if let Err(err) = f(&mut event) {
            debug!("Rejected change of event {uuid}: {err}");
            return Err(err);
        }

        if !self.events.update(event.clone()).await {
            return Err(StoreError::UnknownEvent);
        }

        Ok(event)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::MissingField(field));
    }
    Ok(value.to_string())
}

fn build_game(game: NewGame) -> Result<Game, StoreError> {
    Ok(Game {
        uuid: Uuid::new_v4(),
        title: required("title", &game.title)?,
        description: game
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        catalog_id: game.catalog_id,
        votes: Vec::new(),
    })
}
