//! # meeplemeet
//!
//! meeplemeet coordinates board game meetups: accounts and friendships, events with
//! a limited number of places, candidate games and votes, an event chat, ratings and
//! recorded game results.
#![warn(missing_docs)]

pub mod chan;
pub mod config;
pub mod lookup;
pub mod models;
pub mod server;
pub mod store;
