//! The state managers of meeplemeet.
//!
//! [IdentityStore] holds the signed-in account of one client, [EventRoster] holds all events.
//! Both read and write through injected [Repository] implementations and report every
//! failure as a [StoreError], leaving their state unchanged.

pub use error::*;
pub use identity::*;
pub use repository::*;
pub use roster::*;
pub use snapshot::*;

mod error;
mod identity;
mod repository;
mod roster;
pub mod seed;
mod snapshot;
