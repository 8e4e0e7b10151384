//! All the data models live here.

pub use account::*;
pub use chat::*;
pub use event::*;
pub use friend::*;
pub use rating::*;
pub use result::*;

mod account;
mod chat;
mod event;
mod friend;
mod rating;
mod result;
