//! Channels to long running tasks

pub use ws_manager_chan::*;

mod ws_manager_chan;
