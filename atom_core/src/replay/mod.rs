//! Progress replay for elapsed time, online and offline

mod offline;
mod online;

pub use offline::{replay_offline, OfflineReport};
pub use online::{replay_online, OnlineReport};
