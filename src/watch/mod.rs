// src/watch/mod.rs

//! File watching and change classification.
//!
//! This module is responsible for:
//! - Deciding which paths are never observed ([`filter`]).
//! - Keeping one backend registration per project directory, growing and
//!   shrinking as directories come and go ([`directory`], [`watcher`]).
//! - Turning raw events into watch actions ([`classifier`]).
//!
//! It does **not** run anything; the session applies the actions.

pub mod classifier;
pub mod directory;
pub mod event;
pub mod filter;
pub mod path_utils;
pub mod watcher;

pub use classifier::{AssetKind, ClassifierOptions, EventClassifier, WatchAction};
pub use directory::DirectoryWatcher;
pub use event::{FsEvent, FsEventKind};
pub use filter::{PathFilter, DEFAULT_IGNORED};
pub use watcher::{
    notification_channel, NotificationSink, NotificationSource, NotifyRegistry, WatchRegistry,
};
