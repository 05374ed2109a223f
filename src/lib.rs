//! Musical Memory - a pairs game matching note names to keyboard keys
//!
//! Core modules:
//! - `sim`: Pure game state and flip/match state machine
//! - `controller`: Drives renderer, audio and storage from game events
//! - `renderer`: View abstraction with DOM and terminal implementations
//! - `highscores`: Top-10 leaderboard
//! - `storage`: Key-value persistence (LocalStorage on web, files on native)

pub mod audio;
pub mod cards;
pub mod controller;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod storage;

pub use controller::{Command, GameController, Wakeup, WakeupKind};
pub use highscores::{Leaderboard, ScoreEntry};
pub use settings::{Pace, Settings};

/// Game configuration constants
pub mod consts {
    /// Timer granularity
    pub const TICK_INTERVAL_MS: u32 = 1000;
}
