//! Game simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - No rendering, audio, storage or platform dependencies
//! - Time arrives as explicit ticks and wakeups from the caller

pub mod flip;
pub mod state;

pub use flip::{GameEvent, flip, hide_mismatch, tick_timer};
pub use state::{CardInstance, FlipPhase, GameState, TimerState, format_time, shuffled_deck};
