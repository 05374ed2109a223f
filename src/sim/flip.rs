//! Flip and match state machine
//!
//! Pure transitions over `GameState`. Each returns the events it produced so
//! the caller can drive rendering, audio and timers without the game logic
//! touching any of them.

use super::state::{FlipPhase, GameState, TimerState};

/// Something that happened during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Card turned face up
    CardFlipped { index: usize },
    /// First flip of the session started the clock
    TimerStarted,
    /// A two-card attempt completed
    MoveCounted { moves: u32 },
    /// Both cards matched and are now out of play
    PairMatched { first: usize, second: usize },
    /// Cards differ; the caller must call `hide_mismatch` after the display delay
    Mismatched { first: usize, second: usize },
    /// Mismatched cards turned back face down
    CardsHidden { first: usize, second: usize },
    /// Last pair matched; clock stopped
    Won { elapsed_seconds: u32, moves: u32 },
    /// Clock advanced one second
    TimerTicked { elapsed_seconds: u32 },
}

/// Handle a click on the card at `index`
///
/// Clicks on locked boards, face-up or matched cards and out-of-range indices
/// are ignored and produce no events.
pub fn flip(state: &mut GameState, index: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.board_locked {
        return events;
    }
    let Some(card) = state.cards.get(index) else {
        log::warn!("Ignoring flip of card {} (board has {})", index, state.cards.len());
        return events;
    };
    if !card.is_interactive() || state.flipped.first() == Some(&index) {
        return events;
    }

    if state.timer == TimerState::Idle {
        state.timer = TimerState::Running;
        state.elapsed_seconds = 0;
        events.push(GameEvent::TimerStarted);
    }

    state.cards[index].face_up = true;
    state.flipped.push(index);
    events.push(GameEvent::CardFlipped { index });

    if state.phase() == FlipPhase::Resolving {
        state.moves += 1;
        events.push(GameEvent::MoveCounted { moves: state.moves });
        resolve(state, &mut events);
    }

    events
}

/// Compare the two face-up cards
fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.board_locked = true;
    let (first, second) = (state.flipped[0], state.flipped[1]);

    if state.cards[first].def.pairs_with(&state.cards[second].def) {
        state.cards[first].matched = true;
        state.cards[second].matched = true;
        state.matched_pairs += 1;
        state.flipped.clear();
        state.board_locked = false;
        events.push(GameEvent::PairMatched { first, second });
        check_win(state, events);
    } else {
        events.push(GameEvent::Mismatched { first, second });
    }
}

fn check_win(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.won || !state.is_complete() {
        return;
    }
    state.won = true;
    state.timer = TimerState::Stopped;
    events.push(GameEvent::Won {
        elapsed_seconds: state.elapsed_seconds,
        moves: state.moves,
    });
}

/// Turn a mismatched pair back face down and unlock the board
///
/// No-op unless the board is waiting on a mismatch.
pub fn hide_mismatch(state: &mut GameState) -> Vec<GameEvent> {
    if state.phase() != FlipPhase::Resolving {
        return Vec::new();
    }
    let (first, second) = (state.flipped[0], state.flipped[1]);
    for &i in &state.flipped {
        state.cards[i].face_up = false;
    }
    state.flipped.clear();
    state.board_locked = false;
    vec![GameEvent::CardsHidden { first, second }]
}

/// Advance the clock by one second if it is running
pub fn tick_timer(state: &mut GameState) -> Option<GameEvent> {
    if state.timer != TimerState::Running {
        return None;
    }
    state.elapsed_seconds += 1;
    Some(GameEvent::TimerTicked {
        elapsed_seconds: state.elapsed_seconds,
    })
}
