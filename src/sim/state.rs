//! Game state and board setup
//!
//! Everything one board needs lives in `GameState`; it is rebuilt from a
//! seed on every (re)start.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, DECK, PAIR_COUNT};

/// Where the flip state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipPhase {
    /// No card face up waiting for a partner
    Idle,
    /// One card face up
    OneFlipped,
    /// Two cards face up, board locked until they are resolved
    Resolving,
}

/// Game clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerState {
    /// Not started yet this session
    #[default]
    Idle,
    /// Counting seconds
    Running,
    /// Stopped on win; never restarts within the session
    Stopped,
}

/// One card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub def: CardDefinition,
    pub face_up: bool,
    /// Matched cards no longer respond to input
    pub matched: bool,
}

impl CardInstance {
    pub fn new(def: CardDefinition) -> Self {
        Self {
            def,
            face_up: false,
            matched: false,
        }
    }

    /// Whether a click on this card can flip it
    pub fn is_interactive(&self) -> bool {
        !self.matched && !self.face_up
    }
}

/// Shuffle the fixed deck with a seeded generator
pub fn shuffled_deck(seed: u64) -> Vec<CardInstance> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut cards: Vec<CardInstance> = DECK.iter().copied().map(CardInstance::new).collect();
    cards.shuffle(&mut rng);
    cards
}

/// Complete state of one board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Shuffle seed for reproducibility
    pub seed: u64,
    /// Cards in board order
    pub cards: Vec<CardInstance>,
    /// Indices of face-up, unresolved cards (at most 2, in flip order)
    pub flipped: Vec<usize>,
    pub matched_pairs: usize,
    pub moves: u32,
    pub board_locked: bool,
    pub elapsed_seconds: u32,
    pub timer: TimerState,
    /// Set once when the last pair is matched
    pub won: bool,
}

impl GameState {
    /// Create a fresh board with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            cards: shuffled_deck(seed),
            flipped: Vec::with_capacity(2),
            matched_pairs: 0,
            moves: 0,
            board_locked: false,
            elapsed_seconds: 0,
            timer: TimerState::Idle,
            won: false,
        }
    }

    pub fn phase(&self) -> FlipPhase {
        match self.flipped.len() {
            0 => FlipPhase::Idle,
            1 => FlipPhase::OneFlipped,
            _ => FlipPhase::Resolving,
        }
    }

    pub fn total_pairs(&self) -> usize {
        PAIR_COUNT
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.total_pairs()
    }

    /// Elapsed time as `MM:SS`
    pub fn formatted_time(&self) -> String {
        format_time(self.elapsed_seconds)
    }

    /// Index of the other card sharing `index`'s pair identifier
    pub fn partner_of(&self, index: usize) -> Option<usize> {
        let def = self.cards.get(index)?.def;
        self.cards
            .iter()
            .enumerate()
            .find(|(i, c)| *i != index && c.def.pairs_with(&def))
            .map(|(i, _)| i)
    }
}

/// Format whole seconds as `MM:SS`; minutes grow past two digits if needed
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
