//! Rendering layer
//!
//! The controller only talks to a `Renderer`; the DOM and terminal
//! front-ends each provide one.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;
pub use text::TextRenderer;

use crate::cards::Note;
use crate::highscores::Leaderboard;
use crate::sim::CardInstance;

/// What the game needs from a view
pub trait Renderer {
    /// Replace every card view with fresh face-down cards, in board order
    fn build_board(&mut self, cards: &[CardInstance]);

    fn set_face_up(&mut self, index: usize, face_up: bool);

    /// Card left play; it stays face up and stops reacting to input
    fn set_matched(&mut self, index: usize);

    fn set_moves(&mut self, moves: u32);

    fn set_timer(&mut self, text: &str);

    fn show_win(&mut self, final_time: &str, moves: u32);

    fn hide_win(&mut self);

    /// Show the leaderboard overlay; an empty board shows a placeholder
    fn show_leaderboard(&mut self, board: &Leaderboard);

    fn hide_leaderboard(&mut self);
}

/// One white key of the one-octave keyboard drawn on key cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap {
    pub note: Note,
    pub highlighted: bool,
    pub has_black_key: bool,
}

/// White keys C to B with `highlight` marked
pub fn keyboard(highlight: Note) -> [KeyCap; 7] {
    Note::ALL.map(|note| KeyCap {
        note,
        highlighted: note == highlight,
        has_black_key: note.has_black_key(),
    })
}
