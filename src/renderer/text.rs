//! Terminal renderer
//!
//! Keeps a plain-text model of the view; the native front-end prints
//! `frame()` after each input.

use std::fmt::Write;

use super::{Renderer, keyboard};
use crate::cards::{CardDefinition, CardRole};
use crate::highscores::{EMPTY_LEADERBOARD_MESSAGE, Leaderboard};
use crate::sim::CardInstance;

/// Cards per printed row
const COLUMNS: usize = 2;
const CELL_WIDTH: usize = 30;

#[derive(Debug, Clone)]
struct CardView {
    face: String,
    face_up: bool,
    matched: bool,
}

#[derive(Debug, Default)]
pub struct TextRenderer {
    cards: Vec<CardView>,
    moves: u32,
    timer: String,
    win: Option<String>,
    leaderboard: Option<Vec<String>>,
}

/// Card face text: the note name, plus the keyboard for key cards
pub fn card_face(def: &CardDefinition) -> String {
    match def.role {
        CardRole::Name => def.display_text().to_string(),
        CardRole::Key => {
            let keys: String = keyboard(def.note)
                .iter()
                .map(|k| {
                    if k.highlighted {
                        format!("[{}]", k.note.letter())
                    } else {
                        format!(" {} ", k.note.letter().to_ascii_lowercase())
                    }
                })
                .collect();
            format!("{} {}", def.display_text(), keys.trim_end())
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            timer: "00:00".to_string(),
            ..Self::default()
        }
    }

    pub fn is_win_shown(&self) -> bool {
        self.win.is_some()
    }

    pub fn is_leaderboard_shown(&self) -> bool {
        self.leaderboard.is_some()
    }

    /// Whether card `index` currently shows its face
    pub fn is_face_up(&self, index: usize) -> bool {
        self.cards.get(index).is_some_and(|c| c.face_up || c.matched)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn timer(&self) -> &str {
        &self.timer
    }

    /// Full screen as text
    pub fn frame(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Jogadas: {}    Tempo: {}", self.moves, self.timer);
        let _ = writeln!(out);

        for (row, chunk) in self.cards.chunks(COLUMNS).enumerate() {
            for (col, card) in chunk.iter().enumerate() {
                let index = row * COLUMNS + col;
                let face = if card.matched {
                    format!("{} ✓", card.face)
                } else if card.face_up {
                    card.face.clone()
                } else {
                    "♫".to_string()
                };
                let cell = format!("{:>2}) {}", index + 1, face);
                let _ = write!(out, "{:<width$}", cell, width = CELL_WIDTH);
            }
            let _ = writeln!(out);
        }

        if let Some(win) = &self.win {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", win);
        }
        if let Some(lines) = &self.leaderboard {
            let _ = writeln!(out);
            let _ = writeln!(out, "== Ranking ==");
            for line in lines {
                let _ = writeln!(out, "{}", line);
            }
        }
        out
    }
}

impl Renderer for TextRenderer {
    fn build_board(&mut self, cards: &[CardInstance]) {
        self.cards = cards
            .iter()
            .map(|c| CardView {
                face: card_face(&c.def),
                face_up: false,
                matched: false,
            })
            .collect();
    }

    fn set_face_up(&mut self, index: usize, face_up: bool) {
        if let Some(card) = self.cards.get_mut(index) {
            card.face_up = face_up;
        }
    }

    fn set_matched(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.matched = true;
        }
    }

    fn set_moves(&mut self, moves: u32) {
        self.moves = moves;
    }

    fn set_timer(&mut self, text: &str) {
        self.timer = text.to_string();
    }

    fn show_win(&mut self, final_time: &str, moves: u32) {
        self.win = Some(format!(
            "Parabéns! Você completou em {} com {} jogadas.",
            final_time, moves
        ));
    }

    fn hide_win(&mut self) {
        self.win = None;
    }

    fn show_leaderboard(&mut self, board: &Leaderboard) {
        let lines = if board.is_empty() {
            vec![EMPTY_LEADERBOARD_MESSAGE.to_string()]
        } else {
            board
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    format!(
                        "{:>2}. {:<20} {}  {} jogadas",
                        i + 1,
                        e.player_name,
                        e.formatted_time,
                        e.move_count
                    )
                })
                .collect()
        };
        self.leaderboard = Some(lines);
    }

    fn hide_leaderboard(&mut self) {
        self.leaderboard = None;
    }
}
