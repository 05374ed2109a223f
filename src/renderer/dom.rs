//! DOM renderer (WASM only)
//!
//! Expects the host page to provide `#game-board`, `#moves-count`, `#timer`,
//! `#win-screen`, `#final-time`, `#leaderboard-modal` and `#leaderboard-list`.
//! Card clicks are handled by a single listener on the board (see `main.rs`),
//! which reads each card's `data-index`.

use web_sys::{Document, Element};

use super::{Renderer, keyboard};
use crate::cards::{CardDefinition, CardRole};
use crate::highscores::{EMPTY_LEADERBOARD_MESSAGE, Leaderboard};
use crate::sim::CardInstance;

pub struct DomRenderer {
    document: Document,
    board: Element,
    cards: Vec<Element>,
    moves: Element,
    timer: Element,
    win_screen: Element,
    final_time: Element,
    leaderboard_modal: Element,
    leaderboard_list: Element,
}

fn element(document: &Document, id: &str) -> Option<Element> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::error!("Missing element #{}", id);
    }
    el
}

/// Minimal escaping for text placed into markup
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn keyboard_html(def: &CardDefinition) -> String {
    keyboard(def.note)
        .iter()
        .map(|k| {
            let highlight = if k.highlighted { "highlight" } else { "" };
            let black = if k.has_black_key {
                r#" data-has-black-key="true""#
            } else {
                ""
            };
            format!(r#"<div class="key white {}"{}></div>"#, highlight, black)
        })
        .collect()
}

fn card_back_html(def: &CardDefinition) -> String {
    match def.role {
        CardRole::Name => def.display_text().to_string(),
        CardRole::Key => format!(
            r#"<div class="card-text">{}</div><div class="keyboard">{}</div>"#,
            def.display_text(),
            keyboard_html(def)
        ),
    }
}

impl DomRenderer {
    /// Look up the page elements; `None` if the page is missing any
    pub fn new(document: Document) -> Option<Self> {
        Some(Self {
            board: element(&document, "game-board")?,
            moves: element(&document, "moves-count")?,
            timer: element(&document, "timer")?,
            win_screen: element(&document, "win-screen")?,
            final_time: element(&document, "final-time")?,
            leaderboard_modal: element(&document, "leaderboard-modal")?,
            leaderboard_list: element(&document, "leaderboard-list")?,
            cards: Vec::new(),
            document,
        })
    }

    fn card(&self, index: usize) -> Option<&Element> {
        self.cards.get(index)
    }
}

impl Renderer for DomRenderer {
    fn build_board(&mut self, cards: &[CardInstance]) {
        self.board.set_inner_html("");
        self.cards.clear();

        for (index, card) in cards.iter().enumerate() {
            let Ok(el) = self.document.create_element("div") else {
                log::error!("Could not create card element");
                continue;
            };
            let _ = el.class_list().add_1("card");
            let _ = el.set_attribute("data-index", &index.to_string());
            let _ = el.set_attribute("data-pair-id", &card.def.pair_id().to_string());
            el.set_inner_html(&format!(
                r#"<div class="card-inner"><div class="card-face card-front">♫</div><div class="card-face card-back">{}</div></div>"#,
                card_back_html(&card.def)
            ));
            let _ = self.board.append_child(&el);
            self.cards.push(el);
        }
    }

    fn set_face_up(&mut self, index: usize, face_up: bool) {
        if let Some(el) = self.card(index) {
            let _ = if face_up {
                el.class_list().add_1("flipped")
            } else {
                el.class_list().remove_1("flipped")
            };
        }
    }

    fn set_matched(&mut self, index: usize) {
        if let Some(el) = self.card(index) {
            let _ = el.class_list().add_1("matched");
            let _ = el.set_attribute("aria-disabled", "true");
        }
    }

    fn set_moves(&mut self, moves: u32) {
        self.moves.set_text_content(Some(&moves.to_string()));
    }

    fn set_timer(&mut self, text: &str) {
        self.timer.set_text_content(Some(text));
    }

    fn show_win(&mut self, final_time: &str, _moves: u32) {
        self.final_time.set_text_content(Some(final_time));
        let _ = self.win_screen.class_list().add_1("show");
    }

    fn hide_win(&mut self) {
        let _ = self.win_screen.class_list().remove_1("show");
    }

    fn show_leaderboard(&mut self, board: &Leaderboard) {
        let html = if board.is_empty() {
            format!("<li>{}</li>", EMPTY_LEADERBOARD_MESSAGE)
        } else {
            board
                .entries
                .iter()
                .map(|e| {
                    format!(
                        r#"<li><span class="player">{}</span><div class="score-details"><span class="time">{}</span><span class="moves">{} jogadas</span></div></li>"#,
                        escape_html(&e.player_name),
                        escape_html(&e.formatted_time),
                        e.move_count
                    )
                })
                .collect()
        };
        self.leaderboard_list.set_inner_html(&html);
        let _ = self.leaderboard_modal.class_list().add_1("show");
    }

    fn hide_leaderboard(&mut self) {
        let _ = self.leaderboard_modal.class_list().remove_1("show");
    }
}
