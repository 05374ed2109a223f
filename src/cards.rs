//! Card catalogue
//!
//! Seven natural notes, each appearing twice in the deck: once as its
//! solfège name and once as a highlighted key on a one-octave keyboard.

use serde::{Deserialize, Serialize};

/// A natural note of the C major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    Do,
    Re,
    Mi,
    Fa,
    Sol,
    La,
    Si,
}

impl Note {
    /// All notes in keyboard order (C to B)
    pub const ALL: [Note; 7] = [
        Note::Do,
        Note::Re,
        Note::Mi,
        Note::Fa,
        Note::Sol,
        Note::La,
        Note::Si,
    ];

    /// Solfège name as printed on the cards
    pub fn solfege(&self) -> &'static str {
        match self {
            Note::Do => "DÓ",
            Note::Re => "RÉ",
            Note::Mi => "MI",
            Note::Fa => "FÁ",
            Note::Sol => "SOL",
            Note::La => "LÁ",
            Note::Si => "SI",
        }
    }

    /// Letter name of the white key
    pub fn letter(&self) -> char {
        match self {
            Note::Do => 'C',
            Note::Re => 'D',
            Note::Mi => 'E',
            Note::Fa => 'F',
            Note::Sol => 'G',
            Note::La => 'A',
            Note::Si => 'B',
        }
    }

    /// Whether a black key sits to the right of this white key
    pub fn has_black_key(&self) -> bool {
        !matches!(self, Note::Mi | Note::Si)
    }

    /// Sound file stem (`do` -> `sounds/do.mp3`)
    pub fn sound_stem(&self) -> &'static str {
        match self {
            Note::Do => "do",
            Note::Re => "re",
            Note::Mi => "mi",
            Note::Fa => "fa",
            Note::Sol => "sol",
            Note::La => "la",
            Note::Si => "si",
        }
    }

    /// Pair identifier shared by the two cards of this note (1-based)
    pub fn pair_id(&self) -> u8 {
        match self {
            Note::Do => 1,
            Note::Re => 2,
            Note::Mi => 3,
            Note::Fa => 4,
            Note::Sol => 5,
            Note::La => 6,
            Note::Si => 7,
        }
    }
}

/// Which half of a pair a card is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardRole {
    /// Shows the solfège name only
    Name,
    /// Shows a keyboard with the note's key highlighted; plays the note when flipped
    Key,
}

/// Immutable description of one card in the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub note: Note,
    pub role: CardRole,
}

impl CardDefinition {
    pub const fn new(note: Note, role: CardRole) -> Self {
        Self { note, role }
    }

    pub fn display_text(&self) -> &'static str {
        self.note.solfege()
    }

    pub fn pair_id(&self) -> u8 {
        self.note.pair_id()
    }

    /// Keyboard key shown on key cards
    pub fn associated_key(&self) -> Option<char> {
        match self.role {
            CardRole::Key => Some(self.note.letter()),
            CardRole::Name => None,
        }
    }

    /// Sound asset path relative to `base` (key cards only)
    pub fn sound_asset(&self, base: &str) -> Option<String> {
        match self.role {
            CardRole::Key => Some(format!("{}/{}.mp3", base, self.note.sound_stem())),
            CardRole::Name => None,
        }
    }

    /// Two cards form a pair when they share a pair identifier
    pub fn pairs_with(&self, other: &CardDefinition) -> bool {
        self.pair_id() == other.pair_id()
    }
}

/// Number of pairs on a board
pub const PAIR_COUNT: usize = Note::ALL.len();

/// Number of cards on a board
pub const CARD_COUNT: usize = PAIR_COUNT * 2;

/// The fixed deck, name card followed by key card for each note
pub const DECK: [CardDefinition; CARD_COUNT] = [
    CardDefinition::new(Note::Do, CardRole::Name),
    CardDefinition::new(Note::Do, CardRole::Key),
    CardDefinition::new(Note::Re, CardRole::Name),
    CardDefinition::new(Note::Re, CardRole::Key),
    CardDefinition::new(Note::Mi, CardRole::Name),
    CardDefinition::new(Note::Mi, CardRole::Key),
    CardDefinition::new(Note::Fa, CardRole::Name),
    CardDefinition::new(Note::Fa, CardRole::Key),
    CardDefinition::new(Note::Sol, CardRole::Name),
    CardDefinition::new(Note::Sol, CardRole::Key),
    CardDefinition::new(Note::La, CardRole::Name),
    CardDefinition::new(Note::La, CardRole::Key),
    CardDefinition::new(Note::Si, CardRole::Name),
    CardDefinition::new(Note::Si, CardRole::Key),
];
