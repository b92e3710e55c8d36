use serde::{Deserialize, Serialize};

/// A category of characters a password may be built from.
///
/// The alphabets of the classes never overlap, so every generated character belongs to exactly
/// one class. The derived ordering is the order in which classes contribute to a password.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Alphabetic,
    Numeric,
    Symbolic,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Alphabetic,
        CharacterClass::Numeric,
        CharacterClass::Symbolic,
    ];

    /// The fixed set of characters belonging to this class. All of them are ASCII.
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            CharacterClass::Alphabetic => LETTERS,
            CharacterClass::Numeric => NUMBERS,
            CharacterClass::Symbolic => SYMBOLS,
        }
    }

    pub fn contains(self, ch: char) -> bool {
        ch.is_ascii() && self.alphabet().contains(&(ch as u8))
    }

    /// Which class `ch` belongs to, if any.
    pub fn of(ch: char) -> Option<CharacterClass> {
        Self::ALL.into_iter().find(|class| class.contains(ch))
    }

    /// Human-readable name, as shown in prompts and table headers.
    pub fn label(self) -> &'static str {
        match self {
            CharacterClass::Alphabetic => "Letters",
            CharacterClass::Numeric => "Numbers",
            CharacterClass::Symbolic => "Symbols",
        }
    }
}

static LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
static NUMBERS: &[u8] = b"0123456789";
static SYMBOLS: &[u8] = b"!@#$%^&*(){}_+`<>/?[]";
