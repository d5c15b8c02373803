use serde::{Deserialize, Serialize};

/// An input row: a free-text address plus whatever else the caller attached.
///
/// The normalizer only ever borrows a `RawRecord`; every output is a fresh
/// [`NormalizedRecord`] carrying a clone of `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord<T> {
    pub address: Option<String>,
    pub data: T,
}

impl<T> RawRecord<T> {
    pub fn new(address: impl Into<String>, data: T) -> Self {
        Self {
            address: Some(address.into()),
            data,
        }
    }

    /// A record whose address field was absent in the source.
    pub fn without_address(data: T) -> Self {
        Self {
            address: None,
            data,
        }
    }
}

/// One geocodable address derived from a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord<T> {
    pub address: String,
    pub data: T,
    pub expansion: Expansion,
}

/// The fan-out rule that produced a [`NormalizedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// Several addresses separated by `;`.
    MultipleAddresses,
    /// House-number range such as `2 - 4`.
    NumberRange,
    /// Two house numbers joined by `und`.
    NumberPair,
    /// Two house numbers joined by `/`.
    SlashPair,
    /// Letter suffix range such as `73 A-C`.
    LetterRange,
    /// No fan-out.
    Single,
}

impl Expansion {
    pub const ALL: [Expansion; 6] = [
        Expansion::MultipleAddresses,
        Expansion::NumberRange,
        Expansion::NumberPair,
        Expansion::SlashPair,
        Expansion::LetterRange,
        Expansion::Single,
    ];
}

impl std::fmt::Display for Expansion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expansion::MultipleAddresses => write!(f, "multiple addresses"),
            Expansion::NumberRange => write!(f, "number range"),
            Expansion::NumberPair => write!(f, "number pair"),
            Expansion::SlashPair => write!(f, "slash pair"),
            Expansion::LetterRange => write!(f, "letter range"),
            Expansion::Single => write!(f, "single"),
        }
    }
}
