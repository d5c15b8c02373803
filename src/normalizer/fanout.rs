//! Fan-out rules, evaluated in priority order. The first rule whose pattern
//! matches decides the output for the address.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::Expansion;
use crate::normalizer::cleaning::Locality;

static NUMBER_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*-\s*([0-9]+)").unwrap());
static NUMBER_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*und\s*([0-9]+)").unwrap());
static SLASH_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\s*/\s*([0-9]+)").unwrap());
static LETTER_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*([A-Z])\s*-\s*([A-Z])").unwrap());

/// Result of a rule whose pattern matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The addresses to emit, never empty.
    Expanded(Vec<String>),
    /// The pattern matched but cannot be expanded (reversed, overflowing or
    /// over-limit range). The caller keeps the address as a single record.
    Rejected(String),
}

pub trait FanOutRule: Send + Sync {
    fn kind(&self) -> Expansion;

    /// `None` when the rule's pattern does not occur in `address`.
    fn expand(&self, address: &str, locality: &Locality) -> Option<Outcome>;
}

/// The rule list in evaluation order.
pub fn default_rules(max_records: Option<usize>) -> Vec<Box<dyn FanOutRule>> {
    vec![
        Box::new(MultipleAddresses),
        Box::new(NumberRange { max_records }),
        Box::new(NumberPair),
        Box::new(SlashPair),
        Box::new(LetterRange { max_records }),
    ]
}

/// Text before the match, trimmed.
fn prefix<'a>(address: &'a str, caps: &Captures<'_>) -> &'a str {
    let start = caps.get(0).map_or(0, |m| m.start());
    address[..start].trim()
}

/// The configured limit, if `count` exceeds it.
fn exceeded_limit(count: u64, max_records: Option<usize>) -> Option<usize> {
    max_records.filter(|&max| usize::try_from(count).map_or(true, |count| count > max))
}

/// `Max-Planck-Straße 3; Rudower Chaussee 12`
pub struct MultipleAddresses;

impl FanOutRule for MultipleAddresses {
    fn kind(&self) -> Expansion {
        Expansion::MultipleAddresses
    }

    fn expand(&self, address: &str, locality: &Locality) -> Option<Outcome> {
        if !address.contains(';') {
            return None;
        }

        let parts: Vec<String> = address
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| locality.ensure(part))
            .collect();

        if parts.is_empty() {
            return None;
        }
        Some(Outcome::Expanded(parts))
    }
}

/// `Rudower Chaussee 2 - 4`
pub struct NumberRange {
    pub max_records: Option<usize>,
}

impl FanOutRule for NumberRange {
    fn kind(&self) -> Expansion {
        Expansion::NumberRange
    }

    fn expand(&self, address: &str, _locality: &Locality) -> Option<Outcome> {
        let caps = NUMBER_RANGE.captures(address)?;

        let (Ok(start), Ok(end)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            return Some(Outcome::Rejected(format!(
                "house numbers {}-{} out of range",
                &caps[1], &caps[2]
            )));
        };
        if end < start {
            return Some(Outcome::Rejected(format!("reversed range {start}-{end}")));
        }
        let count = u64::from(end) - u64::from(start) + 1;
        if let Some(max) = exceeded_limit(count, self.max_records) {
            return Some(Outcome::Rejected(format!(
                "range {start}-{end} exceeds {max} records"
            )));
        }

        let prefix = prefix(address, &caps);
        Some(Outcome::Expanded(
            (start..=end).map(|n| format!("{prefix} {n}")).collect(),
        ))
    }
}

/// `Rudower Chaussee 16 und 18`
pub struct NumberPair;

impl FanOutRule for NumberPair {
    fn kind(&self) -> Expansion {
        Expansion::NumberPair
    }

    fn expand(&self, address: &str, _locality: &Locality) -> Option<Outcome> {
        let caps = NUMBER_PAIR.captures(address)?;
        Some(pair(address, &caps))
    }
}

/// `Am Studio 14/16`
pub struct SlashPair;

impl FanOutRule for SlashPair {
    fn kind(&self) -> Expansion {
        Expansion::SlashPair
    }

    fn expand(&self, address: &str, _locality: &Locality) -> Option<Outcome> {
        let caps = SLASH_PAIR.captures(address)?;
        Some(pair(address, &caps))
    }
}

fn pair(address: &str, caps: &Captures<'_>) -> Outcome {
    let prefix = prefix(address, caps);
    Outcome::Expanded(vec![
        format!("{prefix} {}", &caps[1]),
        format!("{prefix} {}", &caps[2]),
    ])
}

/// `Volmerstraße 73 A-C`
pub struct LetterRange {
    pub max_records: Option<usize>,
}

impl FanOutRule for LetterRange {
    fn kind(&self) -> Expansion {
        Expansion::LetterRange
    }

    fn expand(&self, address: &str, _locality: &Locality) -> Option<Outcome> {
        let caps = LETTER_RANGE.captures(address)?;

        // The pattern only admits single ASCII uppercase letters.
        let first = caps[2].bytes().next()?;
        let last = caps[3].bytes().next()?;
        if last < first {
            return Some(Outcome::Rejected(format!(
                "reversed letter range {}-{}",
                char::from(first),
                char::from(last)
            )));
        }
        if let Some(max) = exceeded_limit(u64::from(last - first) + 1, self.max_records) {
            return Some(Outcome::Rejected(format!("letter range exceeds {max} records")));
        }

        let prefix = prefix(address, &caps);
        let number = &caps[1];
        Some(Outcome::Expanded(
            (first..=last)
                .map(|letter| format!("{prefix} {number} {}", char::from(letter)))
                .collect(),
        ))
    }
}
