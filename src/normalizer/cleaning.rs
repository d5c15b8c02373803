//! The string transforms that run before fan-out.
//!
//! Every function here is total: it accepts any string, including the empty
//! string, and never fails.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::TypoCorrection;
use crate::normalizer::mojibake;

static POSTAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}\s").unwrap());

/// `/ Ecke <street>` through end of string.
static CORNER_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*Ecke.*").unwrap());

/// Building and floor qualifiers. A string containing either is never
/// treated as carrying an organizational prefix.
const QUALIFIERS: [&str; 2] = ["Haus", "OG"];

/// Whether `address` already starts with a 5-digit postal code and whitespace.
pub fn has_postal_code(address: &str) -> bool {
    POSTAL_PREFIX.is_match(address)
}

/// The fallback postal code and city, plus the pattern recognizing an
/// organization name placed between that city and the street.
#[derive(Debug, Clone)]
pub struct Locality {
    postal_code: String,
    city: String,
    org_prefix: Regex,
}

impl Locality {
    /// `postal_code` and `city` are expected to be validated already
    /// (see [`Config::validated`](crate::config::Config::validated)).
    pub fn new(postal_code: &str, city: &str) -> Result<Self, regex::Error> {
        let org_prefix = Regex::new(&format!(
            r"^([0-9]{{5}}\s{})\s([^,]+),\s(.+)",
            regex::escape(city)
        ))?;

        Ok(Self {
            postal_code: postal_code.to_string(),
            city: city.to_string(),
            org_prefix,
        })
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Prepend the default postal code and city unless `address` already
    /// starts with a postal code.
    pub fn ensure(&self, address: &str) -> String {
        if has_postal_code(address) {
            return address.to_string();
        }

        tracing::trace!(address, "injecting default locality");
        let mut out = format!("{} {} {}", self.postal_code, self.city, address);
        out.truncate(out.trim_end().len());
        out
    }

    /// Drop a department or company name written between the city and the
    /// real street address: `12489 Berlin ZPV, Johann-Hittorf-Straße 8`.
    ///
    /// Applies only when the text after the first comma holds a digit and
    /// the whole string contains no `Haus`/`OG` qualifier.
    pub fn strip_org_prefix<'a>(&self, address: &'a str) -> Cow<'a, str> {
        if QUALIFIERS.iter().any(|q| address.contains(q)) {
            return Cow::Borrowed(address);
        }

        let Some(caps) = self.org_prefix.captures(address) else {
            return Cow::Borrowed(address);
        };

        let remainder = &caps[3];
        if !remainder.bytes().any(|b| b.is_ascii_digit()) {
            return Cow::Borrowed(address);
        }

        tracing::debug!(address, prefix = &caps[2], "stripping organizational prefix");
        Cow::Owned(format!("{} {}", &caps[1], remainder))
    }
}

/// Repair mojibake if enabled, then collapse whitespace runs and trim.
///
/// Both steps are repeated until neither changes the text, since a repair
/// can produce whitespace and collapsing can split a repaired run.
pub fn prepare(raw: &str, repair_mojibake: bool) -> String {
    let mut text = collapse_whitespace(raw);
    if !repair_mojibake {
        return text;
    }

    loop {
        let next = collapse_whitespace(&mojibake::repair(&text));
        if next == text {
            return text;
        }
        text = next;
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the typo table in order.
pub fn fix_typos(address: &str, typos: &[TypoCorrection]) -> String {
    typos.iter().fold(address.to_string(), |acc, typo| {
        if acc.contains(&typo.find) {
            acc.replace(&typo.find, &typo.replace)
        } else {
            acc
        }
    })
}

/// Keep only what precedes the first comma, then the first `(`.
pub fn truncate_details(address: &str) -> &str {
    let head = address.split(',').next().unwrap_or(address).trim();
    head.split('(').next().unwrap_or(head).trim()
}

/// Remove a trailing `/ Ecke ...` corner clause.
pub fn strip_corner_clause(address: &str) -> Cow<'_, str> {
    match CORNER_CLAUSE.replace_all(address, "") {
        Cow::Borrowed(unchanged) => Cow::Borrowed(unchanged.trim()),
        Cow::Owned(stripped) => Cow::Owned(stripped.trim().to_string()),
    }
}
