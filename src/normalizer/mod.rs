//! Address cleaning and fan-out.
//!
//! [`AddressNormalizer::normalize`] runs a raw address through an ordered
//! series of string transforms ([`cleaning`]) and then through the first
//! matching fan-out rule ([`fanout`]). Each resulting address becomes one
//! [`NormalizedRecord`] carrying a clone of the input's attached data.
//!
//! Cleaning order:
//! 1. mojibake repair and whitespace collapsing
//! 2. typo table
//! 3. default locality (`12489 Berlin`) if no postal code leads the string
//! 4. organizational prefix between city and street dropped
//! 5. everything after the first `,` and then the first `(` dropped
//! 6. `/ Ecke ...` corner clause dropped
//! 7. default locality checked again

pub mod cleaning;
pub mod fanout;
pub mod mojibake;

use tracing::{debug, warn};

use crate::config::{Config, ConfigError, TypoCorrection};
use crate::models::{Expansion, NormalizedRecord, RawRecord};
use cleaning::Locality;
use fanout::{FanOutRule, Outcome};

/// Turns one raw address into one or more geocodable addresses.
///
/// Immutable after construction and safe to share across threads.
pub struct AddressNormalizer {
    locality: Locality,
    typos: Vec<TypoCorrection>,
    repair_mojibake: bool,
    rules: Vec<Box<dyn FanOutRule>>,
}

impl AddressNormalizer {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let config = config.clone().validated()?;
        let locality = Locality::new(&config.locality.postal_code, &config.locality.city)?;

        Ok(Self {
            locality,
            typos: config.cleaning.typos,
            repair_mojibake: config.cleaning.repair_mojibake,
            rules: fanout::default_rules(config.fan_out.max_records),
        })
    }

    pub fn locality(&self) -> &Locality {
        &self.locality
    }

    /// Normalize one record. The result is never empty, and every address in
    /// it starts with a 5-digit postal code.
    pub fn normalize<T: Clone>(&self, record: &RawRecord<T>) -> Vec<NormalizedRecord<T>> {
        let cleaned = self.clean(record.address.as_deref().unwrap_or_default());
        let (expansion, addresses) = self.expand(&cleaned);

        addresses
            .into_iter()
            .map(|address| NormalizedRecord {
                address,
                data: record.data.clone(),
                expansion,
            })
            .collect()
    }

    /// Run the cleaning steps only, without fan-out.
    ///
    /// With the built-in typo table, cleaning an already cleaned address
    /// returns it unchanged, including text that needed mojibake repair.
    pub fn clean(&self, raw: &str) -> String {
        let address = cleaning::prepare(raw, self.repair_mojibake);
        let address = cleaning::fix_typos(&address, &self.typos);
        let address = self.locality.ensure(&address);
        let address = self.locality.strip_org_prefix(&address);
        let address = cleaning::truncate_details(&address);
        let address = cleaning::strip_corner_clause(address);
        let cleaned = self.locality.ensure(&address);

        if cleaned != raw {
            debug!(raw, cleaned = %cleaned, "cleaned address");
        }
        cleaned
    }

    /// Apply the first matching fan-out rule to an already cleaned address.
    pub fn expand(&self, cleaned: &str) -> (Expansion, Vec<String>) {
        for rule in &self.rules {
            match rule.expand(cleaned, &self.locality) {
                None => continue,
                Some(Outcome::Expanded(addresses)) => {
                    debug!(address = cleaned, rule = %rule.kind(), count = addresses.len(), "expanded address");
                    let addresses = addresses
                        .iter()
                        .map(|address| self.locality.ensure(address.trim()))
                        .collect();
                    return (rule.kind(), addresses);
                }
                Some(Outcome::Rejected(reason)) => {
                    warn!(address = cleaned, rule = %rule.kind(), %reason, "keeping address unexpanded");
                    break;
                }
            }
        }

        (Expansion::Single, vec![self.locality.ensure(cleaned)])
    }
}

impl Default for AddressNormalizer {
    fn default() -> Self {
        Self::new(&Config::default()).expect("built-in configuration must be valid")
    }
}
