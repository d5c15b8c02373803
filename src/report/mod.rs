//! Run summaries for the command-line front end.
//!
//! - [`Summary`] — counts input and output rows per fan-out rule.
//! - [`terminal`] — colored, tabular rendering; respects `--verbose` / `--quiet`.

pub mod terminal;

use std::collections::BTreeMap;

use crate::models::{Expansion, NormalizedRecord};

/// Rows read, rows written, and which rule handled each input row.
#[derive(Debug, Default)]
pub struct Summary {
    pub input_rows: usize,
    pub output_rows: usize,
    /// Per rule: (input rows, output rows).
    pub by_rule: BTreeMap<Expansion, (usize, usize)>,
    /// Inputs that produced more than one address.
    pub fanned_out: Vec<FannedOut>,
}

#[derive(Debug)]
pub struct FannedOut {
    pub original: String,
    pub addresses: Vec<String>,
}

impl Summary {
    /// Account for one input row and the records derived from it.
    pub fn record<T>(&mut self, original: Option<&str>, outputs: &[NormalizedRecord<T>]) {
        self.input_rows += 1;
        self.output_rows += outputs.len();

        let Some(first) = outputs.first() else {
            return;
        };
        let entry = self.by_rule.entry(first.expansion).or_default();
        entry.0 += 1;
        entry.1 += outputs.len();

        if outputs.len() > 1 {
            self.fanned_out.push(FannedOut {
                original: original.unwrap_or_default().to_string(),
                addresses: outputs.iter().map(|r| r.address.clone()).collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use crate::normalizer::AddressNormalizer;

    #[test]
    fn test_summary_counts() {
        let normalizer = AddressNormalizer::default();
        let mut summary = Summary::default();
        for input in ["Rudower Chaussee 2 - 4", "Am Studio 14/16", "Rudower Chaussee 17"] {
            let raw = RawRecord::new(input, ());
            summary.record(raw.address.as_deref(), &normalizer.normalize(&raw));
        }

        assert_eq!(summary.input_rows, 3);
        assert_eq!(summary.output_rows, 6);
        assert_eq!(summary.by_rule[&Expansion::NumberRange], (1, 3));
        assert_eq!(summary.by_rule[&Expansion::SlashPair], (1, 2));
        assert_eq!(summary.by_rule[&Expansion::Single], (1, 1));
        assert_eq!(summary.fanned_out.len(), 2);
        assert_eq!(summary.fanned_out[0].original, "Rudower Chaussee 2 - 4");
    }
}
