//! `address-expandr`: turn loosely written postal addresses into clean,
//! geocodable ones.
//!
//! Directory listings often carry addresses such as
//! `12489 Berlin ZPV, Johann-Hittorf-Straße 8` or `Rudower Chaussee 2 - 4`.
//! [`AddressNormalizer`] cleans each one into the form
//! `<postal code> <city> <street> <number>` and splits ranges and lists of
//! house numbers into one record per address.
//!
//! - [`normalizer`] — the cleaning pipeline and fan-out rules.
//! - [`config`] — defaults, TOML lookup and validation.
//! - [`models`] — input and output record types.
//! - [`records`] — JSON record I/O used by the CLI.
//! - [`report`] — run summaries.
//! - [`logging`] — `tracing` subscriber setup.

pub mod config;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod records;
pub mod report;

pub use config::{Config, ConfigError};
pub use models::{Expansion, NormalizedRecord, RawRecord};
pub use normalizer::AddressNormalizer;
