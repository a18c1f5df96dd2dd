//! Market-basket analysis over the travel catalog
//!
//! Builds a synthetic booking corpus, mines association rules from it and
//! answers recommendation, bundling and analytics queries against the frozen
//! result. Construction happens once in [`BasketEngine::build`]; every query
//! afterwards is read-only.

mod catalog;
mod context;
mod engine;
mod miner;
mod synthesizer;
mod types;
mod views;

pub use catalog::Catalog;
pub use context::TravelerContext;
pub use engine::BasketEngine;
pub use miner::{RuleMiner, TransactionIndex};
pub use synthesizer::TransactionSynthesizer;
pub use types::*;
pub use views::{build_geo_rules, build_seasonal_rules, build_segments, generate_sequences};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Minimum fraction of transactions an item-set must appear in
pub const DEFAULT_MIN_SUPPORT: f64 = 0.08;

/// Minimum conditional probability for an emitted rule
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Size of the synthetic corpus, the `N` of every support computation
pub const DEFAULT_TRANSACTION_COUNT: usize = 1000;

/// Chance that a synthesized basket receives one extra random item
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.3;

/// Sequences at or below this support never become bundles
pub const BUNDLE_MIN_SUPPORT: f64 = 0.2;

/// Maximum bundles returned per context
pub const MAX_BUNDLES: usize = 3;

/// Default recommendation count for callers without a preference
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

const MAX_TRANSACTION_COUNT: usize = 1_000_000;

/// Parameters fixed at engine construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningSettings {
    pub min_support: f64,
    pub min_confidence: f64,
    pub transaction_count: usize,
    pub noise_probability: f64,
    /// Seed for the corpus and sequence generator; `None` draws a fresh one.
    pub seed: Option<u64>,
}

impl Default for MiningSettings {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            transaction_count: DEFAULT_TRANSACTION_COUNT,
            noise_probability: DEFAULT_NOISE_PROBABILITY,
            seed: None,
        }
    }
}

impl MiningSettings {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(DomainError::InvalidSettings(format!(
                "mining.min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(DomainError::InvalidSettings(format!(
                "mining.min_confidence must be in (0, 1], got {}",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(DomainError::InvalidSettings(format!(
                "mining.noise_probability must be in [0, 1], got {}",
                self.noise_probability
            )));
        }
        if self.transaction_count == 0 || self.transaction_count > MAX_TRANSACTION_COUNT {
            return Err(DomainError::InvalidSettings(format!(
                "mining.transaction_count must be in 1..={MAX_TRANSACTION_COUNT}, got {}",
                self.transaction_count
            )));
        }
        Ok(())
    }
}
