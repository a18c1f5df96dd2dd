//! Synthetic booking corpus

use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::Catalog;
use crate::domain::item::{ItemId, Transaction};

/// Hand-authored baskets the corpus is sampled from.
const BASKET_PATTERNS: &[&[&str]] = &[
    // beach getaway
    &["mauritius", "snorkeling", "luxury-resort", "business-class"],
    // luxury escape
    &["maldives", "spa", "luxury-resort", "business-class", "private-guide"],
    // culture trip
    &["paris", "city-tour", "boutique-hotel", "wine-tasting"],
    // backpacker
    &["bali", "hostel", "economy-flight", "snorkeling"],
    // ski week
    &["swiss-alps", "skiing", "mountain-lodge", "travel-insurance"],
    // food tour
    &["tokyo", "cooking-class", "city-tour", "economy-flight"],
    // safari
    &["cape-town", "safari", "car-rental", "travel-insurance"],
    // city break
    &["new-york", "city-tour", "boutique-hotel"],
    // romantic
    &["paris", "wine-tasting", "boutique-hotel", "spa"],
    // wellness retreat
    &["bali", "spa", "luxury-resort"],
];

#[derive(Debug, Clone)]
pub struct TransactionSynthesizer {
    patterns: Vec<Vec<ItemId>>,
    transaction_count: usize,
    noise_probability: f64,
}

impl TransactionSynthesizer {
    pub fn new(transaction_count: usize, noise_probability: f64) -> Self {
        Self::with_patterns(
            BASKET_PATTERNS
                .iter()
                .map(|pattern| pattern.iter().map(|id| ItemId::new(*id)).collect())
                .collect(),
            transaction_count,
            noise_probability,
        )
    }

    pub fn with_patterns(
        patterns: Vec<Vec<ItemId>>,
        transaction_count: usize,
        noise_probability: f64,
    ) -> Self {
        let noise_probability =
            if noise_probability.is_nan() { 0.0 } else { noise_probability.clamp(0.0, 1.0) };
        Self { patterns, transaction_count, noise_probability }
    }

    pub fn patterns(&self) -> &[Vec<ItemId>] {
        &self.patterns
    }

    /// Produces exactly `transaction_count` baskets. Pattern ids missing from
    /// the catalog are dropped, never reported.
    pub fn generate<R: Rng + ?Sized>(&self, catalog: &Catalog, rng: &mut R) -> Vec<Transaction> {
        let mut transactions = Vec::with_capacity(self.transaction_count);

        for _ in 0..self.transaction_count {
            let mut items: Vec<ItemId> = match self.patterns.choose(rng) {
                Some(pattern) => pattern
                    .iter()
                    .filter_map(|id| catalog.find(id))
                    .map(|item| item.id.clone())
                    .collect(),
                None => Vec::new(),
            };

            if rng.gen_bool(self.noise_probability) {
                if let Some(extra) = catalog.items().choose(rng) {
                    if !items.contains(&extra.id) {
                        items.push(extra.id.clone());
                    }
                }
            }

            transactions.push(Transaction::new(items));
        }

        transactions
    }
}
