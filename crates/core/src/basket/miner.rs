//! Association rule mining

use super::catalog::Catalog;
use super::MiningSettings;
use crate::domain::item::Transaction;
use crate::domain::rule::AssociationRule;

/// One bitset per catalog item over the transaction corpus, so co-occurrence
/// counts are an AND plus popcount instead of a scan of every basket.
#[derive(Debug, Clone)]
pub struct TransactionIndex {
    transaction_count: usize,
    words: usize,
    bitsets: Vec<Vec<u64>>,
}

impl TransactionIndex {
    /// Transaction items that are not in the catalog are ignored.
    pub fn build(catalog: &Catalog, transactions: &[Transaction]) -> Self {
        let words = transactions.len().div_ceil(64);
        let mut bitsets = vec![vec![0u64; words]; catalog.len()];

        for (row, transaction) in transactions.iter().enumerate() {
            for item_id in &transaction.items {
                if let Some(position) = catalog.position(item_id) {
                    bitsets[position][row / 64] |= 1u64 << (row % 64);
                }
            }
        }

        Self { transaction_count: transactions.len(), words, bitsets }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    /// Number of transactions containing every listed catalog position.
    /// An empty list matches every transaction.
    pub fn count(&self, positions: &[usize]) -> usize {
        if positions.is_empty() {
            return self.transaction_count;
        }
        if positions.iter().any(|position| *position >= self.bitsets.len()) {
            return 0;
        }

        (0..self.words)
            .map(|word| {
                positions
                    .iter()
                    .fold(u64::MAX, |acc, position| acc & self.bitsets[*position][word])
                    .count_ones() as usize
            })
            .sum()
    }

    pub fn support(&self, positions: &[usize]) -> f64 {
        ratio(self.count(positions), self.transaction_count)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn lift(confidence: f64, consequent_support: f64) -> f64 {
    if consequent_support > 0.0 {
        confidence / consequent_support
    } else {
        0.0
    }
}

/// `(1 - support(B)) / (1 - confidence)`. A consequent present in every
/// basket has conviction 0; a rule that never fails has no finite value.
fn conviction(confidence: f64, consequent_support: f64) -> Option<f64> {
    if consequent_support >= 1.0 {
        return Some(0.0);
    }
    if confidence >= 1.0 {
        return None;
    }
    Some((1.0 - consequent_support) / (1.0 - confidence))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMiner {
    min_support: f64,
    min_confidence: f64,
}

impl RuleMiner {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self { min_support, min_confidence }
    }

    pub fn from_settings(settings: &MiningSettings) -> Self {
        Self::new(settings.min_support, settings.min_confidence)
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Mines 1-antecedent rules first (catalog order of A, then B), followed
    /// by 2-antecedent rules (catalog order of the A<B pair, then C).
    pub fn mine(&self, catalog: &Catalog, transactions: &[Transaction]) -> Vec<AssociationRule> {
        let index = TransactionIndex::build(catalog, transactions);
        self.mine_indexed(catalog, &index)
    }

    pub fn mine_indexed(&self, catalog: &Catalog, index: &TransactionIndex) -> Vec<AssociationRule> {
        let n = index.transaction_count();
        if n == 0 {
            return Vec::new();
        }

        let item_counts: Vec<usize> = (0..catalog.len()).map(|position| index.count(&[position])).collect();
        let frequent: Vec<usize> = (0..catalog.len())
            .filter(|position| ratio(item_counts[*position], n) >= self.min_support)
            .collect();

        let mut rules = Vec::new();

        for &a in &frequent {
            for &b in &frequent {
                if a == b {
                    continue;
                }

                let pair_count = index.count(&[a, b]);
                let support = ratio(pair_count, n);
                let confidence = ratio(pair_count, item_counts[a]);

                if support >= self.min_support && confidence >= self.min_confidence {
                    rules.push(self.rule(catalog, &[a], b, support, confidence, ratio(item_counts[b], n)));
                }
            }
        }

        for (offset, &a) in frequent.iter().enumerate() {
            for &b in &frequent[offset + 1..] {
                let pair_count = index.count(&[a, b]);
                if ratio(pair_count, n) < self.min_support {
                    continue;
                }

                for &c in &frequent {
                    if c == a || c == b {
                        continue;
                    }

                    let triple_count = index.count(&[a, b, c]);
                    let support = ratio(triple_count, n);
                    let confidence = ratio(triple_count, pair_count);

                    if support >= self.min_support && confidence >= self.min_confidence {
                        rules.push(self.rule(
                            catalog,
                            &[a, b],
                            c,
                            support,
                            confidence,
                            ratio(item_counts[c], n),
                        ));
                    }
                }
            }
        }

        rules
    }

    fn rule(
        &self,
        catalog: &Catalog,
        antecedent: &[usize],
        consequent: usize,
        support: f64,
        confidence: f64,
        consequent_support: f64,
    ) -> AssociationRule {
        AssociationRule {
            antecedent: antecedent.iter().filter_map(|position| catalog.get(*position)).cloned().collect(),
            consequent: catalog.get(consequent).cloned().into_iter().collect(),
            support,
            confidence,
            lift: lift(confidence, consequent_support),
            conviction: conviction(confidence, consequent_support),
        }
    }
}

impl Default for RuleMiner {
    fn default() -> Self {
        Self::from_settings(&MiningSettings::default())
    }
}
