use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::item::{Item, ItemId};

/// An "if antecedent then consequent" rule mined from the transaction corpus.
///
/// `conviction` is `None` when the rule never fails on the corpus
/// (confidence of 1 against a consequent that is not universal), which would
/// otherwise divide by zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: Vec<Item>,
    pub consequent: Vec<Item>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub conviction: Option<f64>,
}

impl AssociationRule {
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.antecedent.iter().chain(self.consequent.iter()).map(|item| &item.id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.antecedent.iter().chain(self.consequent.iter())
    }

    pub fn mentions(&self, item_id: &ItemId) -> bool {
        self.item_ids().any(|id| id == item_id)
    }

    pub fn mentions_any_tag(&self, tags: &[&str]) -> bool {
        self.items().any(|item| item.has_any_tag(tags.iter().copied()))
    }
}

/// An ordered trip plan annotated with demo popularity figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub items: Vec<Item>,
    pub frequency: u32,
    pub support: f64,
}

impl Sequence {
    pub fn score(&self) -> f64 {
        self.support * f64::from(self.frequency)
    }

    pub fn shares_item_with(&self, ids: &[&ItemId]) -> bool {
        self.items.iter().any(|item| ids.contains(&&item.id))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub avg_spend: Decimal,
    pub size: u32,
    pub rule_indices: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRule {
    pub season: String,
    pub months: Vec<u32>,
    pub demand_multiplier: f64,
    pub tags: Vec<String>,
    pub rule_indices: Vec<usize>,
}

impl SeasonalRule {
    pub fn covers_month(&self, month: u32) -> bool {
        self.months.contains(&month)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoRule {
    pub region: String,
    pub anchor_destination: ItemId,
    pub cultural_factors: Vec<String>,
    pub rule_indices: Vec<usize>,
}
