//! Types returned by the basket query surface

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::item::{Item, ItemCategory};

/// A scored recommendation derived from matching association rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: Item,
    /// Sum of `lift * confidence` over every rule that recommends the item
    pub score: f64,
    /// Number of rules that contributed to the score
    pub supporting_rules: usize,
}

/// Aggregate figures over the mined rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_rules: usize,
    pub total_sequences: usize,
    pub total_segments: usize,
    /// `None` when no rules were mined
    pub avg_confidence: Option<f64>,
    /// `None` when no rules were mined
    pub avg_lift: Option<f64>,
    pub top_categories: Vec<CategoryStat>,
    pub seasonal_insights: Vec<SeasonalInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: ItemCategory,
    pub count: usize,
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalInsight {
    pub season: String,
    pub months: Vec<u32>,
    pub demand_multiplier: f64,
    pub rule_count: usize,
}

/// Interest measures reported for every rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMetric {
    Support,
    Confidence,
    Lift,
    Conviction,
}

impl RuleMetric {
    pub const ALL: [RuleMetric; 4] =
        [RuleMetric::Support, RuleMetric::Confidence, RuleMetric::Lift, RuleMetric::Conviction];

    pub fn name(&self) -> &'static str {
        match self {
            RuleMetric::Support => "support",
            RuleMetric::Confidence => "confidence",
            RuleMetric::Lift => "lift",
            RuleMetric::Conviction => "conviction",
        }
    }

    /// Definition as computed by the miner, for display next to rule values
    pub fn formula(&self) -> &'static str {
        match self {
            RuleMetric::Support => "support(X) = transactions containing every item of X / N",
            RuleMetric::Confidence => "confidence(A -> B) = support(A ∪ B) / support(A)",
            RuleMetric::Lift => "lift(A -> B) = confidence(A -> B) / support(B)",
            RuleMetric::Conviction => {
                "conviction(A -> B) = (1 - support(B)) / (1 - confidence(A -> B)), undefined when confidence = 1"
            }
        }
    }

    /// Human-readable reading of the value
    pub fn interpretation(&self) -> &'static str {
        match self {
            RuleMetric::Support => "How often the items are booked together",
            RuleMetric::Confidence => "How often B is booked when A is booked",
            RuleMetric::Lift => "Above 1 means A makes B more likely than its baseline",
            RuleMetric::Conviction => "Grows as the rule is violated less often than chance predicts",
        }
    }
}
