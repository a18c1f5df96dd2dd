pub mod basket;
pub mod config;
pub mod domain;
pub mod errors;

pub use basket::{
    Analytics, BasketEngine, Catalog, CategoryStat, MiningSettings, Recommendation, RuleMetric,
    RuleMiner, SeasonalInsight, TransactionIndex, TransactionSynthesizer, TravelerContext,
};
pub use domain::item::{Item, ItemCategory, ItemId, Transaction};
pub use domain::rule::{AssociationRule, CustomerSegment, GeoRule, SeasonalRule, Sequence};
pub use errors::{ApplicationError, DomainError};
