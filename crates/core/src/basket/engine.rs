//! Basket engine: construction pipeline and query surface

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::catalog::Catalog;
use super::miner::RuleMiner;
use super::synthesizer::TransactionSynthesizer;
use super::types::{Analytics, CategoryStat, Recommendation, SeasonalInsight};
use super::views::{build_geo_rules, build_seasonal_rules, build_segments, generate_sequences};
use super::{MiningSettings, BUNDLE_MIN_SUPPORT, MAX_BUNDLES};
use crate::domain::item::{Item, ItemCategory, ItemId, Transaction};
use crate::domain::rule::{AssociationRule, CustomerSegment, GeoRule, SeasonalRule, Sequence};
use crate::errors::DomainError;

/// Frozen market-basket model.
///
/// Built once, then shared by reference (or behind an `Arc`) with every
/// caller. Nothing is mutated after construction, so concurrent readers need
/// no locking; rebuilding means constructing a new engine and swapping the
/// handle.
#[derive(Debug, Clone)]
pub struct BasketEngine {
    settings: MiningSettings,
    catalog: Catalog,
    transactions: Vec<Transaction>,
    rules: Vec<AssociationRule>,
    sequences: Vec<Sequence>,
    segments: Vec<CustomerSegment>,
    seasons: Vec<SeasonalRule>,
    geo_regions: Vec<GeoRule>,
}

impl BasketEngine {
    /// Build from settings. Without a configured seed a fresh one is drawn
    /// and recorded in [`BasketEngine::settings`] so the run can be replayed.
    pub fn build(settings: MiningSettings) -> Result<Self, DomainError> {
        settings.validate()?;

        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);

        Self::build_with_rng(MiningSettings { seed: Some(seed), ..settings }, &mut rng)
    }

    pub fn build_with_rng<R: Rng + ?Sized>(settings: MiningSettings, rng: &mut R) -> Result<Self, DomainError> {
        settings.validate()?;
        info!(
            event_name = "basket.engine.build.start",
            seed = ?settings.seed,
            transaction_count = settings.transaction_count,
            min_support = settings.min_support,
            min_confidence = settings.min_confidence,
            "building basket engine"
        );

        let catalog = Catalog::travel();
        let transactions = TransactionSynthesizer::new(settings.transaction_count, settings.noise_probability)
            .generate(&catalog, rng);
        info!(
            event_name = "basket.engine.synthesized",
            transactions = transactions.len(),
            catalog_items = catalog.len(),
            "synthetic corpus generated"
        );

        let sequences = generate_sequences(&catalog, rng);
        Self::from_corpus(catalog, transactions, sequences, settings)
    }

    /// Build over an explicit catalog, corpus and sequence list.
    pub fn from_corpus(
        catalog: Catalog,
        transactions: Vec<Transaction>,
        sequences: Vec<Sequence>,
        settings: MiningSettings,
    ) -> Result<Self, DomainError> {
        settings.validate()?;

        let rules = RuleMiner::from_settings(&settings).mine(&catalog, &transactions);
        info!(
            event_name = "basket.engine.mined",
            rules = rules.len(),
            single_antecedent = rules.iter().filter(|rule| rule.antecedent.len() == 1).count(),
            "association rules mined"
        );

        let segments = build_segments(&rules);
        let seasons = build_seasonal_rules(&rules);
        let geo_regions = build_geo_rules(&rules);

        let engine = Self { settings, catalog, transactions, rules, sequences, segments, seasons, geo_regions };
        info!(
            event_name = "basket.engine.ready",
            rules = engine.rules.len(),
            sequences = engine.sequences.len(),
            segments = engine.segments.len(),
            "basket engine ready"
        );
        Ok(engine)
    }

    pub fn settings(&self) -> &MiningSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn segments(&self) -> &[CustomerSegment] {
        &self.segments
    }

    pub fn seasons(&self) -> &[SeasonalRule] {
        &self.seasons
    }

    pub fn geo_regions(&self) -> &[GeoRule] {
        &self.geo_regions
    }

    /// See [`Catalog::find_by_id_or_name`]: exact id first, then the first
    /// catalog item whose name overlaps the key.
    pub fn item_by_id_or_name(&self, key: &str) -> Option<&Item> {
        self.catalog.find_by_id_or_name(key)
    }

    /// Items implied by rules whose whole antecedent is in `context`, ranked by
    /// accumulated `lift * confidence`. Ties keep catalog order.
    pub fn recommendations(&self, context: &[Item], limit: usize) -> Vec<Recommendation> {
        let context_ids: HashSet<&ItemId> = context.iter().map(|item| &item.id).collect();
        let mut scores = vec![(0.0f64, 0usize); self.catalog.len()];

        for rule in &self.rules {
            if !rule.antecedent.iter().all(|item| context_ids.contains(&item.id)) {
                continue;
            }
            for item in &rule.consequent {
                if context_ids.contains(&item.id) {
                    continue;
                }
                if let Some(position) = self.catalog.position(&item.id) {
                    scores[position].0 += rule.lift * rule.confidence;
                    scores[position].1 += 1;
                }
            }
        }

        let mut ranked: Vec<(usize, f64, usize)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, (_, hits))| *hits > 0)
            .map(|(position, (score, hits))| (position, score, hits))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(limit)
            .filter_map(|(position, score, supporting_rules)| {
                self.catalog.get(position).map(|item| Recommendation {
                    item: item.clone(),
                    score,
                    supporting_rules,
                })
            })
            .collect()
    }

    /// Up to three trip sequences touching the context, best `support * frequency` first.
    pub fn bundle_recommendations(&self, context: &[Item]) -> Vec<Vec<Item>> {
        let context_ids: Vec<&ItemId> = context.iter().map(|item| &item.id).collect();
        if context_ids.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<&Sequence> = self
            .sequences
            .iter()
            .filter(|sequence| sequence.support > BUNDLE_MIN_SUPPORT)
            .filter(|sequence| sequence.shares_item_with(&context_ids))
            .collect();
        candidates.sort_by(|a, b| b.score().total_cmp(&a.score()));

        candidates.into_iter().take(MAX_BUNDLES).map(|sequence| sequence.items.clone()).collect()
    }

    /// Highest-lift rule fully contained in the bundle; the earliest mined rule
    /// wins a tie.
    pub fn best_matching_rule(&self, bundle: &[Item]) -> Option<&AssociationRule> {
        let bundle_ids: HashSet<&ItemId> = bundle.iter().map(|item| &item.id).collect();

        self.rules
            .iter()
            .filter(|rule| rule.item_ids().all(|id| bundle_ids.contains(id)))
            .fold(None, |best: Option<&AssociationRule>, rule| match best {
                Some(current) if current.lift >= rule.lift => Some(current),
                _ => Some(rule),
            })
    }

    pub fn top_rules(&self, limit: usize) -> Vec<&AssociationRule> {
        let mut ranked: Vec<&AssociationRule> = self.rules.iter().collect();
        ranked.sort_by(|a, b| b.lift.total_cmp(&a.lift));
        ranked.truncate(limit);
        ranked
    }

    pub fn segment(&self, segment_id: &str) -> Option<&CustomerSegment> {
        let key = segment_id.trim();
        self.segments.iter().find(|segment| segment.id.eq_ignore_ascii_case(key))
    }

    pub fn segment_rules(&self, segment_id: &str) -> Vec<&AssociationRule> {
        self.segment(segment_id).map(|segment| self.resolve(&segment.rule_indices)).unwrap_or_default()
    }

    pub fn season_for_month(&self, month: u32) -> Option<&SeasonalRule> {
        self.seasons.iter().find(|season| season.covers_month(month))
    }

    /// Months outside 1..=12 resolve to no rules.
    pub fn seasonal_rules(&self, month: u32) -> Vec<&AssociationRule> {
        self.season_for_month(month).map(|season| self.resolve(&season.rule_indices)).unwrap_or_default()
    }

    pub fn geo_region(&self, region: &str) -> Option<&GeoRule> {
        let key = region.trim();
        self.geo_regions.iter().find(|geo| geo.region.eq_ignore_ascii_case(key))
    }

    pub fn geo_rules(&self, region: &str) -> Vec<&AssociationRule> {
        self.geo_region(region).map(|geo| self.resolve(&geo.rule_indices)).unwrap_or_default()
    }

    pub fn analytics(&self) -> Analytics {
        let rule_count = self.rules.len();
        let mean = |sum: f64| (rule_count > 0).then(|| sum / rule_count as f64);

        Analytics {
            total_rules: rule_count,
            total_sequences: self.sequences.len(),
            total_segments: self.segments.len(),
            avg_confidence: mean(self.rules.iter().map(|rule| rule.confidence).sum()),
            avg_lift: mean(self.rules.iter().map(|rule| rule.lift).sum()),
            top_categories: self.category_stats(),
            seasonal_insights: self
                .seasons
                .iter()
                .map(|season| SeasonalInsight {
                    season: season.season.clone(),
                    months: season.months.clone(),
                    demand_multiplier: season.demand_multiplier,
                    rule_count: season.rule_indices.len(),
                })
                .collect(),
        }
    }

    fn category_stats(&self) -> Vec<CategoryStat> {
        let mut stats: Vec<CategoryStat> = ItemCategory::ALL
            .iter()
            .filter_map(|category| {
                let prices: Vec<Decimal> = self
                    .catalog
                    .iter()
                    .filter(|item| item.category == *category)
                    .map(|item| item.price)
                    .collect();
                if prices.is_empty() {
                    return None;
                }
                let total: Decimal = prices.iter().copied().sum();
                Some(CategoryStat {
                    category: *category,
                    count: prices.len(),
                    avg_price: (total / Decimal::from(prices.len())).round_dp(2),
                })
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&AssociationRule> {
        let rules: Vec<&AssociationRule> = indices.iter().filter_map(|index| self.rules.get(*index)).collect();
        debug!(requested = indices.len(), resolved = rules.len(), "resolved derived view rules");
        rules
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn engine() -> BasketEngine {
        BasketEngine::build(MiningSettings::seeded(2024)).unwrap()
    }

    fn items(engine: &BasketEngine, ids: &[&str]) -> Vec<Item> {
        ids.iter().filter_map(|id| engine.catalog().find_str(id)).cloned().collect()
    }

    fn item(id: &str) -> Item {
        Item {
            id: ItemId::new(id),
            name: id.to_owned(),
            category: ItemCategory::Activity,
            price: Decimal::ONE,
            tags: BTreeSet::new(),
        }
    }

    fn baskets(count: usize, ids: &[&str]) -> Vec<Transaction> {
        (0..count)
            .map(|_| Transaction::new(ids.iter().map(|id| ItemId::new(*id)).collect()))
            .collect()
    }

    fn sequence(ids: &[&str], frequency: u32, support: f64) -> Sequence {
        Sequence { items: ids.iter().map(|id| item(id)).collect(), frequency, support }
    }

    fn small_engine(sequences: Vec<Sequence>) -> BasketEngine {
        let catalog = Catalog::new(vec![item("a"), item("b"), item("c"), item("d")]);
        let mut transactions = baskets(40, &["a", "b", "c"]);
        transactions.extend(baskets(20, &["a", "b"]));
        transactions.extend(baskets(40, &["d"]));

        BasketEngine::from_corpus(catalog, transactions, sequences, MiningSettings::default()).unwrap()
    }

    #[test]
    fn build_records_drawn_seed() {
        let engine = BasketEngine::build(MiningSettings::default()).unwrap();
        assert!(engine.settings().seed.is_some());
        assert_eq!(engine.transactions().len(), 1000);
    }

    #[test]
    fn invalid_settings_fail_construction() {
        let settings = MiningSettings { min_confidence: 1.5, ..MiningSettings::default() };
        assert!(matches!(BasketEngine::build(settings), Err(DomainError::InvalidSettings(_))));
    }

    #[test]
    fn default_corpus_mines_rules() {
        let engine = engine();
        assert!(!engine.rules().is_empty());
        assert_eq!(engine.segments().len(), 5);
        assert_eq!(engine.seasons().len(), 4);
    }

    #[test]
    fn recommendations_accumulate_over_matching_rules() {
        let engine = small_engine(Vec::new());
        let context = vec![item("a"), item("b")];

        let recommendations = engine.recommendations(&context, 5);

        // a -> c, b -> c and {a, b} -> c all fire
        assert_eq!(recommendations.len(), 1);
        let top = &recommendations[0];
        assert_eq!(top.item.id.as_str(), "c");
        assert_eq!(top.supporting_rules, 3);

        let expected: f64 = engine
            .rules()
            .iter()
            .filter(|rule| rule.consequent[0].id.as_str() == "c")
            .filter(|rule| rule.antecedent.iter().all(|item| item.id.as_str() != "c"))
            .map(|rule| rule.lift * rule.confidence)
            .sum();
        assert!((top.score - expected).abs() < 1e-9);
    }

    #[test]
    fn recommendations_break_ties_by_catalog_order() {
        let engine = small_engine(Vec::new());
        let context = vec![item("c")];

        let recommendations = engine.recommendations(&context, 5);
        let ids: Vec<&str> = recommendations.iter().map(|rec| rec.item.id.as_str()).collect();

        // c -> a and c -> b score identically
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(recommendations[0].score, recommendations[1].score);
    }

    #[test]
    fn recommendations_respect_limit_and_empty_context() {
        let engine = small_engine(Vec::new());
        assert_eq!(engine.recommendations(&[item("c")], 1).len(), 1);
        assert!(engine.recommendations(&[], 5).is_empty());
        assert!(engine.recommendations(&[item("a")], 0).is_empty());
    }

    #[test]
    fn bundles_filter_by_support_and_overlap() {
        let engine = small_engine(vec![
            sequence(&["a", "d"], 100, 0.3),
            sequence(&["a", "b"], 300, 0.25),
            sequence(&["a", "c"], 400, 0.2),
            sequence(&["d"], 500, 0.45),
            sequence(&["b", "c"], 50, 0.21),
            sequence(&["c", "a", "b"], 200, 0.4),
        ]);

        let bundles = engine.bundle_recommendations(&[item("a")]);
        let firsts: Vec<Vec<&str>> = bundles
            .iter()
            .map(|bundle| bundle.iter().map(|item| item.id.as_str()).collect())
            .collect();

        // 0.2 support is not strictly above the threshold; the d-only and b/c
        // sequences share nothing with the context.
        assert_eq!(firsts, vec![vec!["c", "a", "b"], vec!["a", "b"], vec!["a", "d"]]);
    }

    #[test]
    fn empty_context_has_no_bundles() {
        let engine = small_engine(vec![sequence(&["a"], 100, 0.4)]);
        assert!(engine.bundle_recommendations(&[]).is_empty());
    }

    #[test]
    fn best_matching_rule_requires_full_containment() {
        let engine = small_engine(Vec::new());

        assert!(engine.best_matching_rule(&[item("a")]).is_none());
        assert!(engine.best_matching_rule(&[item("d"), item("a")]).is_none());

        let rule = engine.best_matching_rule(&[item("a"), item("b"), item("c")]).unwrap();
        let max_lift = engine.rules().iter().map(|rule| rule.lift).fold(f64::MIN, f64::max);
        assert_eq!(rule.lift, max_lift);
    }

    #[test]
    fn top_rules_sorted_by_lift() {
        let engine = engine();
        let top = engine.top_rules(10);

        assert_eq!(top.len(), engine.rules().len().min(10));
        assert!(top.windows(2).all(|pair| pair[0].lift >= pair[1].lift));
        assert_eq!(engine.top_rules(usize::MAX).len(), engine.rules().len());
    }

    #[test]
    fn view_lookups_tolerate_unknown_keys() {
        let engine = engine();

        assert!(engine.segment_rules("space-tourists").is_empty());
        assert!(engine.geo_rules("antarctica").is_empty());
        assert!(engine.seasonal_rules(0).is_empty());
        assert!(engine.seasonal_rules(13).is_empty());
    }

    #[test]
    fn view_lookups_are_case_insensitive() {
        let engine = engine();

        assert_eq!(engine.segment_rules("LUXURY-TRAVELERS"), engine.segment_rules("luxury-travelers"));
        assert_eq!(engine.geo_rules(" Indian-Ocean "), engine.geo_rules("indian-ocean"));
    }

    #[test]
    fn seasonal_rules_follow_month() {
        let engine = engine();
        assert_eq!(engine.season_for_month(7).unwrap().season, "Summer");
        assert_eq!(engine.season_for_month(1).unwrap().season, "Winter");
        assert_eq!(engine.seasonal_rules(7), engine.seasonal_rules(8));
    }

    #[test]
    fn analytics_without_rules_reports_no_averages() {
        let catalog = Catalog::travel();
        let engine = BasketEngine::from_corpus(catalog, Vec::new(), Vec::new(), MiningSettings::default()).unwrap();

        let analytics = engine.analytics();
        assert_eq!(analytics.total_rules, 0);
        assert_eq!(analytics.avg_confidence, None);
        assert_eq!(analytics.avg_lift, None);
        assert!(analytics.seasonal_insights.iter().all(|insight| insight.rule_count == 0));
    }

    #[test]
    fn analytics_averages_and_categories() {
        let engine = engine();
        let analytics = engine.analytics();

        let expected = engine.rules().iter().map(|rule| rule.confidence).sum::<f64>() / engine.rules().len() as f64;
        assert!((analytics.avg_confidence.unwrap() - expected).abs() < 1e-12);
        assert_eq!(analytics.total_segments, 5);
        assert_eq!(analytics.seasonal_insights.len(), 4);

        let counts: Vec<usize> = analytics.top_categories.iter().map(|stat| stat.count).collect();
        assert_eq!(counts, vec![8, 7, 4, 3, 2]);
        assert_eq!(analytics.top_categories[0].category, ItemCategory::Destination);
        assert_eq!(analytics.top_categories[4].avg_price, Decimal::new(187_50, 2));
    }

    #[test]
    fn queries_are_idempotent() {
        let engine = engine();
        let context = items(&engine, &["mauritius", "snorkeling"]);

        assert_eq!(engine.recommendations(&context, 5), engine.recommendations(&context, 5));
        assert_eq!(engine.bundle_recommendations(&context), engine.bundle_recommendations(&context));
        assert_eq!(engine.top_rules(5), engine.top_rules(5));
        assert_eq!(engine.analytics(), engine.analytics());
    }
}
