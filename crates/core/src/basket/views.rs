//! Derived views over the mined rules: segments, seasons, regions and the
//! demo trip sequences.

use rand::Rng;
use rust_decimal::Decimal;

use super::catalog::Catalog;
use crate::domain::item::ItemId;
use crate::domain::rule::{AssociationRule, CustomerSegment, GeoRule, SeasonalRule, Sequence};

#[derive(Debug, Clone, Copy)]
struct SegmentSeed {
    id: &'static str,
    name: &'static str,
    tags: &'static [&'static str],
    avg_spend_dollars: i64,
    size: u32,
}

const SEGMENT_SEEDS: &[SegmentSeed] = &[
    SegmentSeed {
        id: "luxury-travelers",
        name: "Luxury Travelers",
        tags: &["luxury"],
        avg_spend_dollars: 8_500,
        size: 1_200,
    },
    SegmentSeed {
        id: "adventure-seekers",
        name: "Adventure Seekers",
        tags: &["adventure"],
        avg_spend_dollars: 3_200,
        size: 2_600,
    },
    SegmentSeed {
        id: "culture-enthusiasts",
        name: "Culture Enthusiasts",
        tags: &["culture", "food"],
        avg_spend_dollars: 4_100,
        size: 3_100,
    },
    SegmentSeed {
        id: "budget-explorers",
        name: "Budget Explorers",
        tags: &["budget"],
        avg_spend_dollars: 1_400,
        size: 4_800,
    },
    SegmentSeed {
        id: "wellness-retreaters",
        name: "Wellness Retreaters",
        tags: &["wellness", "relaxation"],
        avg_spend_dollars: 5_600,
        size: 900,
    },
];

#[derive(Debug, Clone, Copy)]
struct SeasonSeed {
    season: &'static str,
    months: [u32; 3],
    demand_multiplier: f64,
    tags: &'static [&'static str],
}

const SEASON_SEEDS: &[SeasonSeed] = &[
    SeasonSeed {
        season: "Summer",
        months: [6, 7, 8],
        demand_multiplier: 1.4,
        tags: &["beach", "water", "tropical"],
    },
    SeasonSeed {
        season: "Autumn",
        months: [9, 10, 11],
        demand_multiplier: 0.9,
        tags: &["wine", "food", "wildlife"],
    },
    SeasonSeed {
        season: "Winter",
        months: [12, 1, 2],
        demand_multiplier: 1.2,
        tags: &["ski", "mountain"],
    },
    SeasonSeed {
        season: "Spring",
        months: [3, 4, 5],
        demand_multiplier: 1.1,
        tags: &["culture", "romantic", "city"],
    },
];

#[derive(Debug, Clone, Copy)]
struct GeoSeed {
    region: &'static str,
    anchor: &'static str,
    cultural_factors: &'static [&'static str],
}

const GEO_SEEDS: &[GeoSeed] = &[
    GeoSeed {
        region: "indian-ocean",
        anchor: "mauritius",
        cultural_factors: &["creole cuisine", "multilingual hospitality", "honeymoon tradition"],
    },
    GeoSeed {
        region: "western-europe",
        anchor: "paris",
        cultural_factors: &["museum culture", "cafe dining", "rail connectivity"],
    },
    GeoSeed {
        region: "east-asia",
        anchor: "tokyo",
        cultural_factors: &["culinary precision", "temple etiquette", "seasonal festivals"],
    },
    GeoSeed {
        region: "southeast-asia",
        anchor: "bali",
        cultural_factors: &["temple ceremonies", "street food", "wellness retreats"],
    },
    GeoSeed {
        region: "alpine-europe",
        anchor: "swiss-alps",
        cultural_factors: &["mountain huts", "winter sports", "punctual transit"],
    },
    GeoSeed {
        region: "southern-africa",
        anchor: "cape-town",
        cultural_factors: &["wildlife conservation", "winelands", "braai gatherings"],
    },
];

/// Ordered trip plans used for bundle suggestions.
const SEQUENCE_PATTERNS: &[&[&str]] = &[
    &["economy-flight", "bali", "hostel", "snorkeling"],
    &["business-class", "maldives", "luxury-resort", "spa"],
    &["business-class", "mauritius", "luxury-resort", "snorkeling"],
    &["paris", "boutique-hotel", "city-tour", "wine-tasting"],
    &["swiss-alps", "mountain-lodge", "skiing"],
    &["economy-flight", "tokyo", "cooking-class", "city-tour"],
    &["cape-town", "car-rental", "safari", "wine-tasting"],
    &["new-york", "boutique-hotel", "city-tour"],
];

fn matching_rules(rules: &[AssociationRule], predicate: impl Fn(&AssociationRule) -> bool) -> Vec<usize> {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| predicate(rule))
        .map(|(index, _)| index)
        .collect()
}

fn owned_tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| (*tag).to_owned()).collect()
}

pub fn build_segments(rules: &[AssociationRule]) -> Vec<CustomerSegment> {
    SEGMENT_SEEDS
        .iter()
        .map(|seed| CustomerSegment {
            id: seed.id.to_owned(),
            name: seed.name.to_owned(),
            tags: owned_tags(seed.tags),
            avg_spend: Decimal::from(seed.avg_spend_dollars),
            size: seed.size,
            rule_indices: matching_rules(rules, |rule| rule.mentions_any_tag(seed.tags)),
        })
        .collect()
}

pub fn build_seasonal_rules(rules: &[AssociationRule]) -> Vec<SeasonalRule> {
    SEASON_SEEDS
        .iter()
        .map(|seed| SeasonalRule {
            season: seed.season.to_owned(),
            months: seed.months.to_vec(),
            demand_multiplier: seed.demand_multiplier,
            tags: owned_tags(seed.tags),
            rule_indices: matching_rules(rules, |rule| rule.mentions_any_tag(seed.tags)),
        })
        .collect()
}

pub fn build_geo_rules(rules: &[AssociationRule]) -> Vec<GeoRule> {
    GEO_SEEDS
        .iter()
        .map(|seed| {
            let anchor = ItemId::new(seed.anchor);
            let rule_indices = matching_rules(rules, |rule| rule.mentions(&anchor));
            GeoRule {
                region: seed.region.to_owned(),
                anchor_destination: anchor,
                cultural_factors: owned_tags(seed.cultural_factors),
                rule_indices,
            }
        })
        .collect()
}

// Frequency and support are demo figures drawn at random; they are not
// computed from the transaction corpus.
pub fn generate_sequences<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Vec<Sequence> {
    SEQUENCE_PATTERNS
        .iter()
        .filter_map(|pattern| {
            let items: Vec<_> = pattern.iter().filter_map(|id| catalog.find_str(id)).cloned().collect();
            if items.is_empty() {
                return None;
            }
            Some(Sequence {
                items,
                frequency: rng.gen_range(50..=400),
                support: rng.gen_range(0.05..0.5),
            })
        })
        .collect()
}
