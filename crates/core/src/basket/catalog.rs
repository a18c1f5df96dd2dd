//! The fixed travel catalog

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::item::{Item, ItemCategory, ItemId};

#[derive(Debug, Clone, Copy)]
struct ItemSeed {
    id: &'static str,
    name: &'static str,
    category: ItemCategory,
    price_cents: i64,
    tags: &'static [&'static str],
}

const ITEM_SEEDS: &[ItemSeed] = &[
    ItemSeed {
        id: "paris",
        name: "Paris",
        category: ItemCategory::Destination,
        price_cents: 1_850_00,
        tags: &["culture", "romantic", "city", "food"],
    },
    ItemSeed {
        id: "bali",
        name: "Bali",
        category: ItemCategory::Destination,
        price_cents: 1_200_00,
        tags: &["beach", "tropical", "culture", "budget"],
    },
    ItemSeed {
        id: "mauritius",
        name: "Mauritius",
        category: ItemCategory::Destination,
        price_cents: 2_400_00,
        tags: &["beach", "luxury", "tropical"],
    },
    ItemSeed {
        id: "tokyo",
        name: "Tokyo",
        category: ItemCategory::Destination,
        price_cents: 2_100_00,
        tags: &["culture", "city", "food", "technology"],
    },
    ItemSeed {
        id: "maldives",
        name: "Maldives",
        category: ItemCategory::Destination,
        price_cents: 3_500_00,
        tags: &["beach", "luxury", "tropical", "romantic"],
    },
    ItemSeed {
        id: "swiss-alps",
        name: "Swiss Alps",
        category: ItemCategory::Destination,
        price_cents: 2_800_00,
        tags: &["mountain", "ski", "adventure", "nature"],
    },
    ItemSeed {
        id: "new-york",
        name: "New York",
        category: ItemCategory::Destination,
        price_cents: 1_950_00,
        tags: &["city", "culture", "shopping"],
    },
    ItemSeed {
        id: "cape-town",
        name: "Cape Town",
        category: ItemCategory::Destination,
        price_cents: 1_650_00,
        tags: &["adventure", "nature", "wine"],
    },
    ItemSeed {
        id: "snorkeling",
        name: "Snorkeling",
        category: ItemCategory::Activity,
        price_cents: 85_00,
        tags: &["water", "adventure", "nature"],
    },
    ItemSeed {
        id: "spa",
        name: "Spa Treatment",
        category: ItemCategory::Activity,
        price_cents: 180_00,
        tags: &["wellness", "relaxation", "luxury"],
    },
    ItemSeed {
        id: "city-tour",
        name: "City Tour",
        category: ItemCategory::Activity,
        price_cents: 45_00,
        tags: &["culture", "city", "budget"],
    },
    ItemSeed {
        id: "skiing",
        name: "Skiing",
        category: ItemCategory::Activity,
        price_cents: 320_00,
        tags: &["ski", "mountain", "adventure"],
    },
    ItemSeed {
        id: "wine-tasting",
        name: "Wine Tasting",
        category: ItemCategory::Activity,
        price_cents: 95_00,
        tags: &["food", "wine", "romantic"],
    },
    ItemSeed {
        id: "safari",
        name: "Safari",
        category: ItemCategory::Activity,
        price_cents: 450_00,
        tags: &["adventure", "nature", "wildlife"],
    },
    ItemSeed {
        id: "cooking-class",
        name: "Cooking Class",
        category: ItemCategory::Activity,
        price_cents: 120_00,
        tags: &["food", "culture"],
    },
    ItemSeed {
        id: "luxury-resort",
        name: "Luxury Resort",
        category: ItemCategory::Accommodation,
        price_cents: 650_00,
        tags: &["luxury", "beach", "relaxation"],
    },
    ItemSeed {
        id: "boutique-hotel",
        name: "Boutique Hotel",
        category: ItemCategory::Accommodation,
        price_cents: 280_00,
        tags: &["romantic", "city", "culture"],
    },
    ItemSeed {
        id: "hostel",
        name: "Hostel",
        category: ItemCategory::Accommodation,
        price_cents: 35_00,
        tags: &["budget", "adventure"],
    },
    ItemSeed {
        id: "mountain-lodge",
        name: "Mountain Lodge",
        category: ItemCategory::Accommodation,
        price_cents: 240_00,
        tags: &["mountain", "ski", "nature"],
    },
    ItemSeed {
        id: "business-class",
        name: "Business Class Flight",
        category: ItemCategory::Transportation,
        price_cents: 4_200_00,
        tags: &["luxury", "comfort"],
    },
    ItemSeed {
        id: "economy-flight",
        name: "Economy Flight",
        category: ItemCategory::Transportation,
        price_cents: 850_00,
        tags: &["budget"],
    },
    ItemSeed {
        id: "car-rental",
        name: "Car Rental",
        category: ItemCategory::Transportation,
        price_cents: 60_00,
        tags: &["road-trip", "nature", "adventure"],
    },
    ItemSeed {
        id: "travel-insurance",
        name: "Travel Insurance",
        category: ItemCategory::Service,
        price_cents: 75_00,
        tags: &["safety"],
    },
    ItemSeed {
        id: "private-guide",
        name: "Private Guide",
        category: ItemCategory::Service,
        price_cents: 300_00,
        tags: &["luxury", "culture"],
    },
];

fn item_from_seed(seed: &ItemSeed) -> Item {
    Item {
        id: ItemId::new(seed.id),
        name: seed.name.to_owned(),
        category: seed.category,
        price: Decimal::new(seed.price_cents, 2),
        tags: seed.tags.iter().map(|tag| (*tag).to_owned()).collect(),
    }
}

/// Ordered, immutable item list. Catalog order is the tie-breaker for every
/// ranking the engine produces.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Later duplicates of an id are ignored.
    pub fn new(items: Vec<Item>) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if positions.contains_key(&item.id) {
                continue;
            }
            positions.insert(item.id.clone(), kept.len());
            kept.push(item);
        }
        Self { items: kept, positions }
    }

    pub fn travel() -> Self {
        Self::new(ITEM_SEEDS.iter().map(item_from_seed).collect())
    }

    pub fn find(&self, item_id: &ItemId) -> Option<&Item> {
        self.position(item_id).map(|index| &self.items[index])
    }

    pub fn find_str(&self, item_id: &str) -> Option<&Item> {
        self.find(&ItemId::new(item_id))
    }

    pub fn position(&self, item_id: &ItemId) -> Option<usize> {
        self.positions.get(item_id).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Case-insensitive lookup. An exact id match anywhere in the catalog
    /// wins; otherwise the first item, in catalog order, whose name contains
    /// the key or is contained in it.
    pub fn find_by_id_or_name(&self, key: &str) -> Option<&Item> {
        let needle = key.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(item) = self.items.iter().find(|item| item.id.as_str().to_lowercase() == needle) {
            return Some(item);
        }

        self.items.iter().find(|item| {
            let name = item.name.to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        })
    }
}
