use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Destination,
    Activity,
    Accommodation,
    Transportation,
    Service,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Destination,
        ItemCategory::Activity,
        ItemCategory::Accommodation,
        ItemCategory::Transportation,
        ItemCategory::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Destination => "destination",
            ItemCategory::Activity => "activity",
            ItemCategory::Accommodation => "accommodation",
            ItemCategory::Transportation => "transportation",
            ItemCategory::Service => "service",
        }
    }
}

/// A bookable travel element. Prices are in USD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub price: Decimal,
    pub tags: BTreeSet<String>,
}

impl Item {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_any_tag<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> bool {
        tags.into_iter().any(|tag| self.has_tag(tag))
    }
}

/// One synthetic booking: a set of distinct item ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub items: Vec<ItemId>,
}

impl Transaction {
    pub fn new(items: Vec<ItemId>) -> Self {
        let mut distinct: Vec<ItemId> = Vec::with_capacity(items.len());
        for item in items {
            if !distinct.contains(&item) {
                distinct.push(item);
            }
        }
        Self { items: distinct }
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.items.contains(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
