//! Turning a traveler profile into context items for the query surface

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::BasketEngine;
use crate::domain::item::Item;

/// Free-text preferences collected from a profile, chat or trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerContext {
    pub destination: Option<String>,
    pub liked_activities: Vec<String>,
    pub liked_food: Vec<String>,
    pub bucket_list: Vec<String>,
    pub visited_destinations: Vec<String>,
}

impl TravelerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_liked_activities(mut self, activities: Vec<String>) -> Self {
        self.liked_activities = activities;
        self
    }

    pub fn with_liked_food(mut self, food: Vec<String>) -> Self {
        self.liked_food = food;
        self
    }

    pub fn with_bucket_list(mut self, entries: Vec<String>) -> Self {
        self.bucket_list = entries;
        self
    }

    pub fn with_visited_destinations(mut self, destinations: Vec<String>) -> Self {
        self.visited_destinations = destinations;
        self
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.destination
            .iter()
            .chain(&self.liked_activities)
            .chain(&self.liked_food)
            .chain(&self.bucket_list)
            .chain(&self.visited_destinations)
            .map(String::as_str)
    }

    /// Resolves every entry through [`BasketEngine::item_by_id_or_name`] and
    /// keeps the first item per id and per lower-cased name. Entries that
    /// match nothing are skipped.
    pub fn resolve(&self, engine: &BasketEngine) -> Vec<Item> {
        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut items = Vec::new();

        for key in self.keys() {
            let Some(item) = engine.item_by_id_or_name(key) else {
                debug!(key, "context entry did not match any catalog item");
                continue;
            };

            if !seen_ids.insert(item.id.clone()) || !seen_names.insert(item.name.to_lowercase()) {
                continue;
            }
            items.push(item.clone());
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::MiningSettings;

    fn engine() -> BasketEngine {
        BasketEngine::build(MiningSettings { transaction_count: 200, ..MiningSettings::seeded(9) }).unwrap()
    }

    #[test]
    fn resolves_every_field_in_order() {
        let context = TravelerContext::new()
            .with_destination("Mauritius")
            .with_liked_activities(vec!["snorkeling".to_owned(), "Spa".to_owned()])
            .with_liked_food(vec!["cooking class".to_owned()])
            .with_bucket_list(vec!["safari".to_owned()])
            .with_visited_destinations(vec!["PARIS".to_owned()]);

        let ids: Vec<String> = context.resolve(&engine()).into_iter().map(|item| item.id.0).collect();

        assert_eq!(ids, vec!["mauritius", "snorkeling", "spa", "cooking-class", "safari", "paris"]);
    }

    #[test]
    fn duplicates_and_unknown_entries_are_dropped() {
        let context = TravelerContext::new()
            .with_destination("bali")
            .with_liked_activities(vec!["Bali".to_owned(), "underwater basket weaving".to_owned()])
            .with_visited_destinations(vec!["BALI".to_owned(), "".to_owned()]);

        let items = context.resolve(&engine());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "bali");
    }

    #[test]
    fn empty_profile_resolves_to_empty_context() {
        assert!(TravelerContext::new().resolve(&engine()).is_empty());
    }
}
