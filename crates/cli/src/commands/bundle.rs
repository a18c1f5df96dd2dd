use serde::Serialize;
use tripbasket_core::{AssociationRule, Item};

use crate::commands::{load_engine, CommandResult, GlobalArgs};

#[derive(Debug, Serialize)]
struct BundleOutput<'a> {
    seed: Option<u64>,
    selected: Vec<Item>,
    unmatched: Vec<String>,
    bundles: Vec<Vec<Item>>,
    best_rule: Option<&'a AssociationRule>,
}

/// Resolves the selected keys and reports the sequence bundles they overlap
/// plus the strongest rule fully contained in the selection.
pub fn run(args: &GlobalArgs, keys: &[String]) -> CommandResult {
    let engine = match load_engine("bundle", args) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let mut selected: Vec<Item> = Vec::new();
    let mut unmatched = Vec::new();
    for key in keys {
        match engine.item_by_id_or_name(key) {
            Some(item) if !selected.iter().any(|chosen| chosen.id == item.id) => {
                selected.push(item.clone());
            }
            Some(_) => {}
            None => unmatched.push(key.clone()),
        }
    }

    let bundles = engine.bundle_recommendations(&selected);
    let best_rule = engine.best_matching_rule(&selected);
    let message = match best_rule {
        Some(rule) => format!("{} bundle(s); best contained rule has lift {:.3}", bundles.len(), rule.lift),
        None => format!("{} bundle(s); no rule is contained in the selection", bundles.len()),
    };

    let output =
        BundleOutput { seed: engine.settings().seed, selected, unmatched, bundles, best_rule };
    CommandResult::success_with_data("bundle", message, &output)
}
