use tripbasket_core::Catalog;

use crate::commands::CommandResult;

/// Catalog lookups do not depend on mined data, so no engine is built.
pub fn run(key: &str) -> CommandResult {
    let catalog = Catalog::travel();

    match catalog.find_by_id_or_name(key) {
        Some(item) => {
            CommandResult::success_with_data("item", format!("matched `{}`", item.id), item)
        }
        None => CommandResult::failure(
            "item",
            "not_found",
            format!("no catalog item matches `{}`", key.trim()),
            1,
        ),
    }
}
