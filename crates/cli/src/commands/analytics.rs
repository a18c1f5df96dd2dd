use serde::Serialize;
use tripbasket_core::{Analytics, MiningSettings};

use crate::commands::{load_engine, CommandResult, GlobalArgs};

#[derive(Debug, Serialize)]
struct AnalyticsOutput {
    settings: MiningSettings,
    transactions: usize,
    catalog_items: usize,
    analytics: Analytics,
}

pub fn run(args: &GlobalArgs) -> CommandResult {
    let engine = match load_engine("analytics", args) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let analytics = engine.analytics();
    let message = format!(
        "{} rules mined from {} transactions",
        analytics.total_rules,
        engine.transactions().len()
    );
    let output = AnalyticsOutput {
        settings: *engine.settings(),
        transactions: engine.transactions().len(),
        catalog_items: engine.catalog().len(),
        analytics,
    };

    CommandResult::success_with_data("analytics", message, &output)
}
