use serde::Serialize;
use tripbasket_core::{Item, Recommendation, TravelerContext};

use crate::commands::{load_engine, CommandResult, GlobalArgs};

#[derive(Debug, Serialize)]
struct RecommendOutput {
    seed: Option<u64>,
    context: Vec<Item>,
    recommendations: Vec<Recommendation>,
}

pub fn run(args: &GlobalArgs, context: &TravelerContext, limit: usize) -> CommandResult {
    let engine = match load_engine("recommend", args) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let resolved = context.resolve(&engine);
    let recommendations = engine.recommendations(&resolved, limit);

    let message = if resolved.is_empty() {
        "no context entries matched the catalog".to_string()
    } else {
        format!(
            "{} recommendation(s) for {} context item(s)",
            recommendations.len(),
            resolved.len()
        )
    };

    let output =
        RecommendOutput { seed: engine.settings().seed, context: resolved, recommendations };
    CommandResult::success_with_data("recommend", message, &output)
}
