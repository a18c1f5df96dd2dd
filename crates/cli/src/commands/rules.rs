use serde::Serialize;
use tripbasket_core::{AssociationRule, RuleMetric};

use crate::commands::{load_engine, CommandResult, GlobalArgs};

#[derive(Debug, Serialize)]
struct RulesOutput<'a> {
    seed: Option<u64>,
    total_rules: usize,
    rules: Vec<&'a AssociationRule>,
    metrics: Vec<MetricDefinition>,
}

#[derive(Debug, Serialize)]
struct MetricDefinition {
    metric: RuleMetric,
    formula: &'static str,
    interpretation: &'static str,
}

pub fn run(args: &GlobalArgs, limit: usize) -> CommandResult {
    let engine = match load_engine("rules", args) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let rules = engine.top_rules(limit);
    let message = format!("{} of {} rules by lift", rules.len(), engine.rules().len());
    let output = RulesOutput {
        seed: engine.settings().seed,
        total_rules: engine.rules().len(),
        rules,
        metrics: RuleMetric::ALL
            .iter()
            .map(|metric| MetricDefinition {
                metric: *metric,
                formula: metric.formula(),
                interpretation: metric.interpretation(),
            })
            .collect(),
    };

    CommandResult::success_with_data("rules", message, &output)
}
