//! Segment, season and region views over the mined rules

use serde::Serialize;
use tripbasket_core::{AssociationRule, BasketEngine};

use crate::commands::{load_engine, CommandResult, GlobalArgs};

#[derive(Debug, Serialize)]
struct ViewOutput<'a, V: Serialize> {
    seed: Option<u64>,
    view: &'a V,
    rules: Vec<&'a AssociationRule>,
}

pub fn segment(args: &GlobalArgs, segment_id: &str) -> CommandResult {
    with_engine("segment", args, |engine| {
        let Some(segment) = engine.segment(segment_id) else {
            let known: Vec<&str> = engine.segments().iter().map(|s| s.id.as_str()).collect();
            return unknown_key("segment", segment_id, &known);
        };
        respond("segment", engine, segment, engine.segment_rules(segment_id))
    })
}

pub fn season(args: &GlobalArgs, month: u32) -> CommandResult {
    if !(1..=12).contains(&month) {
        return CommandResult::failure(
            "season",
            "invalid_argument",
            format!("month must be within 1..=12, got {month}"),
            1,
        );
    }

    with_engine("season", args, |engine| {
        let Some(season) = engine.season_for_month(month) else {
            return unknown_key("season", &month.to_string(), &[]);
        };
        respond("season", engine, season, engine.seasonal_rules(month))
    })
}

pub fn geo(args: &GlobalArgs, region: &str) -> CommandResult {
    with_engine("geo", args, |engine| {
        let Some(geo) = engine.geo_region(region) else {
            let known: Vec<&str> = engine.geo_regions().iter().map(|g| g.region.as_str()).collect();
            return unknown_key("geo", region, &known);
        };
        respond("geo", engine, geo, engine.geo_rules(region))
    })
}

fn with_engine(
    command: &str,
    args: &GlobalArgs,
    render: impl FnOnce(&BasketEngine) -> CommandResult,
) -> CommandResult {
    match load_engine(command, args) {
        Ok(engine) => render(&engine),
        Err(failure) => failure,
    }
}

fn respond<V: Serialize>(
    command: &str,
    engine: &BasketEngine,
    view: &V,
    rules: Vec<&AssociationRule>,
) -> CommandResult {
    let message = format!("{} matching rule(s)", rules.len());
    let output = ViewOutput { seed: engine.settings().seed, view, rules };
    CommandResult::success_with_data(command, message, &output)
}

fn unknown_key(command: &str, key: &str, known: &[&str]) -> CommandResult {
    let message = if known.is_empty() {
        format!("unknown {command} `{}`", key.trim())
    } else {
        format!("unknown {command} `{}` (known: {})", key.trim(), known.join(", "))
    };
    CommandResult::failure(command, "not_found", message, 1)
}
