use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tripbasket_cli::commands::{analytics, bundle, config, recommend, rules, views, GlobalArgs};
use tripbasket_core::TravelerContext;

fn seeded(seed: u64) -> GlobalArgs {
    GlobalArgs { seed: Some(seed), ..GlobalArgs::default() }
}

#[test]
fn rules_reports_seed_and_ranked_rules() {
    with_env(&[("TRIPBASKET_MINING_SEED", "42")], || {
        let result = rules::run(&GlobalArgs::default(), 5);
        assert_eq!(result.exit_code, 0, "expected successful rules run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "rules");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["seed"], 42);
        assert_eq!(payload["data"]["metrics"].as_array().map(Vec::len), Some(4));

        let lifts: Vec<f64> = payload["data"]["rules"]
            .as_array()
            .expect("rules should be an array")
            .iter()
            .filter_map(|rule| rule["lift"].as_f64())
            .collect();
        assert!(!lifts.is_empty() && lifts.len() <= 5);
        assert!(lifts.windows(2).all(|pair| pair[0] >= pair[1]));
    });
}

#[test]
fn same_seed_produces_identical_output() {
    with_env(&[], || {
        let first = rules::run(&seeded(7), 10);
        let second = rules::run(&seeded(7), 10);
        assert_eq!(first.output, second.output);
    });
}

#[test]
fn out_of_range_support_is_a_config_failure() {
    with_env(&[("TRIPBASKET_MINING_MIN_SUPPORT", "1.5")], || {
        let result = rules::run(&seeded(1), 5);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("min_support"));
    });
}

#[test]
fn malformed_seed_env_is_a_config_failure() {
    with_env(&[("TRIPBASKET_MINING_SEED", "not-a-number")], || {
        let result = analytics::run(&GlobalArgs::default());
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn recommend_excludes_context_items() {
    with_env(&[], || {
        let context = TravelerContext::new()
            .with_destination("Mauritius")
            .with_liked_activities(vec!["snorkeling".to_string()]);
        let result = recommend::run(&seeded(5), &context, 5);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let context_ids = ids(&payload["data"]["context"], |entry| &entry["id"]);
        assert_eq!(context_ids, vec!["mauritius", "snorkeling"]);

        let recommended = ids(&payload["data"]["recommendations"], |entry| &entry["item"]["id"]);
        assert!(recommended.len() <= 5);
        assert!(recommended.iter().all(|id| !context_ids.contains(id)));
    });
}

#[test]
fn recommend_with_unknown_profile_returns_empty_list() {
    with_env(&[], || {
        let context = TravelerContext::new().with_bucket_list(vec!["moon base".to_string()]);
        let result = recommend::run(&seeded(5), &context, 5);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "no context entries matched the catalog");
        assert_eq!(payload["data"]["recommendations"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn bundle_reports_unmatched_keys() {
    with_env(&[], || {
        let keys = vec!["Maldives".to_string(), "spa".to_string(), "moon base".to_string()];
        let result = bundle::run(&seeded(3), &keys);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(ids(&payload["data"]["selected"], |entry| &entry["id"]), vec!["maldives", "spa"]);
        assert_eq!(payload["data"]["unmatched"][0], "moon base");
        assert!(payload["data"]["bundles"].as_array().map(Vec::len).unwrap_or_default() <= 3);
    });
}

#[test]
fn views_resolve_known_keys_case_insensitively() {
    with_env(&[], || {
        let segment = parse_payload(&views::segment(&seeded(2), "Luxury-Travelers").output);
        assert_eq!(segment["status"], "ok");
        assert_eq!(segment["data"]["view"]["id"], "luxury-travelers");

        let season = parse_payload(&views::season(&seeded(2), 7).output);
        assert_eq!(season["data"]["view"]["season"], "Summer");

        let geo = parse_payload(&views::geo(&seeded(2), " INDIAN-OCEAN ").output);
        assert_eq!(geo["data"]["view"]["anchor_destination"], "mauritius");
    });
}

#[test]
fn unknown_view_keys_are_not_found() {
    with_env(&[], || {
        let segment = views::segment(&seeded(2), "space-tourists");
        assert_eq!(segment.exit_code, 1);
        assert_eq!(parse_payload(&segment.output)["error_class"], "not_found");

        let season = views::season(&seeded(2), 13);
        assert_eq!(season.exit_code, 1);
        assert_eq!(parse_payload(&season.output)["error_class"], "invalid_argument");
    });
}

#[test]
fn analytics_totals_are_consistent() {
    with_env(&[("TRIPBASKET_MINING_TRANSACTION_COUNT", "500")], || {
        let result = analytics::run(&seeded(9));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["transactions"], 500);
        assert_eq!(payload["data"]["catalog_items"], 24);
        assert_eq!(payload["data"]["settings"]["seed"], 9);
        assert_eq!(payload["data"]["analytics"]["total_segments"], 5);
        assert_eq!(payload["data"]["analytics"]["seasonal_insights"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn config_attributes_env_and_flag_sources() {
    with_env(&[("TRIPBASKET_LOG_LEVEL", "debug")], || {
        let result = config::run(&seeded(11));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let level = entry(&payload, "logging.level");
        assert_eq!(level["value"], "debug");
        assert_eq!(level["source"], "env (TRIPBASKET_LOG_LEVEL)");

        let seed = entry(&payload, "mining.seed");
        assert_eq!(seed["value"], "11");
        assert_eq!(seed["source"], "flag (--seed)");

        assert_eq!(entry(&payload, "mining.min_support")["source"], "default");
    });
}

#[test]
fn config_attributes_file_sources() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tripbasket.toml");
        fs::write(&path, "[mining]\nmin_support = 0.1\n").expect("write config");

        let args = GlobalArgs { config_path: Some(path.clone()), seed: None };
        let payload = parse_payload(&config::run(&args).output);

        let support = entry(&payload, "mining.min_support");
        assert_eq!(support["value"], "0.1");
        assert_eq!(support["source"], format!("file ({})", path.display()));
        assert_eq!(entry(&payload, "mining.seed")["value"], "<random>");
    });
}

#[test]
fn missing_explicit_config_file_is_a_config_failure() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = GlobalArgs { config_path: Some(dir.path().join("absent.toml")), seed: None };

        let result = config::run(&args);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn ids<'a>(list: &'a Value, id: impl Fn(&'a Value) -> &'a Value) -> Vec<&'a str> {
    list.as_array()
        .map(|entries| entries.iter().filter_map(|entry| id(entry).as_str()).collect())
        .unwrap_or_default()
}

fn entry<'a>(payload: &'a Value, key: &str) -> &'a Value {
    payload["data"]
        .as_array()
        .and_then(|entries| entries.iter().find(|entry| entry["key"] == key))
        .unwrap_or_else(|| panic!("config entry `{key}` should be present"))
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TRIPBASKET_MINING_MIN_SUPPORT",
        "TRIPBASKET_MINING_MIN_CONFIDENCE",
        "TRIPBASKET_MINING_TRANSACTION_COUNT",
        "TRIPBASKET_MINING_NOISE_PROBABILITY",
        "TRIPBASKET_MINING_SEED",
        "TRIPBASKET_LOGGING_LEVEL",
        "TRIPBASKET_LOGGING_FORMAT",
        "TRIPBASKET_LOG_LEVEL",
        "TRIPBASKET_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
