use std::env;
use std::fs;
use std::path::Path;

use serde::Serialize;
use toml::Value;
use tripbasket_core::config::{resolve_config_path, AppConfig};
use tripbasket_core::ApplicationError;

use crate::commands::{CommandResult, GlobalArgs};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

pub fn run(args: &GlobalArgs) -> CommandResult {
    let config = match AppConfig::load(args.load_options()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(args.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let sources = Sources { doc: config_file_doc.as_ref(), path: config_file_path.as_deref() };

    let mining = &config.mining;
    let seed = mining.seed.map(|seed| seed.to_string()).unwrap_or_else(|| "<random>".to_string());
    let entries = vec![
        sources.entry(
            "mining.min_support",
            mining.min_support.to_string(),
            &["TRIPBASKET_MINING_MIN_SUPPORT"],
            None,
        ),
        sources.entry(
            "mining.min_confidence",
            mining.min_confidence.to_string(),
            &["TRIPBASKET_MINING_MIN_CONFIDENCE"],
            None,
        ),
        sources.entry(
            "mining.transaction_count",
            mining.transaction_count.to_string(),
            &["TRIPBASKET_MINING_TRANSACTION_COUNT"],
            None,
        ),
        sources.entry(
            "mining.noise_probability",
            mining.noise_probability.to_string(),
            &["TRIPBASKET_MINING_NOISE_PROBABILITY"],
            None,
        ),
        sources.entry(
            "mining.seed",
            seed,
            &["TRIPBASKET_MINING_SEED"],
            args.seed.is_some().then_some("--seed"),
        ),
        sources.entry(
            "logging.level",
            config.logging.level.clone(),
            &["TRIPBASKET_LOGGING_LEVEL", "TRIPBASKET_LOG_LEVEL"],
            None,
        ),
        sources.entry(
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            &["TRIPBASKET_LOGGING_FORMAT", "TRIPBASKET_LOG_FORMAT"],
            None,
        ),
    ];

    let message = std::iter::once(
        "effective config (source precedence: flag > env > file > default):".to_string(),
    )
    .chain(entries.iter().map(render_line))
    .collect::<Vec<_>>()
    .join("\n");

    CommandResult::success_with_data("config", message, &entries)
}

struct Sources<'a> {
    doc: Option<&'a Value>,
    path: Option<&'a Path>,
}

impl Sources<'_> {
    fn entry(
        &self,
        key: &str,
        value: String,
        env_keys: &[&str],
        flag: Option<&str>,
    ) -> ConfigEntry {
        let source = match flag {
            Some(flag) => format!("flag ({flag})"),
            None => field_source(key, env_keys, self.doc, self.path),
        };
        ConfigEntry { key: key.to_string(), value, source }
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(entry: &ConfigEntry) -> String {
    format!("- {} = {} (source: {})", entry.key, entry.value, entry.source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[mining]\nmin_support = 0.1\n".parse().unwrap();

        assert!(contains_path(&doc, "mining.min_support"));
        assert!(!contains_path(&doc, "mining.seed"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_path() {
        let doc: Value = "[logging]\nlevel = \"debug\"\n".parse().unwrap();
        let source = field_source(
            "logging.level",
            &["TRIPBASKET_TEST_UNSET_VARIABLE"],
            Some(&doc),
            Some(Path::new("tripbasket.toml")),
        );

        assert_eq!(source, "file (tripbasket.toml)");
    }
}
