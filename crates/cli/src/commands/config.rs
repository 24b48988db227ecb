use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use corpay_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct FieldSpec {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        FieldSpec {
            key_path: "storage.url",
            value: config.storage.url.clone(),
            env_keys: &["CORPAY_STORAGE_URL"],
        },
        FieldSpec {
            key_path: "storage.max_connections",
            value: config.storage.max_connections.to_string(),
            env_keys: &["CORPAY_STORAGE_MAX_CONNECTIONS"],
        },
        FieldSpec {
            key_path: "storage.timeout_secs",
            value: config.storage.timeout_secs.to_string(),
            env_keys: &["CORPAY_STORAGE_TIMEOUT_SECS"],
        },
        FieldSpec {
            key_path: "console.org",
            value: config.console.org.clone(),
            env_keys: &["CORPAY_CONSOLE_ORG"],
        },
        FieldSpec {
            key_path: "console.actor",
            value: config.console.actor.clone(),
            env_keys: &["CORPAY_CONSOLE_ACTOR"],
        },
        FieldSpec {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CORPAY_LOGGING_LEVEL", "CORPAY_LOG_LEVEL"],
        },
        FieldSpec {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["CORPAY_LOGGING_FORMAT", "CORPAY_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
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
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source};

    fn doc() -> Value {
        "[storage]\nurl = \"sqlite://file.db\"\n[console]\norg = \"Acacia Holdings\"\n"
            .parse::<Value>()
            .expect("toml")
    }

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = doc();

        assert!(contains_path(&doc, "storage.url"));
        assert!(contains_path(&doc, "console.org"));
        assert!(!contains_path(&doc, "console.actor"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_config_path() {
        let doc = doc();
        let source = field_source(
            "console.org",
            &["CORPAY_TEST_NEVER_SET_ORG"],
            Some(&doc),
            Some(Path::new("corpay.toml")),
        );

        assert_eq!(source, "file (corpay.toml)");
    }

    #[test]
    fn missing_everywhere_is_default() {
        let source = field_source("logging.level", &["CORPAY_TEST_NEVER_SET_LEVEL"], None, None);

        assert_eq!(source, "default");
    }
}
