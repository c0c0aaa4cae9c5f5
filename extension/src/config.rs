// Worker settings passed in from the JS glue

use log::Level;
use serde::Deserialize;
use serde_json::Value;

/// Settings handed to `init_background` by the JS glue.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String, // "trace", "debug", "info", "warn" or "error"

    #[serde(default = "default_log_tab_events")]
    pub log_tab_events: bool,
}

impl BackgroundConfig {
    /// Accepts an object, a JSON string holding an object, or nothing.
    /// Anything unparsable falls back to defaults.
    pub fn from_value(value: Value) -> Self {
        let value = match value {
            Value::String(s) => match serde_json::from_str(&s) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Ignoring unparsable background config: {}", e);
                    return Self::default();
                }
            },
            Value::Null => return Self::default(),
            other => other,
        };

        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid background config: {}", e);
            Self::default()
        })
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_tab_events: default_log_tab_events(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_tab_events() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = BackgroundConfig::from_value(Value::Null);
        assert_eq!(config, BackgroundConfig::default());
        assert_eq!(config.level(), Level::Info);
        assert!(config.log_tab_events);
    }

    #[test]
    fn test_partial_object() {
        let config = BackgroundConfig::from_value(json!({ "logLevel": "DEBUG" }));
        assert_eq!(config.level(), Level::Debug);
        assert!(config.log_tab_events);
    }

    #[test]
    fn test_json_string() {
        let config =
            BackgroundConfig::from_value(json!(r#"{"logTabEvents": false, "logLevel": "warn"}"#));
        assert_eq!(config.level(), Level::Warn);
        assert!(!config.log_tab_events);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        assert_eq!(
            BackgroundConfig::from_value(json!("not json")),
            BackgroundConfig::default()
        );
        assert_eq!(
            BackgroundConfig::from_value(json!({ "logTabEvents": "yes" })),
            BackgroundConfig::default()
        );
        assert_eq!(BackgroundConfig::from_value(json!(5)), BackgroundConfig::default());
    }

    #[test]
    fn test_unknown_level_is_info() {
        let config = BackgroundConfig::from_value(json!({ "logLevel": "loud" }));
        assert_eq!(config.level(), Level::Info);
    }
}
