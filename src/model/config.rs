use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true", deserialize_with = "key_hints_or_default")]
    pub show_key_hints: bool,
    /// Theme overrides, e.g. `background = "#111614"`
    #[serde(default, deserialize_with = "string_entries")]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default, deserialize_with = "alarm_kind_or_default")]
    pub kind: AlarmKind,
}

/// How the timer announces that it ran down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmKind {
    /// Synthesized chime; the terminal bell when built without audio output
    #[default]
    Tone,
    /// Terminal bell
    Bell,
    Off,
}

fn default_true() -> bool {
    true
}

// A value of the wrong type keeps the default rather than rejecting the file.

fn or_else<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = toml::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|_| fallback()))
}

fn key_hints_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    or_else(deserializer, default_true)
}

fn alarm_kind_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AlarmKind, D::Error> {
    or_else(deserializer, AlarmKind::default)
}

/// Keep only the string-valued entries of a table
fn string_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error> {
    let toml::Value::Table(table) = toml::Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
        assert_eq!(config.alarm.kind, AlarmKind::Tone);
    }

    #[test]
    fn parses_all_sections() {
        let config: AppConfig = toml::from_str(
            r##"
[ui]
show_key_hints = false
colors = { background = "#000000" }

[alarm]
kind = "bell"
"##,
        )
        .unwrap();
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("background").unwrap(), "#000000");
        assert_eq!(config.alarm.kind, AlarmKind::Bell);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
[ui]
show_key_hints = "yes"
colors = { background = "#000000", text = 7 }
theme = "dark"

[alarm]
kind = "siren"
"##,
        )
        .unwrap();
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.colors.len(), 1);
        assert_eq!(config.ui.colors.get("background").unwrap(), "#000000");
        assert_eq!(config.alarm.kind, AlarmKind::Tone);

        let config: AppConfig = toml::from_str("[ui]\ncolors = \"red\"\n").unwrap();
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn malformed_toml_is_still_an_error() {
        assert!(toml::from_str::<AppConfig>("[alarm\nkind = ").is_err());
    }
}
