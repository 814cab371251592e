// Configuration module
// Internal representation of user configuration

use std::collections::HashMap;

use crate::core::history::{DEFAULT_MAX_DEPTH, HistoryConfig};

/// Maximum undo groups kept (0 = unlimited)
pub const HISTORY_MAX_DEPTH: &str = "history.max_depth";
/// Font family used by the default palette
pub const FONT_FAMILY: &str = "font.family";
pub const FONT_SIZE_SMALL: &str = "font.size.small";
pub const FONT_SIZE_NORMAL: &str = "font.size.normal";
pub const FONT_SIZE_LARGE: &str = "font.size.large";
/// Font family for the `code` tag
pub const CODE_FONT_FAMILY: &str = "font.code_family";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Config {
    /// Set a configuration value
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) {
        self.settings.insert(key.to_string(), value.into());
    }

    /// Get a setting value
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    /// Get boolean setting
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Get integer setting
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    /// Get string setting
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Undo limits. Negative depths are treated as unlimited.
    pub fn history_config(&self) -> HistoryConfig {
        match self.get_int(HISTORY_MAX_DEPTH) {
            Some(depth) => HistoryConfig::new(usize::try_from(depth).unwrap_or(0)),
            None => HistoryConfig::new(DEFAULT_MAX_DEPTH),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}
