use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumString};

/// Shared by every computer that has no environment of its own.
pub static EMPTY_ENV_VARS: EnvVars = EnvVars::new();

pub type MonitorData = HashMap<String, serde_json::Value>;
pub type ThreadDump = BTreeMap<String, String>;
pub type SystemProperties = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvVars(BTreeMap<String, String>);

impl EnvVars {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize)]
pub enum Charset {
    #[strum(serialize = "UTF-8")]
    #[serde(rename = "UTF-8")]
    Utf8,
}
