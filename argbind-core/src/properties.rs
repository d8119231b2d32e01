//! Per-target parsing properties.
//!
//! Properties can be declared in code through [`Args::properties`](crate::Args::properties)
//! or loaded from a TOML/JSON file and applied with
//! [`ArgsParser::with_properties`](crate::ArgsParser::with_properties).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PropertiesError;

/// Identifier prefix, help identifiers and help behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgsProperties {
    /// Identifiers that trigger the help text, without prefix
    pub help_ids: Vec<String>,

    /// Whether to terminate after printing the help or continue
    pub terminate_after_help: bool,

    /// Prefix expected in front of every argument identifier
    pub id_prefix: String,
}

impl Default for ArgsProperties {
    fn default() -> Self {
        Self {
            help_ids: vec!["h".to_string(), "-help".to_string()],
            terminate_after_help: true,
            id_prefix: "-".to_string(),
        }
    }
}

impl ArgsProperties {
    pub fn with_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    pub fn with_help_ids<I, S>(mut self, help_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_ids = help_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn continue_after_help(mut self) -> Self {
        self.terminate_after_help = false;
        self
    }

    /// Whether `name` (prefix already stripped) asks for help.
    pub fn is_help_id(&self, name: &str) -> bool {
        self.help_ids.iter().any(|id| id == name)
    }

    /// Whether tokens must carry a prefix at all.
    pub fn uses_prefix(&self) -> bool {
        !self.id_prefix.trim().is_empty()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PropertiesError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, PropertiesError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load properties from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}
