//! Configuration Sources - Ordered Lookup Providers
//!
//! Sources only answer "do you have a value for this slot?".
//! Precedence lives in the resolver, validity lives in the presenter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::slots::Slot;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read image config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image config must be a JSON object keyed by slot name")]
    NotAnObject,

    #[error("Image config value for '{0}' must be a string")]
    NonStringValue(String),

    #[error("Image reference must not be empty")]
    EmptyReference,
}

/// A resolved asset locator (URL or path). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference(String);

impl Reference {
    /// Returns `None` for an empty locator
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The slot's built-in reference
    pub fn default_for(slot: Slot) -> Self {
        Self(slot.default_reference().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Reference {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfigError::EmptyReference)
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a reference came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Global runtime configuration object
    Global,
    /// `VITE_FODMAPP_<SLOT>`
    Primary,
    /// `REACT_APP_FODMAPP_<SLOT>`
    AltPrefixA,
    /// `NEXT_PUBLIC_FODMAPP_<SLOT>`
    AltPrefixB,
    /// Slot's built-in reference
    Default,
}

/// Configuration source trait - one provider in the precedence chain
pub trait ConfigSource {
    fn kind(&self) -> SourceKind;

    /// Raw value for the slot, if any. Empty values are treated as absent by the resolver.
    fn lookup(&self, slot: Slot) -> Option<String>;
}

// --- Global object ---

/// The single global image object, e.g. `{"front": "/front.png"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalImages {
    images: BTreeMap<Slot, String>,
}

impl GlobalImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        self.images.insert(slot, value.into());
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.images.get(&slot).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Parse the global object from JSON.
    ///
    /// Unknown keys are ignored, `null` values count as absent.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

        let mut images = Self::new();
        for (key, value) in object {
            let slot = match Slot::from_key(key) {
                Some(slot) => slot,
                None => {
                    warn!(key = %key, "ignoring unknown image slot in config");
                    continue;
                }
            };
            match value {
                Value::String(s) => images.set(slot, s.clone()),
                Value::Null => {}
                _ => return Err(ConfigError::NonStringValue(key.clone())),
            }
        }
        Ok(images)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl ConfigSource for GlobalImages {
    fn kind(&self) -> SourceKind {
        SourceKind::Global
    }

    fn lookup(&self, slot: Slot) -> Option<String> {
        self.get(slot).map(str::to_string)
    }
}

// --- Environment ---

/// Read-only snapshot of environment-style entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment. The only ambient read in the crate.
    pub fn from_process() -> Self {
        Self { vars: std::env::vars().collect() }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Bundler naming conventions, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvConvention {
    /// Vite
    Primary,
    /// Create React App
    AltPrefixA,
    /// Next.js
    AltPrefixB,
}

impl EnvConvention {
    pub const ALL: [EnvConvention; 3] = [
        EnvConvention::Primary,
        EnvConvention::AltPrefixA,
        EnvConvention::AltPrefixB,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            EnvConvention::Primary => "VITE_",
            EnvConvention::AltPrefixA => "REACT_APP_",
            EnvConvention::AltPrefixB => "NEXT_PUBLIC_",
        }
    }

    pub fn key_for(self, slot: Slot) -> String {
        format!("{}{}", self.prefix(), slot.env_stem())
    }

    pub fn source_kind(self) -> SourceKind {
        match self {
            EnvConvention::Primary => SourceKind::Primary,
            EnvConvention::AltPrefixA => SourceKind::AltPrefixA,
            EnvConvention::AltPrefixB => SourceKind::AltPrefixB,
        }
    }
}

/// One naming convention over a shared environment snapshot
#[derive(Debug, Clone)]
pub struct EnvSource {
    convention: EnvConvention,
    env: EnvSnapshot,
}

impl EnvSource {
    pub fn new(convention: EnvConvention, env: EnvSnapshot) -> Self {
        Self { convention, env }
    }

    pub fn convention(&self) -> EnvConvention {
        self.convention
    }
}

impl ConfigSource for EnvSource {
    fn kind(&self) -> SourceKind {
        self.convention.source_kind()
    }

    fn lookup(&self, slot: Slot) -> Option<String> {
        self.env.get(&self.convention.key_for(slot)).map(str::to_string)
    }
}
