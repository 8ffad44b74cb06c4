//! Build settings and named build configurations.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::BuildConfiguration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    String(String),
    Array(Vec<String>),
}

impl SettingValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Array(_) => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

pub type SettingsDictionary = BTreeMap<String, SettingValue>;

/// Overrides for one build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub settings: SettingsDictionary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcconfig: Option<PathBuf>,
}

/// A declared configuration entry. Kept as a list so that duplicate
/// declarations stay visible to the manifest linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub build_configuration: BuildConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base: SettingsDictionary,
    pub configurations: Vec<ConfigurationEntry>,
}

impl Settings {
    /// `Debug (debug)` and `Release (release)` with no overrides.
    pub fn default_configurations() -> Self {
        Self::with_configurations([
            BuildConfiguration::debug("Debug"),
            BuildConfiguration::release("Release"),
        ])
    }

    pub fn with_configurations(configs: impl IntoIterator<Item = BuildConfiguration>) -> Self {
        Self {
            base: SettingsDictionary::new(),
            configurations: configs
                .into_iter()
                .map(|build_configuration| ConfigurationEntry {
                    build_configuration,
                    configuration: None,
                })
                .collect(),
        }
    }

    /// The distinct build configurations, sorted.
    pub fn configuration_set(&self) -> BTreeSet<BuildConfiguration> {
        self.configurations
            .iter()
            .map(|e| e.build_configuration.clone())
            .collect()
    }

    /// Values of `key` in the base settings followed by each configuration.
    pub fn values_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SettingValue> + 'a {
        self.base.get(key).into_iter().chain(
            self.configurations
                .iter()
                .filter_map(move |e| e.configuration.as_ref()?.settings.get(key)),
        )
    }
}
