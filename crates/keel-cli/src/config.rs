//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KEEL_`-prefixed environment variables, `__` between sections
//!    (`KEEL_LINT__XCODE_VERSION=16.2`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Lint pass settings.
    pub lint: LintConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Fixed toolchain version; `xcodebuild` is queried when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcode_version: Option<String>,
    pub manifests: bool,
    pub fail_on_warnings: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => file_source(path).required(true),
            None => file_source(&Self::config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("KEEL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.keel.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "keel", "keel")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".keel.toml"))
    }
}

fn file_source(path: &Path) -> File<config::FileSourceFile, config::FileFormat> {
    File::from(path).format(config::FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_query_the_toolchain() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.lint.xcode_version, None);
        assert!(!cfg.lint.manifests);
        assert_eq!(cfg.output.format, OutputFormat::Auto);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[lint]\nxcode_version = \"15.4\"\nfail_on_warnings = true\n\n[output]\nformat = \"json\""
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.lint.xcode_version.as_deref(), Some("15.4"));
        assert!(cfg.lint.fail_on_warnings);
        assert!(!cfg.lint.manifests);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn explicit_file_must_exist() {
        let missing = PathBuf::from("/definitely/not/here/keel.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
