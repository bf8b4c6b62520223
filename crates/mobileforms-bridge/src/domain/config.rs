//! Bridge configuration.
//!
//! [`BridgeConfig`] holds everything that ties the bridge to one deployment of
//! the peer-side shell: where the shell document lives, where named form
//! definitions are found, and which private scheme/host pair the shell uses
//! for event navigations.
//!
//! Every field has a serde default, so an empty TOML file (or no file at all)
//! yields the stock MobileForms layout:
//!
//! ```toml
//! shell_url = "file:///android_asset/mobileforms/index.mobileforms.html"
//! forms_dir = "forms"
//! form_extension = "json"
//! event_scheme = "mobileforms"
//! event_host = "event"
//! ```

use std::path::{Path, PathBuf};

use mobileforms_core::domain::navigation::{DEFAULT_EVENT_HOST, DEFAULT_EVENT_SCHEME};
use mobileforms_core::EventClassifier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Deployment settings for one bridge instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// URL of the shell document the peer loads on `load()`.
    #[serde(default = "default_shell_url")]
    pub shell_url: String,

    /// Asset directory holding named form definitions.
    #[serde(default = "default_forms_dir")]
    pub forms_dir: String,

    /// File extension of named form definitions, without the dot.
    #[serde(default = "default_form_extension")]
    pub form_extension: String,

    /// Scheme of event navigations emitted by the shell.
    #[serde(default = "default_event_scheme")]
    pub event_scheme: String,

    /// Host of event navigations emitted by the shell.
    #[serde(default = "default_event_host")]
    pub event_host: String,
}

fn default_shell_url() -> String {
    "file:///android_asset/mobileforms/index.mobileforms.html".to_string()
}
fn default_forms_dir() -> String {
    "forms".to_string()
}
fn default_form_extension() -> String {
    "json".to_string()
}
fn default_event_scheme() -> String {
    DEFAULT_EVENT_SCHEME.to_string()
}
fn default_event_host() -> String {
    DEFAULT_EVENT_HOST.to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            shell_url: default_shell_url(),
            forms_dir: default_forms_dir(),
            form_extension: default_form_extension(),
            event_scheme: default_event_scheme(),
            event_host: default_event_host(),
        }
    }
}

impl BridgeConfig {
    /// Parses a config from TOML text.  Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Asset identifier of the named form definition `name`.
    pub fn form_asset_path(&self, name: &str) -> String {
        format!("{}/{}.{}", self.forms_dir, name, self.form_extension)
    }

    /// Navigation classifier bound to this config's scheme/host pair.
    pub fn classifier(&self) -> EventClassifier {
        EventClassifier::new(self.event_scheme.clone(), self.event_host.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mobileforms_core::NavigationDecision;

    use super::*;

    #[test]
    fn test_default_config_matches_stock_layout() {
        let config = BridgeConfig::default();

        assert_eq!(
            config.shell_url,
            "file:///android_asset/mobileforms/index.mobileforms.html"
        );
        assert_eq!(config.forms_dir, "forms");
        assert_eq!(config.form_extension, "json");
        assert_eq!(config.event_scheme, "mobileforms");
        assert_eq!(config.event_host, "event");
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        // Arrange
        let text = r#"
            forms_dir = "schemas"
            event_host = "ev"
        "#;

        // Act
        let config = BridgeConfig::from_toml_str(text).unwrap();

        // Assert
        assert_eq!(config.forms_dir, "schemas");
        assert_eq!(config.event_host, "ev");
        assert_eq!(config.form_extension, "json");
        assert_eq!(config.event_scheme, "mobileforms");
    }

    #[test]
    fn test_mistyped_field_is_a_parse_error() {
        let result = BridgeConfig::from_toml_str("forms_dir = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_form_asset_path_joins_dir_name_and_extension() {
        let config = BridgeConfig::default();
        assert_eq!(config.form_asset_path("contact"), "forms/contact.json");
    }

    #[test]
    fn test_classifier_uses_configured_scheme_and_host() {
        // Arrange
        let config = BridgeConfig {
            event_scheme: "acme".to_string(),
            event_host: "forms".to_string(),
            ..BridgeConfig::default()
        };

        // Act
        let classifier = config.classifier();

        // Assert
        assert!(matches!(
            classifier.classify("acme://forms?type=change"),
            NavigationDecision::Event(_)
        ));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "form_extension = \"form\"").unwrap();

        // Act
        let config = BridgeConfig::load(file.path()).unwrap();

        // Assert
        assert_eq!(config.form_extension, "form");
    }

    #[test]
    fn test_load_missing_file_is_io_error_naming_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = BridgeConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
