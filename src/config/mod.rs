// src/config/mod.rs - Delimiter configuration

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Configuration errors surfaced while validating a delimiter set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("delimiter character {0:?} is assigned to more than one role")]
    DuplicateDelimiter(char),
}

/// The six structural characters the template engine recognizes.
///
/// Loaded once at startup from an external configuration file and passed
/// explicitly to every component that needs it; there is no global lookup.
/// All six characters must be distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimiterSet {
    /// Opens a choice block: `<a|b|c>`.
    pub choice_open: char,
    /// Closes a choice block.
    pub choice_close: char,
    /// Opens an optional block: `{maybe}`.
    pub optional_open: char,
    /// Closes an optional block.
    pub optional_close: char,
    /// Escapes the following delimiter; doubled, it is a literal escape.
    pub escape: char,
    /// Separates alternatives inside a choice block.
    pub splitter: char,
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self {
            choice_open: '<',
            choice_close: '>',
            optional_open: '{',
            optional_close: '}',
            escape: '\\',
            splitter: '|',
        }
    }
}

impl DelimiterSet {
    /// Check that every role is assigned a distinct character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for ch in [
            self.choice_open,
            self.choice_close,
            self.optional_open,
            self.optional_close,
            self.escape,
            self.splitter,
        ] {
            if !seen.insert(ch) {
                return Err(ConfigError::DuplicateDelimiter(ch));
            }
        }
        Ok(())
    }

    /// Load a delimiter set from a YAML file and validate it.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read delimiter config: {}", path.display()))?;

        let delimiters: DelimiterSet = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse delimiter config: {}", path.display()))?;

        delimiters
            .validate()
            .with_context(|| format!("Invalid delimiter config: {}", path.display()))?;

        debug!("Loaded delimiter set: {:?}", delimiters);
        info!("Delimiter configuration loaded from {}", path.display());
        Ok(delimiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_set_is_valid() {
        assert!(DelimiterSet::default().validate().is_ok());
    }

    #[test]
    fn duplicate_characters_are_rejected() {
        let delimiters = DelimiterSet {
            choice_open: '<',
            choice_close: '<',
            ..DelimiterSet::default()
        };
        assert!(matches!(
            delimiters.validate(),
            Err(ConfigError::DuplicateDelimiter('<'))
        ));
    }

    #[test]
    fn loads_partial_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "choice_open: '('\nchoice_close: ')'").unwrap();

        let delimiters = DelimiterSet::from_yaml_file(file.path()).unwrap();
        assert_eq!(delimiters.choice_open, '(');
        assert_eq!(delimiters.choice_close, ')');
        assert_eq!(delimiters.escape, '\\');
    }

    #[test]
    fn load_fails_on_duplicate_roles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "choice_open: '{{'").unwrap();

        assert!(DelimiterSet::from_yaml_file(file.path()).is_err());
    }
}
