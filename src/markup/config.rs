//! Configuration loader
//!
//! `defaults/tagfmt.default.toml` is embedded into the crate so that the documented defaults
//! and the runtime behavior stay in sync. Callers layer user files and single-key overrides
//! on top of it via [`Loader`] before deserializing into [`TagfmtConfig`].

use std::collections::BTreeMap;
use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;

use super::error::FormatResult;
use super::lexing::InputLimits;
use super::style::TerminalStyle;
use super::visitors::wrap_style::WrapStyle;

const DEFAULT_TOML: &str = include_str!("../../defaults/tagfmt.default.toml");

/// Top-level configuration of a formatter
#[derive(Debug, Clone, Deserialize)]
pub struct TagfmtConfig {
    pub formatter: FormatterConfig,
    pub limits: InputLimits,
    pub wrap: WrapConfig,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatterConfig {
    pub decorated: bool,
}

/// Base wrap style; a zero width and an empty fill string mean "off"
#[derive(Debug, Clone, Deserialize)]
pub struct WrapConfig {
    pub width: usize,
    #[serde(default)]
    pub cut_words: Option<usize>,
    pub cut_urls: bool,
    pub fill_up: String,
}

impl From<&WrapConfig> for WrapStyle {
    fn from(config: &WrapConfig) -> Self {
        let mut style = WrapStyle::new()
            .with_width(config.width)
            .with_cut_urls(config.cut_urls)
            .with_fill_up(config.fill_up.clone());
        if let Some(limit) = config.cut_words {
            style = style.with_word_cut_limit(limit);
        }
        style
    }
}

/// A named style as written in a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    pub fg: Option<String>,
    pub bg: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl StyleConfig {
    pub fn to_style(&self) -> FormatResult<TerminalStyle> {
        TerminalStyle::parse(self.fg.as_deref(), self.bg.as_deref(), &self.options)
    }
}

/// Builds a [`TagfmtConfig`] from the embedded defaults, then user files, then overrides.
///
/// Later layers win key by key, so a file holding only `[wrap] width = 60` keeps every other
/// default. Overrides use dotted keys (`wrap.width`, `styles.alert.fg`).
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file; a missing file makes [`build`](Loader::build) fail
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let file = File::from(path.as_ref()).format(FileFormat::Toml);
        self.builder = self.builder.add_source(file.required(true));
        self
    }

    /// Set one dotted key, above every file
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<TagfmtConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone
pub fn load_defaults() -> Result<TagfmtConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::style::Style;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.formatter.decorated);
        assert_eq!(config.limits, InputLimits::default());
        assert_eq!(config.wrap.width, 0);
        assert_eq!(config.wrap.cut_words, None);
        assert!(config.styles.is_empty());
        assert_eq!(WrapStyle::from(&config.wrap).width(), None);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("formatter.decorated", false)
            .unwrap()
            .set_override("wrap.width", 40i64)
            .unwrap()
            .set_override("wrap.fill_up", ".")
            .unwrap()
            .build()
            .expect("config to build");
        assert!(!config.formatter.decorated);
        let style = WrapStyle::from(&config.wrap);
        assert_eq!(style.width(), Some(40));
        assert_eq!(style.fill_up(), Some("."));
    }

    #[test]
    fn reads_named_styles() {
        let config = Loader::new()
            .set_override("styles.alert.fg", "magenta")
            .unwrap()
            .set_override("styles.alert.bg", "white")
            .unwrap()
            .build()
            .expect("config to build");
        let alert = config.styles["alert"].to_style().unwrap();
        assert_eq!(alert.start(), "\x1b[35;47m");
    }

    #[test]
    fn missing_file_fails_the_build() {
        let result = Loader::new()
            .with_file("/nonexistent/tagfmt/config.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_style_values() {
        let style = StyleConfig {
            fg: Some("nocolor".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.to_style().is_err());
    }
}
