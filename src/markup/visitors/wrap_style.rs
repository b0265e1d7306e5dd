//! Wrapping parameters
//!
//!     A [`WrapStyle`] is the value carried by `<wrap=...>` tags and by the formatter's base
//!     configuration:
//!
//!         <wrap=40>                  width 40
//!         <wrap=40,cut_words>        cut any word that overflows the line
//!         <wrap=40,cut_words:8>      cut words longer than 8 columns
//!         <wrap=40,cut_urls>         cut URLs too (left whole by default)
//!         <wrap=40,fill_up:.>        pad every wrapped line with dots up to the width
//!         <nowrap>                   no wrapping
//!
//!     The cut limit defaults to the width, so by default only words that cannot fit on any
//!     line get cut. A bare `cut_words` means a limit of 1 and `cut_words:0` disables cutting.

use crate::markup::error::{FormatError, FormatResult};
use crate::markup::token::Tag;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapStyle {
    width: Option<usize>,
    word_cut_limit: Option<usize>,
    cut_urls: bool,
    fill_up: Option<String>,
}

impl WrapStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_word_cut_limit(mut self, limit: usize) -> Self {
        self.word_cut_limit = Some(limit);
        self
    }

    pub fn with_cut_urls(mut self, cut_urls: bool) -> Self {
        self.cut_urls = cut_urls;
        self
    }

    pub fn with_fill_up(mut self, pattern: impl Into<String>) -> Self {
        self.fill_up = Some(pattern.into());
        self
    }

    pub fn set_width(&mut self, width: Option<usize>) {
        self.width = width;
    }

    /// Line width; zero means no wrapping
    pub fn width(&self) -> Option<usize> {
        self.width.filter(|width| *width > 0)
    }

    pub fn word_cut_limit(&self) -> Option<usize> {
        self.word_cut_limit.or_else(|| self.width())
    }

    pub fn has_explicit_cut_limit(&self) -> bool {
        self.word_cut_limit.is_some()
    }

    pub fn cut_urls(&self) -> bool {
        self.cut_urls
    }

    /// Non-empty fill pattern, if filling is on
    pub fn fill_up(&self) -> Option<&str> {
        self.fill_up.as_deref().filter(|pattern| !pattern.is_empty())
    }

    /// Build the style of a `wrap` or `nowrap` sub-tag
    pub fn from_tag(tag: &Tag) -> FormatResult<Self> {
        let mut style = WrapStyle::new();
        if tag.name.eq_ignore_ascii_case("nowrap") {
            return Ok(style);
        }
        for raw in &tag.values {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.bytes().all(|byte| byte.is_ascii_digit()) {
                style.width = Some(parse_number(entry)?);
                continue;
            }
            let (key, value) = match entry.split_once(':') {
                Some((key, value)) => (key.trim(), Some(value)),
                None => (entry, None),
            };
            match (key, value) {
                ("width", Some(value)) => style.width = Some(parse_number(value.trim())?),
                ("width", None) => style.width = None,
                ("cut_words", Some(value)) => {
                    style.word_cut_limit = Some(parse_number(value.trim())?)
                }
                ("cut_words", None) => style.word_cut_limit = Some(1),
                ("cut_urls", Some(value)) => style.cut_urls = parse_flag(value.trim())?,
                ("cut_urls", None) => style.cut_urls = true,
                ("fill_up", Some(value)) => style.fill_up = Some(value.to_string()),
                ("fill_up", None) => style.fill_up = Some(" ".to_string()),
                _ => return Err(invalid(raw)),
            }
        }
        Ok(style)
    }
}

impl From<usize> for WrapStyle {
    fn from(width: usize) -> Self {
        WrapStyle::new().with_width(width)
    }
}

fn parse_number(value: &str) -> FormatResult<usize> {
    value.parse().map_err(|_| invalid(value))
}

fn parse_flag(value: &str) -> FormatResult<bool> {
    match value {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(value)),
    }
}

fn invalid(option: &str) -> FormatError {
    FormatError::InvalidConfiguration {
        option: option.to_string(),
    }
}
