//! Terminal styles
//!
//! [`Style`] is the capability the style pass needs: a start sequence and a close sequence.
//! [`TerminalStyle`] implements it with ANSI SGR codes for a foreground color, a background
//! color and a list of options. Closing uses the "unset" code of each attribute, so closing
//! a style resets exactly what it set.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{FormatError, FormatResult};

/// Anything that can be opened and closed around a span of output
pub trait Style: fmt::Debug {
    fn start(&self) -> String;
    fn close(&self) -> String;
}

/// Handle to a registered style, shared between the registry and the open-style stack
pub type SharedStyle = Rc<dyn Style>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Default,
}

impl Color {
    fn offset(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::Default => 9,
        }
    }

    pub fn foreground_code(self) -> u8 {
        30 + self.offset()
    }

    pub fn background_code(self) -> u8 {
        40 + self.offset()
    }
}

impl FromStr for Color {
    type Err = FormatError;

    fn from_str(name: &str) -> FormatResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),
            "default" => Ok(Color::Default),
            _ => Err(FormatError::InvalidStyleValue {
                attribute: "color",
                value: name.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleOption {
    Bold,
    Underscore,
    Blink,
    Reverse,
    Conceal,
}

impl StyleOption {
    pub fn set_code(self) -> u8 {
        match self {
            StyleOption::Bold => 1,
            StyleOption::Underscore => 4,
            StyleOption::Blink => 5,
            StyleOption::Reverse => 7,
            StyleOption::Conceal => 8,
        }
    }

    pub fn unset_code(self) -> u8 {
        match self {
            StyleOption::Bold => 22,
            StyleOption::Underscore => 24,
            StyleOption::Blink => 25,
            StyleOption::Reverse => 27,
            StyleOption::Conceal => 28,
        }
    }
}

impl FromStr for StyleOption {
    type Err = FormatError;

    fn from_str(name: &str) -> FormatResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Ok(StyleOption::Bold),
            "underscore" => Ok(StyleOption::Underscore),
            "blink" => Ok(StyleOption::Blink),
            "reverse" => Ok(StyleOption::Reverse),
            "conceal" => Ok(StyleOption::Conceal),
            _ => Err(FormatError::InvalidStyleValue {
                attribute: "option",
                value: name.to_string(),
            }),
        }
    }
}

/// ANSI SGR style: optional colors plus options in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStyle {
    foreground: Option<Color>,
    background: Option<Color>,
    options: Vec<StyleOption>,
}

impl TerminalStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a style from textual attributes, failing on unknown names
    pub fn parse(
        foreground: Option<&str>,
        background: Option<&str>,
        options: &[String],
    ) -> FormatResult<Self> {
        let mut style = TerminalStyle::new();
        style.foreground = foreground.map(str::parse::<Color>).transpose()?;
        style.background = background.map(str::parse::<Color>).transpose()?;
        for option in options {
            style.set_option(option.parse::<StyleOption>()?);
        }
        Ok(style)
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_option(mut self, option: StyleOption) -> Self {
        self.set_option(option);
        self
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn options(&self) -> &[StyleOption] {
        &self.options
    }

    pub fn set_foreground(&mut self, color: Option<Color>) {
        self.foreground = color;
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }

    pub fn set_option(&mut self, option: StyleOption) {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
    }

    pub fn unset_option(&mut self, option: StyleOption) {
        self.options.retain(|current| *current != option);
    }

    /// Replace all options at once
    pub fn set_options(&mut self, options: impl IntoIterator<Item = StyleOption>) {
        self.options.clear();
        for option in options {
            self.set_option(option);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.options.is_empty()
    }

    fn sequence(codes: Vec<u8>) -> String {
        if codes.is_empty() {
            return String::new();
        }
        let codes: Vec<String> = codes.iter().map(u8::to_string).collect();
        format!("\x1b[{}m", codes.join(";"))
    }
}

impl Style for TerminalStyle {
    fn start(&self) -> String {
        let mut codes = Vec::new();
        if let Some(color) = self.foreground {
            codes.push(color.foreground_code());
        }
        if let Some(color) = self.background {
            codes.push(color.background_code());
        }
        codes.extend(self.options.iter().map(|option| option.set_code()));
        Self::sequence(codes)
    }

    fn close(&self) -> String {
        let mut codes = Vec::new();
        if self.foreground.is_some() {
            codes.push(39);
        }
        if self.background.is_some() {
            codes.push(49);
        }
        codes.extend(self.options.iter().map(|option| option.unset_code()));
        Self::sequence(codes)
    }
}
