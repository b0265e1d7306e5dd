//! Error types for lexing and formatting
//!
//! Every failure aborts the current `format()` call as a whole; no partial output is ever
//! returned. Malformed markup inside the text itself (unknown tags, unbalanced closes) is not
//! an error and never reaches this module.

use std::fmt;

use super::token::TokenId;

/// Errors raised while lexing, configuring or running the visitor chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input exceeded both the byte and the space-count limit
    TooLargeInput { bytes: usize, spaces: usize },
    /// A `<wrap=...>` tag carried an unknown or malformed option
    InvalidConfiguration { option: String },
    /// A style was looked up by a name that was never registered
    UnknownStyle(String),
    /// A structural edit referenced a token that is not attached to a container
    TokenNotFound(TokenId),
    /// The last visitor of the chain does not produce output
    MissingFinalVisitor,
    /// No visitor of the requested kind is registered in the chain
    MissingVisitor(&'static str),
    /// A color or option name that the terminal style table does not know
    InvalidStyleValue {
        attribute: &'static str,
        value: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::TooLargeInput { bytes, spaces } => write!(
                f,
                "Input is too large to format ({} bytes, {} spaces); slice it into smaller parts",
                bytes, spaces
            ),
            FormatError::InvalidConfiguration { option } => {
                write!(f, "Invalid configuration option: `{}`", option)
            }
            FormatError::UnknownStyle(name) => write!(f, "Undefined style: {}", name),
            FormatError::TokenNotFound(id) => {
                write!(f, "Token {} is not attached to a container", id)
            }
            FormatError::MissingFinalVisitor => {
                write!(f, "The last visitor of the chain must build the output")
            }
            FormatError::MissingVisitor(kind) => write!(f, "Missing visitor: `{}`", kind),
            FormatError::InvalidStyleValue { attribute, value } => {
                write!(f, "Invalid {} specified: \"{}\"", attribute, value)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Result alias used across the formatting pipeline
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_names_the_option() {
        let error = FormatError::InvalidConfiguration {
            option: "unknown".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid configuration option: `unknown`");
    }

    #[test]
    fn test_too_large_input_reports_counts() {
        let error = FormatError::TooLargeInput {
            bytes: 20000,
            spaces: 6000,
        };
        let message = error.to_string();
        assert!(message.contains("20000 bytes"));
        assert!(message.contains("6000 spaces"));
    }
}
