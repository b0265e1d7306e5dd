//! Markup formatting engine
//!
//!     The engine runs in three stages:
//!
//!         text --lexing--> TokenTree --visitor passes--> output string
//!
//!     Lexing turns the raw string into a flat sequence of tokens under a single root: words,
//!     whitespace separators, full tags (`<a;b=1>`, each owning its parsed sub-tags) and one
//!     closing end-of-stream marker. See [lexing].
//!
//!     The token tree is an arena of nodes linked to their siblings and parent. Visitors walk
//!     it in order and rewrite it in place (insert decorations, split words, add line breaks)
//!     while the walk is in progress. Each container keeps its own traversal cursor, so edits
//!     around the current node never invalidate the walk. See [token::tree].
//!
//!     Visitors run in priority order (highest first): wrapping, styles, hyperlinks and finally
//!     the print pass that materializes the string. Decorating passes are skipped for
//!     undecorated output. See [visitors] and [formatter].

pub mod config;
pub mod error;
pub mod formatter;
pub mod lexing;
pub mod style;
pub mod terminal;
pub mod testing;
pub mod token;
pub mod unicode;
pub mod visitors;
pub mod word_wrapper;

pub use error::{FormatError, FormatResult};
pub use formatter::{escape, escape_trailing_backslash, remove_decoration, OutputFormatter};
pub use lexing::{tokenize, InputLimits, Lexer};
pub use style::{Color, SharedStyle, Style, StyleOption, TerminalStyle};
pub use token::{Token, TokenId, TokenTree};
pub use visitors::print::PrintMode;
pub use visitors::wrap_style::WrapStyle;
pub use word_wrapper::{wrap, WordWrapper};
