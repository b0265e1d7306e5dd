//! Style-aware word wrapping without decoration
//!
//!     Runs only the wrap pass and prints the tree back as markup: tags are kept as written and
//!     literal `<...>` words are escaped again, so the result can still be fed to an
//!     [`OutputFormatter`](super::formatter::OutputFormatter).

use super::error::FormatResult;
use super::lexing::{InputLimits, Lexer};
use super::visitors::print::{PrintMode, PrintVisitor};
use super::visitors::run;
use super::visitors::wrap::WrapVisitor;
use super::visitors::wrap_style::WrapStyle;

#[derive(Debug, Clone)]
pub struct WordWrapper {
    lexer: Lexer,
    wrapper: WrapVisitor,
    printer: PrintVisitor,
}

impl Default for WordWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl WordWrapper {
    pub fn new() -> Self {
        Self::with_limits(InputLimits::default())
    }

    pub fn with_limits(limits: InputLimits) -> Self {
        WordWrapper {
            lexer: Lexer::with_limits(limits),
            wrapper: WrapVisitor::new(),
            printer: PrintVisitor::new(PrintMode::RawEscaped),
        }
    }

    /// Wrap `text` with `style` as the base style; `<wrap>` tags inside still apply
    pub fn wrap(&mut self, text: &str, style: impl Into<WrapStyle>) -> FormatResult<String> {
        let mut tree = self.lexer.tokenize(text)?;
        self.wrapper.set_base_style(style.into());
        run(&mut self.wrapper, &mut tree)?;
        run(&mut self.printer, &mut tree)?;
        Ok(self.printer.output().to_string())
    }
}

/// Wrap `text` with a fresh [`WordWrapper`]
pub fn wrap(text: &str, style: impl Into<WrapStyle>) -> FormatResult<String> {
    WordWrapper::new().wrap(text, style)
}
