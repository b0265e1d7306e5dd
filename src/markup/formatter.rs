//! Output formatter
//!
//!     [`OutputFormatter`] owns a lexer and a chain of passes. A call to
//!     [`format`](OutputFormatter::format) lexes the message into a fresh tree, runs every pass
//!     over it in priority order and returns the output of the last pass.
//!
//!     The default chain:
//!
//!         priority   pass     decorator
//!          999       wrap     no
//!            0       style    yes
//!            0       href     yes
//!         -999       print    no
//!
//!     Decorating passes are skipped when the formatter is not decorated, so undecorated output
//!     is the plain text, still wrapped.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::config::TagfmtConfig;
use super::error::{FormatError, FormatResult};
use super::lexing::{InputLimits, Lexer};
use super::style::{SharedStyle, Style};
use super::visitors::chain::VisitorChain;
use super::visitors::href::HrefVisitor;
use super::visitors::print::{PrintMode, PrintVisitor};
use super::visitors::style::StyleVisitor;
use super::visitors::wrap::WrapVisitor;
use super::visitors::wrap_style::WrapStyle;
use super::visitors::{FormatterVisitor, VisitContext};

pub const WRAP_PRIORITY: i32 = 999;
pub const STYLE_PRIORITY: i32 = 0;
pub const HREF_PRIORITY: i32 = 0;
pub const PRINT_PRIORITY: i32 = -999;

static UNESCAPED_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\\]?)<").expect("escape pattern is valid"));

static DECORATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)<[a-z][^<>]*>|</(?:[a-z][^<>]*)?>",
        r"|\x1b\[[^m]*m",
        r"|\x1b\]8;;[^\x1b]*\x1b\\",
    ))
    .expect("decoration pattern is valid")
});

#[derive(Debug)]
pub struct OutputFormatter {
    decorated: bool,
    lexer: Lexer,
    chain: VisitorChain,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter {
    /// Formatter with the default chain and the built-in styles
    pub fn new(decorated: bool) -> Self {
        Self::with_styles(decorated, Vec::new())
    }

    /// Formatter whose style registry also holds `styles` (overriding built-ins of the same name)
    pub fn with_styles(
        decorated: bool,
        styles: impl IntoIterator<Item = (String, SharedStyle)>,
    ) -> Self {
        let mut chain = VisitorChain::new();
        chain.insert(Box::new(WrapVisitor::new()), WRAP_PRIORITY);
        chain.insert(Box::new(StyleVisitor::with_styles(styles)), STYLE_PRIORITY);
        chain.insert(Box::new(HrefVisitor::new()), HREF_PRIORITY);
        chain.insert(
            Box::new(PrintVisitor::new(PrintMode::Normal)),
            PRINT_PRIORITY,
        );
        OutputFormatter {
            decorated,
            lexer: Lexer::new(),
            chain,
        }
    }

    pub fn from_config(config: &TagfmtConfig) -> FormatResult<Self> {
        let styles = config
            .styles
            .iter()
            .map(|(name, style)| {
                style
                    .to_style()
                    .map(|style| (name.clone(), Rc::new(style) as SharedStyle))
            })
            .collect::<FormatResult<Vec<_>>>()?;
        let mut formatter = Self::with_styles(config.formatter.decorated, styles);
        formatter.lexer = Lexer::with_limits(config.limits);
        formatter
            .visitor_mut::<WrapVisitor>()?
            .set_base_style(WrapStyle::from(&config.wrap));
        Ok(formatter)
    }

    pub fn set_decorated(&mut self, decorated: bool) {
        self.decorated = decorated;
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub fn limits(&self) -> InputLimits {
        self.lexer.limits()
    }

    pub fn set_limits(&mut self, limits: InputLimits) {
        self.lexer = Lexer::with_limits(limits);
    }

    /// Register an extra pass; the lowest priority pass must produce the output
    pub fn add_visitor(&mut self, visitor: Box<dyn FormatterVisitor>, priority: i32) {
        debug!(visitor = visitor.name(), priority, "adding visitor");
        self.chain.insert(visitor, priority);
    }

    pub fn visitor<T: FormatterVisitor>(&self) -> FormatResult<&T> {
        self.chain
            .find::<T>()
            .ok_or(FormatError::MissingVisitor(std::any::type_name::<T>()))
    }

    pub fn visitor_mut<T: FormatterVisitor>(&mut self) -> FormatResult<&mut T> {
        self.chain
            .find_mut::<T>()
            .ok_or(FormatError::MissingVisitor(std::any::type_name::<T>()))
    }

    pub fn set_style(&mut self, name: &str, style: impl Style + 'static) -> FormatResult<()> {
        self.visitor_mut::<StyleVisitor>()?.set_style(name, style);
        Ok(())
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.visitor::<StyleVisitor>()
            .map(|visitor| visitor.has_style(name))
            .unwrap_or(false)
    }

    pub fn style(&self, name: &str) -> FormatResult<&dyn Style> {
        self.visitor::<StyleVisitor>()?.style(name)
    }

    pub fn format(&mut self, message: &str) -> FormatResult<String> {
        let mut tree = self.lexer.tokenize(message)?;
        let root = tree.root();
        let decorated = self.decorated;

        for visitor in self.chain.iter_mut() {
            if visitor.is_decorator() && !decorated {
                trace!(visitor = visitor.name(), "skipping decorator");
                continue;
            }
            let mut ctx = VisitContext::new(&mut tree);
            visitor.visit_full_text(&mut ctx, root)?;
        }

        let output = self
            .chain
            .last()
            .and_then(|visitor| visitor.output())
            .ok_or(FormatError::MissingFinalVisitor)?;
        Ok(output.replace('\0', "\\"))
    }

    /// Format with a base wrap width for this call only; zero disables wrapping
    pub fn format_and_wrap(&mut self, message: &str, width: usize) -> FormatResult<String> {
        let wrap = self.visitor_mut::<WrapVisitor>()?;
        let saved = wrap.base_style().clone();
        let mut style = saved.clone();
        style.set_width(Some(width));
        wrap.set_base_style(style);

        let result = self.format(message);

        self.visitor_mut::<WrapVisitor>()?.set_base_style(saved);
        result
    }
}

/// Escape every `<` so the text is printed literally
pub fn escape(text: &str) -> String {
    let escaped = UNESCAPED_OPEN.replace_all(text, "${1}\\<");
    escape_trailing_backslash(&escaped)
}

/// Replace a run of trailing backslashes with NUL placeholders of the same length.
///
/// A trailing `\` would otherwise escape the `<` of whatever tag follows the text once it is
/// embedded in markup. [`OutputFormatter::format`] turns the placeholders back into `\`.
pub fn escape_trailing_backslash(text: &str) -> String {
    if !text.ends_with('\\') {
        return text.to_string();
    }
    let trimmed = text.trim_end_matches('\\').replace('\0', "");
    let padding = text.len().saturating_sub(trimmed.len());
    let mut escaped = trimmed;
    escaped.extend(std::iter::repeat('\0').take(padding));
    escaped
}

/// Strip tags, ANSI styles and hyperlink sequences, keeping only the text
pub fn remove_decoration(text: &str) -> String {
    let protected = text.replace("\\<", "\0");
    DECORATION.replace_all(&protected, "").replace('\0', "<")
}
