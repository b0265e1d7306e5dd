//! Final pass: materialize the tree as a string

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use super::{walk_children, walk_full_text, FormatterVisitor, VisitContext, Visitor};
use crate::markup::error::{FormatError, FormatResult};
use crate::markup::token::{Token, TokenId};

/// How tokens are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// Visible text only; tags disappear
    #[default]
    Normal,
    /// Everything as written, tags included
    Raw,
    /// Like `Raw`, with literal words that look like tags escaped again
    RawEscaped,
    /// Visible text plus a bracketed description of every other token
    Debug,
}

impl PrintMode {
    fn keeps_tags_whole(self) -> bool {
        matches!(self, PrintMode::Raw | PrintMode::RawEscaped)
    }
}

impl FromStr for PrintMode {
    type Err = FormatError;

    fn from_str(name: &str) -> FormatResult<Self> {
        match name {
            "normal" => Ok(PrintMode::Normal),
            "raw" => Ok(PrintMode::Raw),
            "raw-escaped" => Ok(PrintMode::RawEscaped),
            "debug" => Ok(PrintMode::Debug),
            other => Err(FormatError::InvalidConfiguration {
                option: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrintMode::Normal => "normal",
            PrintMode::Raw => "raw",
            PrintMode::RawEscaped => "raw-escaped",
            PrintMode::Debug => "debug",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrintVisitor {
    mode: PrintMode,
    output: String,
}

impl PrintVisitor {
    pub fn new(mode: PrintMode) -> Self {
        PrintVisitor {
            mode,
            output: String::new(),
        }
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// Output of the last run
    pub fn output(&self) -> &str {
        &self.output
    }

    fn emit(&mut self, ctx: &VisitContext<'_>, id: TokenId) {
        let token = ctx.tree.token(id);
        match self.mode {
            PrintMode::Normal => {
                if token.is_visible() {
                    self.output.push_str(token.text());
                }
            }
            PrintMode::Raw => self.output.push_str(token.text()),
            PrintMode::RawEscaped => {
                let text = token.text();
                if matches!(token, Token::Word(_)) && text.starts_with('<') && text.ends_with('>') {
                    self.output.push('\\');
                }
                self.output.push_str(text);
            }
            PrintMode::Debug => {
                if token.is_visible() {
                    self.output.push_str(token.text());
                } else {
                    self.output.push('[');
                    self.output.push_str(&ctx.tree.describe(id));
                    self.output.push(']');
                }
            }
        }
    }
}

impl Visitor for PrintVisitor {
    fn visit_full_text(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.output.clear();
        walk_full_text(self, ctx, id)
    }

    fn visit_full_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if !self.mode.keeps_tags_whole() && ctx.tree.child_count(id) > 0 {
            walk_children(self, ctx, id)
        } else {
            self.emit(ctx, id);
            Ok(())
        }
    }

    fn visit_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.emit(ctx, id);
        Ok(())
    }

    fn visit_word(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.emit(ctx, id);
        Ok(())
    }

    fn visit_separator(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.emit(ctx, id);
        Ok(())
    }

    fn visit_decoration(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.emit(ctx, id);
        Ok(())
    }

    fn visit_eos(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.emit(ctx, id);
        Ok(())
    }
}

impl FormatterVisitor for PrintVisitor {
    fn name(&self) -> &'static str {
        "print"
    }

    fn output(&self) -> Option<&str> {
        Some(&self.output)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::lexing::tokenize;
    use crate::markup::visitors::run;
    use rstest::rstest;

    fn print(text: &str, mode: PrintMode) -> String {
        let mut tree = tokenize(text).unwrap();
        let mut visitor = PrintVisitor::new(mode);
        run(&mut visitor, &mut tree).unwrap();
        visitor.output().to_string()
    }

    const SAMPLE: &str = "a <info;x=1>b</> \\<c> <d/>";

    #[rstest]
    #[case(PrintMode::Normal, "a b <c> ")]
    #[case(PrintMode::Raw, "a <info;x=1>b</> <c> <d/>")]
    #[case(PrintMode::RawEscaped, "a <info;x=1>b</> \\<c> <d/>")]
    #[case(
        PrintMode::Debug,
        "a [TagToken<info>][TagToken<x=1>]b[FullTagToken()] <c> [TagToken<d/>][EosToken()]"
    )]
    fn test_modes(#[case] mode: PrintMode, #[case] expected: &str) {
        assert_eq!(print(SAMPLE, mode), expected);
    }

    #[test]
    fn test_output_is_reset_between_runs() {
        let mut tree = tokenize("once").unwrap();
        let mut visitor = PrintVisitor::default();
        run(&mut visitor, &mut tree).unwrap();
        run(&mut visitor, &mut tree).unwrap();
        assert_eq!(visitor.output(), "once");
    }

    #[rstest]
    #[case("normal", PrintMode::Normal)]
    #[case("raw", PrintMode::Raw)]
    #[case("raw-escaped", PrintMode::RawEscaped)]
    #[case("debug", PrintMode::Debug)]
    fn test_mode_names(#[case] name: &str, #[case] mode: PrintMode) {
        assert_eq!(name.parse::<PrintMode>().unwrap(), mode);
        assert_eq!(mode.to_string(), name);
    }
}
