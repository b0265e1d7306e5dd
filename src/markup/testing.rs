//! Testing utilities
//!
//!     Two helpers shared by unit and integration tests:
//!
//!         - [render] runs one pass over a message and prints the result, which is how every
//!           visitor is tested in isolation:
//!
//!               render(&mut StyleVisitor::new(), "<info>x</info>", PrintMode::Normal)?
//!
//!         - [assert_tokens] is a fluent assertion over the top-level tokens of a lexed
//!           message, so lexer tests state the whole sequence instead of counting nodes:
//!
//!               assert_tokens(&tree)
//!                   .count(3)
//!                   .token(0, |t| t.kind(TokenKind::Word).text("foo"))
//!                   .token(1, |t| t.full_tag("<b>").tags(&["b"]))
//!                   .ends_with_eos();

use super::error::FormatResult;
use super::lexing::tokenize;
use super::token::{Token, TokenId, TokenKind, TokenTree};
use super::visitors::print::{PrintMode, PrintVisitor};
use super::visitors::{run, Visitor};

/// Lex `text`, run `visitor` over it, then print the tree in `mode`
pub fn render<V: Visitor + ?Sized>(
    visitor: &mut V,
    text: &str,
    mode: PrintMode,
) -> FormatResult<String> {
    let mut tree = tokenize(text)?;
    run(visitor, &mut tree)?;
    print(&mut tree, mode)
}

/// Print an already processed tree
pub fn print(tree: &mut TokenTree, mode: PrintMode) -> FormatResult<String> {
    let mut printer = PrintVisitor::new(mode);
    run(&mut printer, tree)?;
    Ok(printer.output().to_string())
}

/// Create an assertion builder over the children of the root
pub fn assert_tokens(tree: &TokenTree) -> TreeAssertion<'_> {
    TreeAssertion {
        tree,
        ids: tree.children(tree.root()).collect(),
    }
}

pub struct TreeAssertion<'a> {
    tree: &'a TokenTree,
    ids: Vec<TokenId>,
}

impl<'a> TreeAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.ids.len(),
            expected,
            "Expected {} tokens, found {}:\n{}",
            expected,
            self.ids.len(),
            self.tree
        );
        self
    }

    pub fn token<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>) -> TokenAssertion<'a>,
    {
        assert!(
            index < self.ids.len(),
            "Token index {} out of bounds ({} tokens)",
            index,
            self.ids.len()
        );
        assertion(TokenAssertion {
            tree: self.tree,
            id: self.ids[index],
            context: format!("tokens[{}]", index),
        });
        self
    }

    /// Exactly one end-of-stream token, in last position
    pub fn ends_with_eos(self) -> Self {
        let eos: Vec<usize> = self
            .ids
            .iter()
            .enumerate()
            .filter(|(_, id)| matches!(self.tree.token(**id), Token::Eos))
            .map(|(index, _)| index)
            .collect();
        assert_eq!(
            eos,
            vec![self.ids.len().saturating_sub(1)],
            "Expected a single trailing EosToken:\n{}",
            self.tree
        );
        self
    }
}

pub struct TokenAssertion<'a> {
    tree: &'a TokenTree,
    id: TokenId,
    context: String,
}

impl TokenAssertion<'_> {
    pub fn kind(self, expected: TokenKind) -> Self {
        let actual = self.tree.token(self.id).kind();
        assert_eq!(actual, expected, "{}: wrong kind", self.context);
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.tree.text(self.id),
            expected,
            "{}: wrong text",
            self.context
        );
        self
    }

    pub fn length(self, expected: usize) -> Self {
        assert_eq!(
            self.tree.length(self.id),
            expected,
            "{}: wrong length",
            self.context
        );
        self
    }

    /// A full tag with the given source
    pub fn full_tag(self, source: &str) -> Self {
        match self.tree.token(self.id) {
            Token::FullTag(tag) => assert_eq!(tag.source, source, "{}", self.context),
            other => panic!("{}: expected a full tag, found {:?}", self.context, other),
        }
        self
    }

    /// Names of the sub-tags, in order
    pub fn tags(self, names: &[&str]) -> Self {
        let actual: Vec<String> = self
            .tree
            .children(self.id)
            .filter_map(|child| self.tree.token(child).as_tag())
            .map(|tag| tag.name.clone())
            .collect();
        assert_eq!(actual, names, "{}: wrong sub-tags", self.context);
        self
    }

    /// Values of the sub-tag at `index`
    pub fn tag_values(self, index: usize, values: &[&str]) -> Self {
        let tag = self
            .tree
            .children(self.id)
            .nth(index)
            .and_then(|child| self.tree.token(child).as_tag());
        match tag {
            Some(tag) => assert_eq!(tag.values, values, "{}: wrong values", self.context),
            None => panic!("{}: no sub-tag at {}", self.context, index),
        }
        self
    }
}
