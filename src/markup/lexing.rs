//! Lexing: from raw text to a [`TokenTree`]
//!
//!     1. Line endings are normalized (`\r\n` and `\r` become `\n`).
//!     2. Oversized input is rejected before any scanning (see [`InputLimits`]).
//!     3. The text is scanned for tag syntax: an optional `\`, then `<`, then a tag body or `/`
//!        followed by an optional tag body, then `>`. Matching is case-insensitive and works on
//!        byte offsets; tags are pure ASCII, so slicing between matches never cuts a character.
//!     4. Text between tags goes through [base_tokenization] and becomes words and separators.
//!     5. Escaped tags (`\<info>`) become literal words; all others become full tags with their
//!        parsed sub-tags as children.
//!     6. A single end-of-stream token closes the sequence.
//!
//!     Malformed tag syntax is never an error: it simply does not match and stays text.

pub mod base_tokenization;

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, trace};

use self::base_tokenization::TextToken;
use super::error::{FormatError, FormatResult};
use super::token::{FullTag, Token, TokenId, TokenTree};

/// Grammar of one tag body: a letter, then anything up to the closing `>`
pub const TAG_BODY: &str = r"[a-z][^<>]*";

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\\?<(?:{body}|/(?:{body})?)>", body = TAG_BODY))
        .expect("tag pattern is valid")
});

/// Input size guard.
///
/// Text is rejected only when it is longer than `max_bytes` AND holds more than `max_spaces`
/// space characters; long text without many breaking points is cheap to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InputLimits {
    pub max_bytes: usize,
    pub max_spaces: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        // 240 columns x 55 rows
        InputLimits {
            max_bytes: 13200,
            max_spaces: 5000,
        }
    }
}

impl InputLimits {
    pub fn check(&self, text: &str) -> FormatResult<()> {
        let bytes = text.len();
        if bytes <= self.max_bytes {
            return Ok(());
        }
        let spaces = text.bytes().filter(|byte| *byte == b' ').count();
        if spaces > self.max_spaces {
            debug!(bytes, spaces, "rejecting oversized input");
            return Err(FormatError::TooLargeInput { bytes, spaces });
        }
        Ok(())
    }
}

/// Tokenizer turning a message into a fresh [`TokenTree`]
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    limits: InputLimits,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: InputLimits) -> Self {
        Lexer { limits }
    }

    pub fn limits(&self) -> InputLimits {
        self.limits
    }

    pub fn tokenize(&self, text: &str) -> FormatResult<TokenTree> {
        let text = normalize_line_endings(text);
        self.limits.check(&text)?;

        let mut tree = TokenTree::new();
        let root = tree.root();
        let mut cursor = 0;
        let mut tags = 0;

        for found in TAG_PATTERN.find_iter(&text) {
            if found.start() > cursor {
                push_text_block(&mut tree, root, &text[cursor..found.start()]);
            }
            match found.as_str().strip_prefix('\\') {
                Some(escaped) => {
                    tree.push(root, Token::word(escaped));
                }
                None => {
                    push_full_tag(&mut tree, root, found.as_str());
                    tags += 1;
                }
            }
            cursor = found.end();
        }
        if cursor < text.len() {
            push_text_block(&mut tree, root, &text[cursor..]);
        }

        tree.push(root, Token::Eos);
        debug!(
            bytes = text.len(),
            tags,
            tokens = tree.child_count(root),
            "tokenized message"
        );
        Ok(tree)
    }
}

/// Tokenize `text` with the default input limits
pub fn tokenize(text: &str) -> FormatResult<TokenTree> {
    Lexer::new().tokenize(text)
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn push_text_block(tree: &mut TokenTree, parent: TokenId, block: &str) {
    for (token, span) in base_tokenization::tokenize(block) {
        let slice = &block[span];
        match token {
            TextToken::Whitespace => tree.push(parent, Token::separator(slice)),
            TextToken::Word => tree.push(parent, Token::word(slice)),
        };
    }
}

fn push_full_tag(tree: &mut TokenTree, parent: TokenId, source: &str) -> TokenId {
    let (full_tag, tags) = FullTag::parse(source);
    trace!(source, clauses = tags.len(), "full tag");
    let id = tree.push(parent, Token::FullTag(full_tag));
    for tag in tags {
        tree.push(id, Token::Tag(tag));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(text: &str) -> String {
        tokenize(text).unwrap().to_string()
    }

    #[test]
    fn test_normalizes_line_endings() {
        let tree = tokenize("a\r\nb\rc").unwrap();
        let separators = tree
            .children(tree.root())
            .filter(|id| tree.token(*id).is_newline())
            .count();
        assert_eq!(separators, 2);
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(
            dump("<INFO>"),
            "FullTextToken(\nFullTagToken(TagToken<INFO>)\nEosToken()\n)"
        );
    }

    #[test]
    fn test_empty_and_numeric_tags_are_text() {
        assert_eq!(dump("<>"), "FullTextToken(\nWordToken(<>)\nEosToken()\n)");
        assert_eq!(dump("<1>"), "FullTextToken(\nWordToken(<1>)\nEosToken()\n)");
    }

    #[test]
    fn test_tag_inside_word_splits_it() {
        assert_eq!(
            dump("foo<b>bar"),
            "FullTextToken(\nWordToken(foo)\nFullTagToken(TagToken<b>)\nWordToken(bar)\nEosToken()\n)"
        );
    }

    #[test]
    fn test_limits_reject_only_when_both_thresholds_are_exceeded() {
        let lexer = Lexer::with_limits(InputLimits {
            max_bytes: 10,
            max_spaces: 3,
        });
        assert!(lexer.tokenize("a b c d e f").is_err());
        assert!(lexer.tokenize("abcdefghijklmnop").is_ok());
        assert!(lexer.tokenize("a b c d").is_ok());
    }

    #[test]
    fn test_long_text_without_spaces_is_accepted() {
        let text = "\\".repeat(14000);
        assert!(tokenize(&text).is_ok());
    }
}
