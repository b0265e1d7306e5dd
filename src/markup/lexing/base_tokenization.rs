//! Base tokenization of plain text blocks
//!
//! Text found between tags is split here with a logos lexer into runs of non-whitespace and
//! single whitespace characters. Tag scanning happens one level up, in
//! [tokenize](super::Lexer::tokenize); by the time a block arrives here it contains no tags.
//!
//! Whitespace is the Unicode `White_Space` set, so no-break, em and ideographic spaces split
//! words just like an ASCII space does.

use logos::Logos;

/// Raw lexical classes of a text block
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextToken {
    #[regex(r"\s")]
    Whitespace,

    #[regex(r"[^\s]+")]
    Word,
}

/// Tokenize a text block, pairing each token with its byte span
pub fn tokenize(source: &str) -> Vec<(TextToken, logos::Span)> {
    let mut lexer = TextToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
