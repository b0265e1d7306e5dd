//! Debug descriptions of tokens
//!
//! Produces the labels used by the debug print mode and by `Display for TokenTree`:
//!
//!     FullTextToken(
//!     WordToken(word1)
//!     SeparatorToken( )
//!     FullTagToken(TagToken<tag1>+TagToken<tag2=att1,att2>)
//!     WordToken(word2)
//!     FullTagToken()
//!     EosToken()
//!     )

use std::fmt;

use super::core::Token;
use super::tree::{TokenId, TokenTree};

impl TokenTree {
    /// One-line (or, for the root, multi-line) description of a token and its children
    pub fn describe(&self, id: TokenId) -> String {
        match self.token(id) {
            Token::FullText => {
                let children: Vec<String> =
                    self.children(id).map(|child| self.describe(child)).collect();
                format!("FullTextToken(\n{}\n)", children.join("\n"))
            }
            Token::FullTag(_) => {
                let children: Vec<String> =
                    self.children(id).map(|child| self.describe(child)).collect();
                format!("FullTagToken({})", children.join("+"))
            }
            Token::Tag(tag) => {
                let (prefix, suffix) = match self.enclosing_full_tag(id) {
                    Some((_, parent)) if parent.is_self_closed() => ("", "/"),
                    Some((_, parent)) if parent.is_close => ("/", ""),
                    _ => ("", ""),
                };
                format!("TagToken<{}{}{}>", prefix, tag.source, suffix)
            }
            Token::Word(text) => format!("WordToken({})", text),
            Token::Separator(text) => format!("SeparatorToken({})", text),
            Token::Decoration(text) => format!("DecorationToken({})", text),
            Token::Eos => "EosToken()".to_string(),
        }
    }
}

impl fmt::Display for TokenTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(self.root()))
    }
}
