//! Serializable nested view of a token tree, used by the `--tokens` dump of the CLI.

use serde::Serialize;

use super::core::{Token, TokenKind};
use super::tree::{TokenId, TokenTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSnapshot {
    pub kind: TokenKind,
    pub text: String,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TokenSnapshot>,
}

impl TokenSnapshot {
    pub fn of(tree: &TokenTree, id: TokenId) -> Self {
        let token = tree.token(id);
        let (name, values) = match token {
            Token::Tag(tag) => (Some(tag.name.clone()), tag.values.clone()),
            _ => (None, Vec::new()),
        };
        TokenSnapshot {
            kind: token.kind(),
            text: token.text().to_string(),
            length: tree.length(id),
            name,
            values,
            children: tree
                .children(id)
                .map(|child| TokenSnapshot::of(tree, child))
                .collect(),
        }
    }
}

impl TokenTree {
    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot::of(self, self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::lexing::tokenize;

    #[test]
    fn test_snapshot_serializes_tags_with_names() {
        let tree = tokenize("<href=a,b>x").unwrap();
        let json = serde_json::to_value(tree.snapshot()).unwrap();
        assert_eq!(json["kind"], "full_text");
        assert_eq!(json["children"][0]["kind"], "full_tag");
        assert_eq!(json["children"][0]["children"][0]["name"], "href");
        assert_eq!(json["children"][0]["children"][0]["values"][1], "b");
        assert_eq!(json["children"][1]["text"], "x");
        assert_eq!(json["children"][2]["kind"], "eos");
    }
}
