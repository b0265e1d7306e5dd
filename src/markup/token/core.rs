//! Token value types
//!
//! These carry no structure: parent/sibling relationships belong to
//! [`TokenTree`](super::TokenTree).

use serde::Serialize;

/// Discriminant of a [`Token`], cheap to copy out of the tree before mutating it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    FullText,
    FullTag,
    Tag,
    Word,
    Separator,
    Decoration,
    Eos,
}

/// One lexical unit of a formatted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Root container of a whole message
    FullText,
    /// A complete `<...>` unit; its sub-tags are its children
    FullTag(FullTag),
    /// One `name[=v1,v2]` clause of a full tag
    Tag(Tag),
    /// A run of non-whitespace text, escaped `\<` already turned into `<`
    Word(String),
    /// A single whitespace character
    Separator(String),
    /// Injected raw output: escape sequences, fill characters
    Decoration(String),
    /// End-of-stream marker
    Eos,
}

impl Token {
    /// Build a word, unescaping `\<` into `<`
    pub fn word(text: &str) -> Self {
        Token::Word(text.replace("\\<", "<"))
    }

    pub fn separator(text: impl Into<String>) -> Self {
        Token::Separator(text.into())
    }

    pub fn newline() -> Self {
        Token::Separator("\n".to_string())
    }

    pub fn decoration(text: impl Into<String>) -> Self {
        Token::Decoration(text.into())
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::FullText => TokenKind::FullText,
            Token::FullTag(_) => TokenKind::FullTag,
            Token::Tag(_) => TokenKind::Tag,
            Token::Word(_) => TokenKind::Word,
            Token::Separator(_) => TokenKind::Separator,
            Token::Decoration(_) => TokenKind::Decoration,
            Token::Eos => TokenKind::Eos,
        }
    }

    /// The text this token stands for: source text for tags, content for text tokens
    pub fn text(&self) -> &str {
        match self {
            Token::FullTag(tag) => &tag.source,
            Token::Tag(tag) => &tag.source,
            Token::Word(text) | Token::Separator(text) | Token::Decoration(text) => text,
            Token::FullText | Token::Eos => "",
        }
    }

    /// Whether the token prints its text in normal output
    pub fn is_visible(&self) -> bool {
        match self {
            Token::Word(text) | Token::Separator(text) | Token::Decoration(text) => {
                !text.is_empty()
            }
            _ => false,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Token::FullText | Token::FullTag(_))
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Separator(text) if text == "\n")
    }

    /// Only a plain space counts as an empty separator (trimmed before a forced break)
    pub fn is_empty_separator(&self) -> bool {
        matches!(self, Token::Separator(text) if text == " ")
    }

    /// Start tags stay on the same line as whatever follows them
    pub fn keeps_with_next(&self) -> bool {
        matches!(self, Token::FullTag(tag) if tag.is_start)
    }

    /// Close tags stay on the same line as whatever precedes them
    pub fn keeps_with_prev(&self) -> bool {
        matches!(self, Token::FullTag(tag) if tag.is_close && !tag.is_self_closed())
    }

    pub fn as_full_tag(&self) -> Option<&FullTag> {
        match self {
            Token::FullTag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Token::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

/// A complete tag such as `<info>`, `</>`, `<wrap=10/>` or `<fg=red;options=bold>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullTag {
    /// The tag as written, including `<` and `>`
    pub source: String,
    pub is_start: bool,
    pub is_close: bool,
}

impl FullTag {
    /// Parse a `<...>` unit into its flags and sub-tags.
    ///
    /// A leading `/` marks a close tag, a trailing `/` a self-closed one. The body is split on
    /// `;`, each clause left-trimmed and empty clauses dropped.
    pub fn parse(source: &str) -> (FullTag, Vec<Tag>) {
        let inner = source
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(source);

        let (content, is_start, is_close) = if let Some(rest) = inner.strip_prefix('/') {
            (rest, false, true)
        } else if let Some(rest) = inner.strip_suffix('/') {
            (rest, true, true)
        } else {
            (inner, true, false)
        };

        let tags = content
            .split(';')
            .map(str::trim_start)
            .filter(|clause| !clause.is_empty())
            .map(Tag::parse)
            .collect();

        (
            FullTag {
                source: source.to_string(),
                is_start,
                is_close,
            },
            tags,
        )
    }

    pub fn is_self_closed(&self) -> bool {
        self.is_start && self.is_close
    }
}

/// One `name[=value]` clause of a full tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// The clause as written
    pub source: String,
    /// Clause name with surrounding `/` trimmed
    pub name: String,
    /// Everything after the first `=`, possibly empty
    pub value: String,
    /// `value` split on `,`; empty when there is no value
    pub values: Vec<String>,
}

impl Tag {
    pub fn parse(clause: &str) -> Tag {
        let (name, value) = clause.split_once('=').unwrap_or((clause, ""));
        let values = if value.is_empty() {
            Vec::new()
        } else {
            value.split(',').map(str::to_string).collect()
        };
        Tag {
            source: clause.to_string(),
            name: name.trim_matches('/').to_string(),
            value: value.to_string(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_word_unescapes_less_than() {
        assert_eq!(Token::word("foo\\<bar"), Token::Word("foo<bar".to_string()));
    }

    #[rstest]
    #[case("<tag>", true, false)]
    #[case("</tag>", false, true)]
    #[case("</>", false, true)]
    #[case("<tag/>", true, true)]
    fn test_full_tag_flags(#[case] source: &str, #[case] start: bool, #[case] close: bool) {
        let (tag, _) = FullTag::parse(source);
        assert_eq!(tag.is_start, start);
        assert_eq!(tag.is_close, close);
    }

    #[test]
    fn test_full_tag_splits_clauses() {
        let (_, tags) = FullTag::parse("<tag1; tag2=att1,att2;>");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "tag1");
        assert!(tags[0].values.is_empty());
        assert_eq!(tags[1].name, "tag2");
        assert_eq!(tags[1].value, "att1,att2");
        assert_eq!(tags[1].values, vec!["att1", "att2"]);
    }

    #[test]
    fn test_close_all_tag_has_no_clauses() {
        let (_, tags) = FullTag::parse("</>");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_tag_value_keeps_later_equals_signs() {
        let tag = Tag::parse("href=https://example.com/?a=1");
        assert_eq!(tag.name, "href");
        assert_eq!(tag.value, "https://example.com/?a=1");
    }

    #[test]
    fn test_keep_together_flags() {
        let (start, _) = FullTag::parse("<a>");
        let (close, _) = FullTag::parse("</a>");
        let (single, _) = FullTag::parse("<a/>");
        assert!(Token::FullTag(start.clone()).keeps_with_next());
        assert!(!Token::FullTag(start).keeps_with_prev());
        assert!(Token::FullTag(close.clone()).keeps_with_prev());
        assert!(!Token::FullTag(close).keeps_with_next());
        assert!(Token::FullTag(single.clone()).keeps_with_next());
        assert!(!Token::FullTag(single).keeps_with_prev());
    }

    #[test]
    fn test_only_space_is_an_empty_separator() {
        assert!(Token::separator(" ").is_empty_separator());
        assert!(!Token::separator("\t").is_empty_separator());
        assert!(!Token::newline().is_empty_separator());
    }
}
