//! Lexer output as seen through the tree dump and the fluent assertions

use tagfmt::markup::testing::assert_tokens;
use tagfmt::markup::token::TokenKind;
use tagfmt::markup::{tokenize, FormatError, InputLimits, Lexer};

#[test]
fn empty_text_is_only_eos() {
    let tree = tokenize("").unwrap();
    insta::assert_snapshot!(tree.to_string(), @r"
    FullTextToken(
    EosToken()
    )
    ");
}

#[test]
fn escaped_tag_is_a_word() {
    let tree = tokenize("\\<tag>").unwrap();
    assert_tokens(&tree)
        .count(2)
        .token(0, |t| t.kind(TokenKind::Word).text("<tag>").length(5))
        .ends_with_eos();
}

#[test]
fn lone_angle_brackets_are_words() {
    let tree = tokenize("< <tag> >").unwrap();
    insta::assert_snapshot!(tree.to_string(), @r"
    FullTextToken(
    WordToken(<)
    SeparatorToken( )
    FullTagToken(TagToken<tag>)
    SeparatorToken( )
    WordToken(>)
    EosToken()
    )
    ");
}

#[test]
fn multi_clause_tag_and_close_all() {
    let tree = tokenize("word1 <tag1;tag2=att1,att2>word2</>").unwrap();
    insta::assert_snapshot!(tree.to_string(), @r"
    FullTextToken(
    WordToken(word1)
    SeparatorToken( )
    FullTagToken(TagToken<tag1>+TagToken<tag2=att1,att2>)
    WordToken(word2)
    FullTagToken()
    EosToken()
    )
    ");

    assert_tokens(&tree)
        .count(6)
        .token(2, |t| {
            t.full_tag("<tag1;tag2=att1,att2>")
                .tags(&["tag1", "tag2"])
                .tag_values(0, &[])
                .tag_values(1, &["att1", "att2"])
                .length(0)
        })
        .token(4, |t| t.full_tag("</>").tags(&[]))
        .ends_with_eos();
}

#[test]
fn close_and_self_closed_tags_are_marked() {
    let tree = tokenize("<wrap=2/>a</info>").unwrap();
    insta::assert_snapshot!(tree.to_string(), @r"
    FullTextToken(
    FullTagToken(TagToken<wrap=2/>)
    WordToken(a)
    FullTagToken(TagToken</info>)
    EosToken()
    )
    ");
}

#[test]
fn separators_are_single_characters() {
    let tree = tokenize("a  \tb\n").unwrap();
    assert_tokens(&tree)
        .count(7)
        .token(0, |t| t.kind(TokenKind::Word).text("a"))
        .token(1, |t| t.kind(TokenKind::Separator).text(" "))
        .token(2, |t| t.kind(TokenKind::Separator).text(" "))
        .token(3, |t| t.kind(TokenKind::Separator).text("\t"))
        .token(4, |t| t.kind(TokenKind::Word).text("b"))
        .token(5, |t| t.kind(TokenKind::Separator).text("\n").length(1))
        .ends_with_eos();
}

#[test]
fn unicode_spaces_are_separators() {
    let tree = tokenize("ab\u{3000}cd\u{a0}ef").unwrap();
    assert_tokens(&tree)
        .count(6)
        .token(0, |t| t.kind(TokenKind::Word).text("ab"))
        .token(1, |t| t.kind(TokenKind::Separator).text("\u{3000}").length(2))
        .token(2, |t| t.kind(TokenKind::Word).text("cd"))
        .token(3, |t| t.kind(TokenKind::Separator).text("\u{a0}").length(1))
        .token(4, |t| t.kind(TokenKind::Word).text("ef"))
        .ends_with_eos();
}

#[test]
fn wide_characters_count_by_display_width() {
    let tree = tokenize("日本 öü").unwrap();
    assert_tokens(&tree)
        .token(0, |t| t.text("日本").length(4))
        .token(2, |t| t.text("öü").length(2));
}

#[test]
fn oversized_input_is_rejected() {
    let lexer = Lexer::with_limits(InputLimits {
        max_bytes: 8,
        max_spaces: 2,
    });
    assert!(matches!(
        lexer.tokenize("a b c d e"),
        Err(FormatError::TooLargeInput { .. })
    ));
}
