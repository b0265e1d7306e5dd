//! Visitor protocol and traversal
//!
//!     A visitor implements one handler per token kind; every handler defaults to a no-op (or,
//!     for the two containers, to the standard walk), so a pass only overrides what it cares
//!     about. Handlers receive a [`VisitContext`] holding the tree being walked and the stack of
//!     currently open full tags, and may edit the tree around the token they are visiting.
//!
//! Full Tag Bookkeeping
//!
//!     [`walk_full_tag`] does the open/close reconciliation shared by all passes:
//!
//!         - a start tag is pushed on the tag stack, then its sub-tags are visited;
//!         - a close tag without sub-tags (`</>`) first receives a copy of the sub-tags of the
//!           innermost open tag, so later handlers see `</>` exactly like `</error>`;
//!         - a close tag's sub-tags are visited (self-closed tags already ran as a start);
//!         - [`Visitor::leave_full_tag`] runs while the tag is still on the stack;
//!         - a close tag pops the stack.
//!
//!     The depth reported by [`VisitContext::depth`] during a start tag's handlers includes the
//!     tag itself.

pub mod chain;
pub mod href;
pub mod print;
pub mod style;
pub mod wrap;
pub mod wrap_style;

use std::any::Any;

use super::error::FormatResult;
use super::token::{Token, TokenId, TokenKind, TokenTree};

/// Traversal state shared by the handlers of one pass
pub struct VisitContext<'a> {
    pub tree: &'a mut TokenTree,
    tag_stack: Vec<TokenId>,
}

impl<'a> VisitContext<'a> {
    pub fn new(tree: &'a mut TokenTree) -> Self {
        VisitContext {
            tree,
            tag_stack: Vec::new(),
        }
    }

    /// Number of currently open full tags
    pub fn depth(&self) -> usize {
        self.tag_stack.len()
    }

    pub fn innermost_open_tag(&self) -> Option<TokenId> {
        self.tag_stack.last().copied()
    }

    pub fn reset(&mut self) {
        self.tag_stack.clear();
    }

    /// Insert a decoration before `anchor`; empty sequences are skipped
    pub fn decorate_before(&mut self, anchor: TokenId, text: String) -> FormatResult<()> {
        if !text.is_empty() {
            self.tree.insert_before(anchor, Token::Decoration(text))?;
        }
        Ok(())
    }

    /// Insert a decoration after `anchor`; empty sequences are skipped
    pub fn decorate_after(&mut self, anchor: TokenId, text: String) -> FormatResult<()> {
        if !text.is_empty() {
            self.tree.insert_after(anchor, Token::Decoration(text))?;
        }
        Ok(())
    }
}

/// Per-token-kind handlers of a pass over a [`TokenTree`]
pub trait Visitor {
    fn visit_full_text(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        walk_full_text(self, ctx, id)
    }

    fn visit_full_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        walk_full_tag(self, ctx, id)
    }

    /// Runs after a full tag's sub-tags, before a close tag is popped
    fn leave_full_tag(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }

    fn visit_tag(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }

    fn visit_word(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }

    fn visit_separator(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }

    fn visit_decoration(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }

    fn visit_eos(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
        Ok(())
    }
}

/// Route a token to the handler for its kind
pub fn dispatch<V: Visitor + ?Sized>(
    visitor: &mut V,
    ctx: &mut VisitContext<'_>,
    id: TokenId,
) -> FormatResult<()> {
    match ctx.tree.token(id).kind() {
        TokenKind::FullText => visitor.visit_full_text(ctx, id),
        TokenKind::FullTag => visitor.visit_full_tag(ctx, id),
        TokenKind::Tag => visitor.visit_tag(ctx, id),
        TokenKind::Word => visitor.visit_word(ctx, id),
        TokenKind::Separator => visitor.visit_separator(ctx, id),
        TokenKind::Decoration => visitor.visit_decoration(ctx, id),
        TokenKind::Eos => visitor.visit_eos(ctx, id),
    }
}

/// Visit every child of a container in order, tolerating edits made by the handlers
pub fn walk_children<V: Visitor + ?Sized>(
    visitor: &mut V,
    ctx: &mut VisitContext<'_>,
    parent: TokenId,
) -> FormatResult<()> {
    ctx.tree.rewind(parent);
    while let Some(child) = ctx.tree.advance(parent) {
        dispatch(visitor, ctx, child)?;
    }
    Ok(())
}

/// Standard walk of the root: reset the tag stack, then visit the children
pub fn walk_full_text<V: Visitor + ?Sized>(
    visitor: &mut V,
    ctx: &mut VisitContext<'_>,
    id: TokenId,
) -> FormatResult<()> {
    ctx.reset();
    walk_children(visitor, ctx, id)
}

/// Standard walk of a full tag, see the module docs
pub fn walk_full_tag<V: Visitor + ?Sized>(
    visitor: &mut V,
    ctx: &mut VisitContext<'_>,
    id: TokenId,
) -> FormatResult<()> {
    let Some(tag) = ctx.tree.token(id).as_full_tag() else {
        return Ok(());
    };
    let (is_start, is_close) = (tag.is_start, tag.is_close);

    if is_start {
        ctx.tag_stack.push(id);
        walk_children(visitor, ctx, id)?;
    }
    if is_close && !is_start {
        if let Some(open) = ctx.innermost_open_tag() {
            if ctx.tree.child_count(id) == 0 {
                ctx.tree.clone_children(open, id);
            }
        }
        walk_children(visitor, ctx, id)?;
    }

    visitor.leave_full_tag(ctx, id)?;

    if is_close {
        ctx.tag_stack.pop();
    }
    Ok(())
}

/// A pass that can run as part of an output formatter's chain
pub trait FormatterVisitor: Visitor + Any {
    /// Short name used in logs and lookup errors
    fn name(&self) -> &'static str;

    /// Decorating passes are skipped when the formatter is not decorated
    fn is_decorator(&self) -> bool {
        false
    }

    /// The materialized output, for passes that build one
    fn output(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Run a single visitor over a whole tree
pub fn run<V: Visitor + ?Sized>(visitor: &mut V, tree: &mut TokenTree) -> FormatResult<()> {
    let root = tree.root();
    let mut ctx = VisitContext::new(tree);
    visitor.visit_full_text(&mut ctx, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::lexing::tokenize;

    #[derive(Default)]
    struct CountingVisitor {
        words: usize,
        tags: Vec<(String, usize)>,
        eos: usize,
        max_depth: usize,
    }

    impl Visitor for CountingVisitor {
        fn visit_word(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
            self.words += 1;
            Ok(())
        }

        fn visit_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
            let label = ctx.tree.describe(id);
            self.tags.push((label, ctx.depth()));
            self.max_depth = self.max_depth.max(ctx.depth());
            Ok(())
        }

        fn visit_eos(&mut self, _ctx: &mut VisitContext<'_>, _id: TokenId) -> FormatResult<()> {
            self.eos += 1;
            Ok(())
        }
    }

    #[test]
    fn test_walk_visits_every_kind_once() {
        let mut tree = tokenize("a <b>c <d/>e</b> f").unwrap();
        let mut visitor = CountingVisitor::default();
        run(&mut visitor, &mut tree).unwrap();
        assert_eq!(visitor.words, 4);
        assert_eq!(visitor.eos, 1);
        assert_eq!(
            visitor.tags,
            vec![
                ("TagToken<b>".to_string(), 1),
                ("TagToken<d/>".to_string(), 2),
                ("TagToken</b>".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_close_all_tag_inherits_open_sub_tags() {
        let mut tree = tokenize("<x;y=1,2>text</>").unwrap();
        let mut visitor = CountingVisitor::default();
        run(&mut visitor, &mut tree).unwrap();
        assert_eq!(
            visitor.tags,
            vec![
                ("TagToken<x>".to_string(), 1),
                ("TagToken<y=1,2>".to_string(), 1),
                ("TagToken</x>".to_string(), 1),
                ("TagToken</y=1,2>".to_string(), 1),
            ]
        );
        assert!(tree.to_string().contains("FullTagToken(TagToken</x>+TagToken</y=1,2>)"));
    }

    #[test]
    fn test_unmatched_close_tag_is_tolerated() {
        let mut tree = tokenize("</> word </nope>").unwrap();
        let mut visitor = CountingVisitor::default();
        run(&mut visitor, &mut tree).unwrap();
        assert_eq!(visitor.words, 1);
        assert_eq!(visitor.tags, vec![("TagToken</nope>".to_string(), 0)]);
    }

    struct Splitter;

    impl Visitor for Splitter {
        fn visit_word(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
            let text = ctx.tree.text(id).to_string();
            if text.len() > 1 {
                for piece in text.chars() {
                    ctx.tree.insert_before(id, Token::Word(piece.to_string()))?;
                }
                ctx.tree.remove(id)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_handlers_may_split_the_current_token() {
        let mut tree = tokenize("ab c").unwrap();
        run(&mut Splitter, &mut tree).unwrap();
        let words: Vec<_> = tree
            .children(tree.root())
            .map(|id| tree.text(id).to_string())
            .collect();
        assert_eq!(words, vec!["a", "b", " ", "c", ""]);
    }
}
