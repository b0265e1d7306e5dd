//! Word wrapping pass
//!
//!     Tracks the column of the current line and, when a word would run past the active width,
//!     either moves it to a new line or cuts it into line-sized pieces. Line breaks are real
//!     `\n` separator tokens inserted into the tree, so later passes (styles in particular)
//!     see them like any other newline.
//!
//! Configuration Stacks
//!
//!     `<wrap=..>...</wrap>` is local: it applies until its close tag. `<wrap=../>` is global:
//!     it applies to the rest of the enclosing tag. Both are keyed by tag depth and the active
//!     style is the deepest applicable entry, a global one winning only when strictly deeper:
//!
//!         <wrap=120/>.....<wrap=80>....</wrap>...
//!                    120           80         120
//!
//! Breaking a Line
//!
//!     A new line is never inserted between a start tag and what follows it, nor between a
//!     close tag and what precedes it. Walking back from the overflowing word over such tags
//!     finds the break point; a single space right before it is dropped. With `fill_up` the
//!     abandoned line is padded up to the width with decoration tokens.

use std::any::Any;
use std::collections::BTreeMap;

use tracing::trace;

use super::wrap_style::WrapStyle;
use super::{walk_full_tag, walk_full_text, FormatterVisitor, VisitContext, Visitor};
use crate::markup::error::FormatResult;
use crate::markup::token::{Token, TokenId};
use crate::markup::unicode::{display_width, fill_pattern, leading_width, split_at_width};

#[derive(Debug, Clone, Default)]
pub struct WrapVisitor {
    base: WrapStyle,
    active: WrapStyle,
    cursor: usize,
    local: BTreeMap<usize, WrapStyle>,
    global: BTreeMap<usize, WrapStyle>,
}

impl WrapVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_style(base: WrapStyle) -> Self {
        WrapVisitor {
            base,
            ..Self::default()
        }
    }

    /// Style in effect outside of any `wrap` tag
    pub fn base_style(&self) -> &WrapStyle {
        &self.base
    }

    pub fn set_base_style(&mut self, base: WrapStyle) {
        self.base = base;
    }

    fn needs_cut(&self, word: &str, length: usize) -> bool {
        if is_url(word) && !self.active.cut_urls() {
            return false;
        }
        match self.active.word_cut_limit() {
            Some(limit) => limit > 0 && length > limit,
            None => false,
        }
    }

    fn cut_word(&mut self, ctx: &mut VisitContext<'_>, id: TokenId, width: usize) -> FormatResult<()> {
        // Start the word on a fresh line instead of leaving a few characters dangling
        let correction = match self.active.word_cut_limit() {
            Some(limit) if limit > 5 => 4,
            _ => 0,
        };
        let word = ctx.tree.text(id).to_string();
        let mut rest = word.as_str();
        while !rest.is_empty() {
            let room = width.saturating_sub(self.cursor);
            if self.cursor + correction >= width || (self.cursor > 0 && leading_width(rest) > room) {
                self.add_new_line(ctx, id)?;
            }
            let (chunk, tail) = split_at_width(rest, width.saturating_sub(self.cursor));
            ctx.tree.insert_before(id, Token::Word(chunk.to_string()))?;
            self.cursor += display_width(chunk);
            rest = tail;
        }
        trace!(word = word.as_str(), "cut word");
        ctx.tree.remove(id)
    }

    fn add_new_line(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        let mut border = id;
        while let Some(prev) = ctx.tree.prev_sibling(border) {
            let (before, current) = (ctx.tree.token(prev), ctx.tree.token(border));
            if before.keeps_with_next() || current.keeps_with_prev() {
                border = prev;
            } else if before.is_empty_separator() {
                self.cursor = self.cursor.saturating_sub(ctx.tree.length(prev));
                ctx.tree.remove(prev)?;
                break;
            } else {
                break;
            }
        }

        let starts_line = match ctx.tree.prev_sibling(border) {
            Some(prev) => ctx.tree.token(prev).is_newline(),
            None => true,
        };
        if !starts_line {
            self.fill_up(ctx, border)?;
            ctx.tree.insert_before(border, Token::newline())?;
        }
        self.new_line_reset(ctx, ctx.tree.prev_sibling(id));
        Ok(())
    }

    /// Recompute the column from the tokens between `last` and the previous line break
    fn new_line_reset(&mut self, ctx: &VisitContext<'_>, last: Option<TokenId>) {
        self.cursor = 0;
        let mut current = last;
        while let Some(id) = current {
            if ctx.tree.token(id).is_newline() {
                break;
            }
            self.cursor += ctx.tree.length(id);
            current = ctx.tree.prev_sibling(id);
        }
    }

    fn fill_up(&self, ctx: &mut VisitContext<'_>, border: TokenId) -> FormatResult<()> {
        let (Some(pattern), Some(width)) = (self.active.fill_up(), self.active.width()) else {
            return Ok(());
        };
        if self.cursor < width {
            let padding = fill_pattern(pattern, width - self.cursor);
            ctx.tree.insert_before(border, Token::Decoration(padding))?;
        }
        Ok(())
    }

    fn reset_active(&mut self, depth: usize) {
        let local = self.local.range(..=depth).next_back();
        let global = self.global.range(..=depth).next_back();
        self.active = match (local, global) {
            (Some((local_depth, _)), Some((global_depth, style))) if global_depth > local_depth => {
                style.clone()
            }
            (Some((_, style)), _) => style.clone(),
            (None, Some((_, style))) => style.clone(),
            (None, None) => self.base.clone(),
        };
    }
}

fn is_url(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://")
}

impl Visitor for WrapVisitor {
    fn visit_full_text(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.cursor = 0;
        self.local.clear();
        self.global.clear();
        self.active = self.base.clone();
        walk_full_text(self, ctx, id)
    }

    fn visit_full_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        walk_full_tag(self, ctx, id)?;
        let closes = ctx
            .tree
            .token(id)
            .as_full_tag()
            .is_some_and(|tag| tag.is_close && !tag.is_self_closed());
        if closes {
            // Globals set inside the closed tag end with it
            let depth = ctx.depth();
            self.global.retain(|global_depth, _| *global_depth <= depth);
            self.reset_active(depth);
        }
        Ok(())
    }

    fn visit_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        let Some(tag) = ctx.tree.token(id).as_tag() else {
            return Ok(());
        };
        let name = tag.name.to_ascii_lowercase();
        if name != "wrap" && name != "nowrap" {
            return Ok(());
        }
        let Some((_, parent)) = ctx.tree.enclosing_full_tag(id) else {
            return Ok(());
        };
        let depth = ctx.depth();

        if parent.is_start {
            let style = WrapStyle::from_tag(tag)?;
            if parent.is_self_closed() {
                self.global.insert(depth.saturating_sub(1), style.clone());
            } else {
                self.local.insert(depth, style.clone());
            }
            self.active = style;
        } else if parent.is_close && self.local.remove(&depth).is_some() {
            self.reset_active(depth);
        }
        Ok(())
    }

    fn visit_word(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        let length = ctx.tree.length(id);
        let Some(width) = self.active.width() else {
            self.cursor += length;
            return Ok(());
        };
        if self.cursor + length <= width {
            self.cursor += length;
            return Ok(());
        }

        if self.needs_cut(ctx.tree.text(id), length) {
            self.cut_word(ctx, id, width)
        } else {
            self.add_new_line(ctx, id)?;
            self.cursor += length;
            Ok(())
        }
    }

    fn visit_separator(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if ctx.tree.token(id).is_newline() {
            self.fill_up(ctx, id)?;
            self.cursor = 0;
        } else {
            self.cursor += ctx.tree.length(id);
        }
        Ok(())
    }

    fn visit_eos(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.fill_up(ctx, id)
    }
}

impl FormatterVisitor for WrapVisitor {
    fn name(&self) -> &'static str {
        "wrap"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
