//! Hyperlink pass: `<href=URL>text</>` becomes an OSC 8 hyperlink
//!
//!     ESC ] 8 ; ; URL ESC \   text   ESC ] 8 ; ; ESC \
//!
//!     Every opened link gets exactly one terminator: at its `</href>` (or `</>`), at any other
//!     close tag that ends the tag holding it, or at the end of the stream. Terminals known to
//!     mangle OSC 8 sequences get the plain text instead.

use std::any::Any;

use super::{walk_full_text, FormatterVisitor, VisitContext, Visitor};
use crate::markup::error::FormatResult;
use crate::markup::terminal::supports_hyperlinks;
use crate::markup::token::{TokenId, TokenTree};

pub const HREF_START: &str = "\x1b]8;;";
pub const HREF_CLOSE: &str = "\x1b\\";

/// Whether hyperlink sequences are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HyperlinkSupport {
    /// Ask the environment on every run
    #[default]
    Detect,
    Always,
    Never,
}

impl HyperlinkSupport {
    pub fn enabled(self) -> bool {
        match self {
            HyperlinkSupport::Detect => supports_hyperlinks(),
            HyperlinkSupport::Always => true,
            HyperlinkSupport::Never => false,
        }
    }
}

fn link_end() -> String {
    format!("{}{}", HREF_START, HREF_CLOSE)
}

#[derive(Debug, Clone, Default)]
pub struct HrefVisitor {
    support: HyperlinkSupport,
    /// Links started and not terminated yet
    open_links: usize,
}

impl HrefVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_support(support: HyperlinkSupport) -> Self {
        HrefVisitor {
            support,
            open_links: 0,
        }
    }

    pub fn support(&self) -> HyperlinkSupport {
        self.support
    }

    pub fn set_support(&mut self, support: HyperlinkSupport) {
        self.support = support;
    }
}

fn is_href(tree: &TokenTree, id: TokenId) -> bool {
    tree.token(id).as_tag().is_some_and(|tag| tag.name == "href")
}

impl HrefVisitor {
    fn end_link(&mut self, ctx: &mut VisitContext<'_>, anchor: TokenId) -> FormatResult<()> {
        if self.open_links == 0 {
            return Ok(());
        }
        self.open_links -= 1;
        ctx.decorate_before(anchor, link_end())
    }
}

impl Visitor for HrefVisitor {
    fn visit_full_text(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.open_links = 0;
        if self.support.enabled() {
            walk_full_text(self, ctx, id)
        } else {
            Ok(())
        }
    }

    fn visit_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if !is_href(ctx.tree, id) {
            return Ok(());
        }
        let Some((parent_id, parent)) = ctx.tree.enclosing_full_tag(id) else {
            return Ok(());
        };
        if parent.is_self_closed() {
            return Ok(());
        }
        if parent.is_start {
            let values = ctx.tree.token(id).as_tag().map(|tag| tag.values.join(","));
            let link = format!("{}{}{}", HREF_START, values.unwrap_or_default(), HREF_CLOSE);
            self.open_links += 1;
            ctx.decorate_after(parent_id, link)
        } else {
            self.end_link(ctx, parent_id)
        }
    }

    fn leave_full_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        let ends_link = {
            let tree: &TokenTree = ctx.tree;
            let closes = tree
                .token(id)
                .as_full_tag()
                .is_some_and(|tag| tag.is_close && !tag.is_start);
            // A close tag naming something else still ends the innermost tag and its link
            closes
                && !tree.children(id).any(|child| is_href(tree, child))
                && ctx
                    .innermost_open_tag()
                    .is_some_and(|open| tree.children(open).any(|child| is_href(tree, child)))
        };
        if ends_link {
            self.end_link(ctx, id)?;
        }
        Ok(())
    }

    fn visit_eos(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        while self.open_links > 0 {
            self.end_link(ctx, id)?;
        }
        Ok(())
    }
}

impl FormatterVisitor for HrefVisitor {
    fn name(&self) -> &'static str {
        "href"
    }

    fn is_decorator(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
