//! Style pass: turns style tags into ANSI decorations
//!
//!     Recognized sub-tags of a start tag:
//!
//!         <error> <info> ...        a named style from the registry (case-insensitive)
//!         <fg=color> <bg=color>     inline colors
//!         <options=bold,underscore> inline options
//!
//!     Sub-tags of one full tag combine into a single style. Styles do not nest in the
//!     terminal, so opening a style closes the active one first and closing a style restarts
//!     the one below it. Newlines close and reopen the active style so every line is
//!     self-contained. At the end of the stream the active style is closed.
//!
//!     Unknown tags and invalid colors or options are left alone (they only produce a debug
//!     log line), so user text that happens to look like a tag never breaks formatting.

use std::any::Any;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use super::{FormatterVisitor, VisitContext, Visitor};
use crate::markup::error::{FormatError, FormatResult};
use crate::markup::style::{Color, SharedStyle, Style, StyleOption, TerminalStyle};
use crate::markup::token::{Tag, TokenId};

/// Styles available by name to every formatter
pub fn default_styles() -> BTreeMap<String, SharedStyle> {
    let mut styles = BTreeMap::new();
    styles.insert(
        "error".to_string(),
        TerminalStyle::new()
            .with_foreground(Color::White)
            .with_background(Color::Red),
    );
    styles.insert(
        "info".to_string(),
        TerminalStyle::new().with_foreground(Color::Green),
    );
    styles.insert(
        "comment".to_string(),
        TerminalStyle::new().with_foreground(Color::Yellow),
    );
    styles.insert(
        "question".to_string(),
        TerminalStyle::new()
            .with_foreground(Color::Black)
            .with_background(Color::Cyan),
    );
    styles
        .into_iter()
        .map(|(name, style)| (name, Rc::new(style) as SharedStyle))
        .collect()
}

/// Named style plus inline attributes given in the same tag (`<info;options=bold>`)
#[derive(Debug)]
struct Layered {
    named: SharedStyle,
    inline: TerminalStyle,
}

impl Style for Layered {
    fn start(&self) -> String {
        format!("{}{}", self.named.start(), self.inline.start())
    }

    fn close(&self) -> String {
        format!("{}{}", self.inline.close(), self.named.close())
    }
}

/// Opened styles with the tag depth that opened them
#[derive(Debug, Clone, Default)]
struct StyleStack {
    entries: Vec<(usize, SharedStyle)>,
}

impl StyleStack {
    fn push(&mut self, depth: usize, style: SharedStyle) {
        self.entries.retain(|(opened_at, _)| *opened_at < depth);
        self.entries.push((depth, style));
    }

    fn current(&self) -> Option<&SharedStyle> {
        self.entries.last().map(|(_, style)| style)
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the styles opened at `depth` or deeper
    fn pop_depth(&mut self, depth: usize) -> bool {
        match self.entries.iter().position(|(opened_at, _)| *opened_at >= depth) {
            Some(index) => {
                self.entries.truncate(index);
                true
            }
            None => false,
        }
    }

    /// Drop the topmost entry rendering like `style`, and everything above it
    fn pop_by_style(&mut self, style: &dyn Style) -> bool {
        let (start, close) = (style.start(), style.close());
        let found = self
            .entries
            .iter()
            .rposition(|(_, entry)| entry.start() == start && entry.close() == close);
        match found {
            Some(index) => {
                self.entries.truncate(index);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone)]
pub struct StyleVisitor {
    styles: BTreeMap<String, SharedStyle>,
    stack: StyleStack,
    /// Named style found among the sub-tags of the start tag being visited
    pending_named: Option<SharedStyle>,
    /// Inline `fg`, `bg` and `options` of the start tag being visited
    pending_inline: Option<TerminalStyle>,
    /// Set when a close tag ended a style and the one below must restart
    reopen: bool,
}

impl Default for StyleVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleVisitor {
    pub fn new() -> Self {
        StyleVisitor {
            styles: default_styles(),
            stack: StyleStack::default(),
            pending_named: None,
            pending_inline: None,
            reopen: false,
        }
    }

    /// Registry seeded with the defaults, then `styles` on top
    pub fn with_styles(styles: impl IntoIterator<Item = (String, SharedStyle)>) -> Self {
        let mut visitor = Self::new();
        for (name, style) in styles {
            visitor.set_shared_style(&name, style);
        }
        visitor
    }

    pub fn set_style(&mut self, name: &str, style: impl Style + 'static) {
        self.set_shared_style(name, Rc::new(style));
    }

    pub fn set_shared_style(&mut self, name: &str, style: SharedStyle) {
        self.styles.insert(name.to_lowercase(), style);
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(&name.to_lowercase())
    }

    pub fn style(&self, name: &str) -> FormatResult<&dyn Style> {
        self.shared_style(name).map(|style| style.as_ref())
    }

    fn shared_style(&self, name: &str) -> FormatResult<&SharedStyle> {
        self.styles
            .get(&name.to_lowercase())
            .ok_or_else(|| FormatError::UnknownStyle(name.to_string()))
    }

    fn pending_mut(&mut self) -> &mut TerminalStyle {
        self.pending_inline.get_or_insert_with(TerminalStyle::new)
    }

    /// The style opened by the start tag just visited, if any
    fn take_pending(&mut self) -> Option<SharedStyle> {
        match (self.pending_named.take(), self.pending_inline.take()) {
            (Some(named), Some(inline)) => Some(Rc::new(Layered { named, inline }) as SharedStyle),
            (Some(named), None) => Some(named),
            (None, Some(inline)) => Some(Rc::new(inline) as SharedStyle),
            (None, None) => None,
        }
    }

    fn apply_start_tag(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "fg" | "bg" => match tag.value.parse::<Color>() {
                Ok(color) if tag.name == "fg" => self.pending_mut().set_foreground(Some(color)),
                Ok(color) => self.pending_mut().set_background(Some(color)),
                Err(err) => debug!(%err, tag = tag.source.as_str(), "ignoring style tag"),
            },
            "options" => {
                let parsed: Result<Vec<StyleOption>, _> =
                    tag.values.iter().map(|value| value.parse()).collect();
                match parsed {
                    Ok(options) => self.pending_mut().set_options(options),
                    Err(err) => debug!(%err, tag = tag.source.as_str(), "ignoring style tag"),
                }
            }
            name => {
                if let Ok(style) = self.shared_style(name) {
                    self.pending_named = Some(Rc::clone(style));
                }
            }
        }
    }
}

impl Visitor for StyleVisitor {
    fn visit_full_text(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        self.stack.clear();
        self.pending_named = None;
        self.pending_inline = None;
        self.reopen = false;
        super::walk_full_text(self, ctx, id)
    }

    fn visit_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        let Some((parent_id, parent)) = ctx.tree.enclosing_full_tag(id) else {
            return Ok(());
        };
        if parent.is_self_closed() {
            return Ok(());
        }
        let is_start = parent.is_start;
        let Some(tag) = ctx.tree.token(id).as_tag() else {
            return Ok(());
        };

        if is_start {
            self.apply_start_tag(tag);
            return Ok(());
        }

        let Ok(style) = self.shared_style(&tag.name) else {
            return Ok(());
        };
        let style = Rc::clone(style);
        let top = self.stack.current().cloned();
        // Only the first pop of a close tag has a style open in the terminal
        if self.stack.pop_by_style(style.as_ref()) && !std::mem::replace(&mut self.reopen, true) {
            if let Some(top) = top {
                ctx.decorate_before(parent_id, top.close())?;
            }
        }
        Ok(())
    }

    fn leave_full_tag(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if let Some(style) = self.take_pending() {
            if let Some(previous) = self.stack.current() {
                ctx.decorate_before(id, previous.close())?;
            }
            ctx.decorate_after(id, style.start())?;
            self.stack.push(ctx.depth(), style);
        }

        let closes = ctx
            .tree
            .token(id)
            .as_full_tag()
            .is_some_and(|tag| tag.is_close && !tag.is_self_closed());
        if closes {
            let top = self.stack.current().cloned();
            if self.stack.pop_depth(ctx.depth()) && !std::mem::replace(&mut self.reopen, true) {
                if let Some(top) = top {
                    ctx.decorate_before(id, top.close())?;
                }
            }
            if std::mem::take(&mut self.reopen) {
                if let Some(current) = self.stack.current() {
                    ctx.decorate_after(id, current.start())?;
                }
            }
        }
        Ok(())
    }

    fn visit_separator(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if !ctx.tree.token(id).is_newline() {
            return Ok(());
        }
        if let Some(current) = self.stack.current() {
            ctx.decorate_before(id, current.close())?;
            ctx.decorate_after(id, current.start())?;
        }
        Ok(())
    }

    fn visit_eos(&mut self, ctx: &mut VisitContext<'_>, id: TokenId) -> FormatResult<()> {
        if let Some(current) = self.stack.current() {
            ctx.decorate_before(id, current.close())?;
        }
        self.stack.clear();
        Ok(())
    }
}

impl FormatterVisitor for StyleVisitor {
    fn name(&self) -> &'static str {
        "style"
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
