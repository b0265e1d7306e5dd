//! Arena-backed token tree
//!
//!     Nodes live in a single `Vec` and refer to each other by [`TokenId`]. Each node knows its
//!     parent, its previous and next sibling and, for containers, its first and last child, so
//!     insert-before/after and remove are O(1) relative to any node.
//!
//!     Removed nodes stay in the arena, detached. Ids are therefore never reused and a stale id
//!     can only ever point at a detached node, never at an unrelated one.
//!
//! Traversal Cursor
//!
//!     Every container carries its own cursor, driven by [`TokenTree::rewind`] and
//!     [`TokenTree::advance`]. The cursor sits on the node that was handed out last. Edits keep
//!     it coherent:
//!
//!         - insertions before the cursor are never visited (they are behind it);
//!         - insertions after the cursor are visited in order;
//!         - removing the node under the cursor moves the cursor to its previous sibling (or
//!           back to the start), so the walk continues with the removed node's successor.

use std::fmt;

use serde::Serialize;

use super::core::Token;
use crate::markup::error::{FormatError, FormatResult};
use crate::markup::unicode::display_width;

/// Handle of a node in a [`TokenTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Cursor {
    #[default]
    Start,
    At(TokenId),
}

#[derive(Debug, Clone)]
struct Node {
    token: Token,
    parent: Option<TokenId>,
    prev: Option<TokenId>,
    next: Option<TokenId>,
    first_child: Option<TokenId>,
    last_child: Option<TokenId>,
    child_count: usize,
    cursor: Cursor,
}

impl Node {
    fn new(token: Token) -> Self {
        Node {
            token,
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
            child_count: 0,
            cursor: Cursor::Start,
        }
    }
}

/// A message's tokens: one [`Token::FullText`] root and everything below it
#[derive(Debug, Clone)]
pub struct TokenTree {
    nodes: Vec<Node>,
    root: TokenId,
}

impl Default for TokenTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenTree {
    /// An empty tree holding only the root
    pub fn new() -> Self {
        TokenTree {
            nodes: vec![Node::new(Token::FullText)],
            root: TokenId(0),
        }
    }

    pub fn root(&self) -> TokenId {
        self.root
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.nodes[id.0].token
    }

    pub fn text(&self, id: TokenId) -> &str {
        self.token(id).text()
    }

    pub fn parent(&self, id: TokenId) -> Option<TokenId> {
        self.nodes[id.0].parent
    }

    pub fn prev_sibling(&self, id: TokenId) -> Option<TokenId> {
        self.nodes[id.0].prev
    }

    pub fn next_sibling(&self, id: TokenId) -> Option<TokenId> {
        self.nodes[id.0].next
    }

    pub fn first_child(&self, id: TokenId) -> Option<TokenId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: TokenId) -> Option<TokenId> {
        self.nodes[id.0].last_child
    }

    pub fn child_count(&self, id: TokenId) -> usize {
        self.nodes[id.0].child_count
    }

    pub fn is_attached(&self, id: TokenId) -> bool {
        self.nodes[id.0].parent.is_some()
    }

    pub fn is_first(&self, id: TokenId) -> bool {
        self.prev_sibling(id).is_none()
    }

    pub fn is_last(&self, id: TokenId) -> bool {
        self.next_sibling(id).is_none()
    }

    pub fn children(&self, id: TokenId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Display width of a token; containers sum their children
    pub fn length(&self, id: TokenId) -> usize {
        match self.token(id) {
            Token::Word(text) | Token::Separator(text) => display_width(text),
            Token::FullText => self.children(id).map(|child| self.length(child)).sum(),
            Token::FullTag(_) | Token::Tag(_) | Token::Decoration(_) | Token::Eos => 0,
        }
    }

    /// Append `token` as the last child of `parent`
    pub fn push(&mut self, parent: TokenId, token: Token) -> TokenId {
        let id = self.alloc(token);
        let last = self.nodes[parent.0].last_child;
        self.link(id, parent, last, None);
        id
    }

    /// Insert `token` as the previous sibling of `anchor`
    pub fn insert_before(&mut self, anchor: TokenId, token: Token) -> FormatResult<TokenId> {
        let parent = self.parent(anchor).ok_or(FormatError::TokenNotFound(anchor))?;
        let id = self.alloc(token);
        let prev = self.nodes[anchor.0].prev;
        self.link(id, parent, prev, Some(anchor));
        Ok(id)
    }

    /// Insert `token` as the next sibling of `anchor`
    pub fn insert_after(&mut self, anchor: TokenId, token: Token) -> FormatResult<TokenId> {
        let parent = self.parent(anchor).ok_or(FormatError::TokenNotFound(anchor))?;
        let id = self.alloc(token);
        let next = self.nodes[anchor.0].next;
        self.link(id, parent, Some(anchor), next);
        Ok(id)
    }

    /// Detach `id` from its container
    pub fn remove(&mut self, id: TokenId) -> FormatResult<()> {
        let parent = self.parent(id).ok_or(FormatError::TokenNotFound(id))?;
        let (prev, next) = (self.nodes[id.0].prev, self.nodes[id.0].next);

        match prev {
            Some(prev) => self.nodes[prev.0].next = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev = prev,
            None => self.nodes[parent.0].last_child = prev,
        }

        let container = &mut self.nodes[parent.0];
        container.child_count -= 1;
        if container.cursor == Cursor::At(id) {
            container.cursor = prev.map_or(Cursor::Start, Cursor::At);
        }

        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev = None;
        node.next = None;
        Ok(())
    }

    /// Put `token` where `old` is and detach `old`
    pub fn replace(&mut self, old: TokenId, token: Token) -> FormatResult<TokenId> {
        let parent = self.parent(old).ok_or(FormatError::TokenNotFound(old))?;
        let id = self.insert_before(old, token)?;
        let moves_cursor = self.nodes[parent.0].cursor == Cursor::At(old);
        self.remove(old)?;
        if moves_cursor {
            self.nodes[parent.0].cursor = Cursor::At(id);
        }
        Ok(id)
    }

    /// Append copies of every child of `from` (recursively) to `to`
    pub fn clone_children(&mut self, from: TokenId, to: TokenId) {
        let children: Vec<TokenId> = self.children(from).collect();
        for child in children {
            let token = self.token(child).clone();
            let copy = self.push(to, token);
            if self.first_child(child).is_some() {
                self.clone_children(child, copy);
            }
        }
    }

    /// Reset the traversal cursor of `parent` to before its first child
    pub fn rewind(&mut self, parent: TokenId) {
        self.nodes[parent.0].cursor = Cursor::Start;
    }

    /// Move the cursor of `parent` to the next child and return it
    pub fn advance(&mut self, parent: TokenId) -> Option<TokenId> {
        let next = match self.nodes[parent.0].cursor {
            Cursor::Start => self.nodes[parent.0].first_child,
            Cursor::At(current) => self.nodes[current.0].next,
        };
        if let Some(next) = next {
            self.nodes[parent.0].cursor = Cursor::At(next);
        }
        next
    }

    /// The full tag owning a sub-tag, if `id` is one
    pub fn enclosing_full_tag(&self, id: TokenId) -> Option<(TokenId, &super::FullTag)> {
        let parent = self.parent(id)?;
        self.token(parent).as_full_tag().map(|tag| (parent, tag))
    }

    fn alloc(&mut self, token: Token) -> TokenId {
        self.nodes.push(Node::new(token));
        TokenId(self.nodes.len() - 1)
    }

    fn link(&mut self, id: TokenId, parent: TokenId, prev: Option<TokenId>, next: Option<TokenId>) {
        {
            let node = &mut self.nodes[id.0];
            node.parent = Some(parent);
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        match next {
            Some(next) => self.nodes[next.0].prev = Some(id),
            None => self.nodes[parent.0].last_child = Some(id),
        }
        self.nodes[parent.0].child_count += 1;
    }
}

/// Iterator over the current children of a container
pub struct Children<'a> {
    tree: &'a TokenTree,
    next: Option<TokenId>,
}

impl Iterator for Children<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tree: &TokenTree) -> Vec<String> {
        tree.children(tree.root())
            .map(|id| tree.text(id).to_string())
            .collect()
    }

    fn sample() -> (TokenTree, Vec<TokenId>) {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let ids = ["a", "b", "c"]
            .iter()
            .map(|text| tree.push(root, Token::word(text)))
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_push_links_siblings_and_parent() {
        let (tree, ids) = sample();
        assert_eq!(tree.child_count(tree.root()), 3);
        assert_eq!(tree.parent(ids[1]), Some(tree.root()));
        assert_eq!(tree.prev_sibling(ids[1]), Some(ids[0]));
        assert_eq!(tree.next_sibling(ids[1]), Some(ids[2]));
        assert!(tree.is_first(ids[0]));
        assert!(tree.is_last(ids[2]));
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut tree, ids) = sample();
        tree.insert_before(ids[0], Token::word("x")).unwrap();
        tree.insert_after(ids[2], Token::word("y")).unwrap();
        tree.insert_after(ids[0], Token::word("z")).unwrap();
        assert_eq!(words(&tree), vec!["x", "a", "z", "b", "c", "y"]);
        assert_eq!(tree.child_count(tree.root()), 6);
    }

    #[test]
    fn test_remove_keeps_links_consistent() {
        let (mut tree, ids) = sample();
        tree.remove(ids[1]).unwrap();
        assert_eq!(words(&tree), vec!["a", "c"]);
        assert_eq!(tree.next_sibling(ids[0]), Some(ids[2]));
        assert_eq!(tree.prev_sibling(ids[2]), Some(ids[0]));
        assert!(!tree.is_attached(ids[1]));

        tree.remove(ids[0]).unwrap();
        tree.remove(ids[2]).unwrap();
        assert_eq!(tree.first_child(tree.root()), None);
        assert_eq!(tree.last_child(tree.root()), None);
        assert_eq!(tree.child_count(tree.root()), 0);
    }

    #[test]
    fn test_detached_tokens_are_reported() {
        let (mut tree, ids) = sample();
        tree.remove(ids[0]).unwrap();
        assert_eq!(tree.remove(ids[0]), Err(FormatError::TokenNotFound(ids[0])));
        assert_eq!(
            tree.insert_before(tree.root(), Token::Eos),
            Err(FormatError::TokenNotFound(tree.root()))
        );
    }

    #[test]
    fn test_replace_swaps_in_place() {
        let (mut tree, ids) = sample();
        let new = tree.replace(ids[1], Token::word("B")).unwrap();
        assert_eq!(words(&tree), vec!["a", "B", "c"]);
        assert_eq!(tree.parent(new), Some(tree.root()));
    }

    #[test]
    fn test_cursor_survives_edits_around_the_current_node() {
        let (mut tree, ids) = sample();
        let root = tree.root();
        let mut seen = Vec::new();

        tree.rewind(root);
        while let Some(id) = tree.advance(root) {
            seen.push(tree.text(id).to_string());
            if id == ids[1] {
                // split "b" into two pieces in front of it, then drop it
                tree.insert_before(id, Token::word("b1")).unwrap();
                tree.insert_before(id, Token::word("b2")).unwrap();
                tree.insert_after(id, Token::word("after")).unwrap();
                tree.remove(id).unwrap();
            }
        }

        assert_eq!(seen, vec!["a", "b", "after", "c"]);
        assert_eq!(words(&tree), vec!["a", "b1", "b2", "after", "c"]);
    }

    #[test]
    fn test_removing_the_first_node_under_the_cursor_restarts_at_its_successor() {
        let (mut tree, ids) = sample();
        let root = tree.root();
        let mut seen = Vec::new();

        tree.rewind(root);
        while let Some(id) = tree.advance(root) {
            seen.push(tree.text(id).to_string());
            if id == ids[0] {
                tree.remove(id).unwrap();
            }
        }

        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_length_sums_visible_widths() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        tree.push(root, Token::word("öüó"));
        tree.push(root, Token::separator(" "));
        tree.push(root, Token::decoration("\x1b[32m"));
        tree.push(root, Token::Eos);
        assert_eq!(tree.length(root), 4);
    }

    #[test]
    fn test_clone_children_copies_sub_tags() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let (open, tags) = super::super::FullTag::parse("<a;b=1>");
        let open = tree.push(root, Token::FullTag(open));
        for tag in tags {
            tree.push(open, Token::Tag(tag));
        }
        let (close, _) = super::super::FullTag::parse("</>");
        let close = tree.push(root, Token::FullTag(close));

        tree.clone_children(open, close);

        let names: Vec<_> = tree
            .children(close)
            .filter_map(|id| tree.token(id).as_tag().map(|tag| tag.name.clone()))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(tree.child_count(open), 2);
    }
}
