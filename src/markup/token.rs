//! Token model
//!
//!     A formatted message is represented as a tree with exactly two levels of containers:
//!
//!         FullText (root)
//!           ├─ Word / Separator / Decoration
//!           ├─ FullTag  `<a;b=1,2>`
//!           │    ├─ Tag `a`
//!           │    └─ Tag `b=1,2`
//!           └─ Eos (always last, exactly once)
//!
//!     Value types live in [core]. The arena holding them, with sibling links and traversal
//!     cursors, lives in [tree]. Debug descriptions and the tree dump are in [formatting], and
//!     [snapshot] offers a serializable nested view for tooling.
//!
//!     Lengths are display widths. Tags, full tags, the end marker and decorations have length
//!     0; words and separators measure their text.

pub mod core;
pub mod formatting;
pub mod snapshot;
pub mod tree;

pub use self::core::{FullTag, Tag, Token, TokenKind};
pub use snapshot::TokenSnapshot;
pub use tree::{Children, TokenId, TokenTree};
