//! The zettel document tree.
//!
//! A document is a tree of block and inline nodes. Each node is stored as an
//! s-expression list tagged with a kind symbol (see [`symbols`]). This crate
//! provides:
//!
//! - builders and accessors for that layout ([`build`]),
//! - attribute bags ([`Attributes`]) and BLOB payload encoding ([`blob`]),
//! - a typed tree ([`Node`]) with a codec from and to s-expressions,
//! - structural validation ([`validate`]),
//! - a tree walker with pure, destructive and side-effecting flavours
//!   ([`walk`], [`walk_bang`], [`walk_it`]),
//! - an input cursor and an HTML entity scanner for source text.
//!
//! # Example
//!
//! ```
//! use rhizome_zettel_ast::{Env, Node, Visitor, walk};
//! use rhizome_zettel_sx::read;
//!
//! struct Upper;
//!
//! impl Visitor for Upper {
//!     fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
//!         match node {
//!             Node::Text(text) => Some(Node::Text(text.to_uppercase())),
//!             node => Some(node),
//!         }
//!     }
//! }
//!
//! let doc = read(r#"(PARA (TEXT "hi") (SOFT) (TEXT "there"))"#).unwrap();
//! let node = Node::from_sx(&doc).unwrap();
//! let node = walk(&mut Upper, &node, &Env::root()).unwrap();
//! assert_eq!(node.to_sx().to_string(), r#"(PARA (TEXT "HI") (SOFT) (TEXT "THERE"))"#);
//! ```

pub mod blob;
pub mod build;
pub mod symbols;

mod attrs;
mod codec;
mod entity;
mod input;
mod node;
mod validation;
mod walk;

pub use attrs::{Attributes, DEFAULT_ATTRIBUTE, get_attributes};
pub use blob::{decode_binary, encode_binary};
pub use entity::scan_entity;
pub use input::{Input, is_space};
pub use node::{
    DescriptionEntry, EmbedRef, FormatKind, ListKind, LiteralKind, Node, Reference, RegionKind,
    VerbatimKind,
};
pub use validation::{ValidationError, validate};
pub use walk::{Env, Visitor, VisitorIt, walk, walk_bang, walk_it, walk_it_list, walk_object};
