//! S-expression values for zettel documents.
//!
//! This crate provides the value world the document tree is encoded in:
//! nil, immutable cons cells, strings, 64-bit integers, and interned
//! symbols, together with a list builder, list iteration, association-list
//! lookup, a printer, and a reader for the printed notation.
//!
//! # Notation
//!
//! ```text
//! (BLOCK
//!   (PARA (TEXT "Hello") (SOFT) (FORMAT-EMPH () (TEXT "world")))
//!   (HEADING 2 (("class" . "title")) "slug" "fragment" (TEXT "Title")))
//! ```

mod reader;
mod sexpr;

pub use reader::{ReadError, read, read_all};
pub use sexpr::{ListBuilder, Object, Pair, Pairs, Symbol, Values, text_value};

#[cfg(test)]
mod tests;
