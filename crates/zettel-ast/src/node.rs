//! Typed document tree.
//!
//! [`Node`] has one variant per node kind. Kinds that only differ in their
//! tag (regions, lists, verbatims, literals, formats) share a variant and
//! carry a sub-kind. Every attribute slot holds an [`Attributes`] value.

use crate::attrs::Attributes;
use crate::blob::{decode_binary, encode_binary};
use crate::symbols;
use rhizome_zettel_sx::{Object, Symbol};
use serde::Serialize;

macro_rules! sub_kind {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $sym:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The symbol tagging nodes of this kind.
            pub fn symbol(self) -> Symbol {
                match self {
                    $($name::$variant => symbols::$sym.clone()),*
                }
            }

            /// Maps a node head back to the kind, if it belongs to this family.
            pub fn from_symbol(sym: &Symbol) -> Option<Self> {
                $(
                    if sym == &*symbols::$sym {
                        return Some($name::$variant);
                    }
                )*
                None
            }
        }
    };
}

sub_kind! {
    /// Region blocks.
    RegionKind {
        Block => REGION_BLOCK,
        Quote => REGION_QUOTE,
        Verse => REGION_VERSE,
    }
}

sub_kind! {
    /// List blocks.
    ListKind {
        Ordered => LIST_ORDERED,
        Unordered => LIST_UNORDERED,
        Quote => LIST_QUOTE,
    }
}

sub_kind! {
    /// Verbatim blocks.
    VerbatimKind {
        Code => VERBATIM_CODE,
        Comment => VERBATIM_COMMENT,
        Eval => VERBATIM_EVAL,
        Html => VERBATIM_HTML,
        Math => VERBATIM_MATH,
        Zettel => VERBATIM_ZETTEL,
    }
}

sub_kind! {
    /// Inline literals.
    LiteralKind {
        Code => LITERAL_CODE,
        Comment => LITERAL_COMMENT,
        Input => LITERAL_INPUT,
        Math => LITERAL_MATH,
        Output => LITERAL_OUTPUT,
    }
}

sub_kind! {
    /// Inline formatting.
    FormatKind {
        Emph => FORMAT_EMPH,
        Delete => FORMAT_DELETE,
        Insert => FORMAT_INSERT,
        Mark => FORMAT_MARK,
        Quote => FORMAT_QUOTE,
        Span => FORMAT_SPAN,
        Sub => FORMAT_SUB,
        Super => FORMAT_SUPER,
        Strong => FORMAT_STRONG,
    }
}

/// A link target: a reference-state (or other) symbol plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub kind: Symbol,
    pub value: String,
}

impl Reference {
    pub fn new(kind: &Symbol, value: impl Into<String>) -> Self {
        Self {
            kind: kind.clone(),
            value: value.into(),
        }
    }
}

/// Target of an embed: usually a reference, but any atom is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EmbedRef {
    Reference(Reference),
    Raw(Object),
}

/// One term of a description list with its values.
///
/// `values` is `None` for a trailing term without values, or when the
/// values slot held nil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionEntry {
    pub term: Vec<Node>,
    pub values: Option<Node>,
}

/// A node of a zettel document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    Block(Vec<Node>),
    Inline(Vec<Node>),
    Para(Vec<Node>),
    Heading {
        level: i64,
        attrs: Attributes,
        slug: String,
        fragment: String,
        inlines: Vec<Node>,
    },
    Region {
        kind: RegionKind,
        attrs: Attributes,
        blocks: Vec<Node>,
        inlines: Vec<Node>,
    },
    List {
        kind: ListKind,
        attrs: Attributes,
        items: Vec<Node>,
    },
    Description {
        attrs: Attributes,
        entries: Vec<DescriptionEntry>,
    },
    Table {
        attrs: Attributes,
        header: Vec<Node>,
        rows: Vec<Vec<Node>>,
    },
    Cell {
        attrs: Attributes,
        inlines: Vec<Node>,
    },
    Transclude {
        attrs: Attributes,
        reference: Reference,
        inlines: Vec<Node>,
    },
    /// Block BLOB. `content` is the encoded payload, see [`crate::blob`].
    Blob {
        attrs: Attributes,
        description: Vec<Node>,
        syntax: String,
        content: String,
    },
    Thematic {
        attrs: Attributes,
    },
    Verbatim {
        kind: VerbatimKind,
        attrs: Attributes,
        content: String,
    },
    Text(String),
    Soft,
    Hard,
    Literal {
        kind: LiteralKind,
        attrs: Attributes,
        content: String,
    },
    Link {
        attrs: Attributes,
        reference: Reference,
        inlines: Vec<Node>,
    },
    Embed {
        attrs: Attributes,
        reference: EmbedRef,
        syntax: String,
        inlines: Vec<Node>,
    },
    /// Inline BLOB. Its inlines are never walked.
    EmbedBlob {
        attrs: Attributes,
        syntax: String,
        content: String,
        inlines: Vec<Node>,
    },
    Cite {
        attrs: Attributes,
        key: String,
        inlines: Vec<Node>,
    },
    Endnote {
        attrs: Attributes,
        inlines: Vec<Node>,
    },
    Mark {
        mark: String,
        slug: String,
        fragment: String,
        inlines: Vec<Node>,
    },
    Format {
        kind: FormatKind,
        attrs: Attributes,
        inlines: Vec<Node>,
    },
    /// Placeholder whose children replace it in the parent list.
    Splice(Vec<Node>),
    /// A value whose head is not a known node kind, kept as it is.
    Unknown(Object),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Builds a block BLOB, encoding `data` according to `syntax`.
    pub fn blob(attrs: Attributes, description: Vec<Node>, syntax: &str, data: &[u8]) -> Self {
        Node::Blob {
            attrs,
            description,
            syntax: syntax.to_string(),
            content: encode_binary(syntax, data),
        }
    }

    /// Builds an inline BLOB, encoding `data` according to `syntax`.
    pub fn embed_blob(attrs: Attributes, syntax: &str, data: &[u8], inlines: Vec<Node>) -> Self {
        Node::EmbedBlob {
            attrs,
            syntax: syntax.to_string(),
            content: encode_binary(syntax, data),
            inlines,
        }
    }

    /// Decoded payload of a BLOB or inline BLOB.
    pub fn blob_data(&self) -> Option<Vec<u8>> {
        match self {
            Node::Blob {
                syntax, content, ..
            }
            | Node::EmbedBlob {
                syntax, content, ..
            } => Some(decode_binary(syntax, content)),
            _ => None,
        }
    }

    /// The head symbol of the node. `None` for an unknown value without a
    /// symbol head.
    pub fn symbol(&self) -> Option<Symbol> {
        let sym = match self {
            Node::Block(_) => &symbols::BLOCK,
            Node::Inline(_) => &symbols::INLINE,
            Node::Para(_) => &symbols::PARA,
            Node::Heading { .. } => &symbols::HEADING,
            Node::Region { kind, .. } => return Some(kind.symbol()),
            Node::List { kind, .. } => return Some(kind.symbol()),
            Node::Description { .. } => &symbols::DESCRIPTION,
            Node::Table { .. } => &symbols::TABLE,
            Node::Cell { .. } => &symbols::CELL,
            Node::Transclude { .. } => &symbols::TRANSCLUDE,
            Node::Blob { .. } => &symbols::BLOB,
            Node::Thematic { .. } => &symbols::THEMATIC,
            Node::Verbatim { kind, .. } => return Some(kind.symbol()),
            Node::Text(_) => &symbols::TEXT,
            Node::Soft => &symbols::SOFT,
            Node::Hard => &symbols::HARD,
            Node::Literal { kind, .. } => return Some(kind.symbol()),
            Node::Link { .. } => &symbols::LINK,
            Node::Embed { .. } => &symbols::EMBED,
            Node::EmbedBlob { .. } => &symbols::EMBED_BLOB,
            Node::Cite { .. } => &symbols::CITE,
            Node::Endnote { .. } => &symbols::ENDNOTE,
            Node::Mark { .. } => &symbols::MARK,
            Node::Format { kind, .. } => return Some(kind.symbol()),
            Node::Splice(_) => &symbols::SPECIAL_SPLICE,
            Node::Unknown(obj) => return obj.car().as_symbol().cloned(),
        };
        Some((**sym).clone())
    }

    /// The attributes of the node, if its kind has an attribute slot.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Node::Heading { attrs, .. }
            | Node::Region { attrs, .. }
            | Node::List { attrs, .. }
            | Node::Description { attrs, .. }
            | Node::Table { attrs, .. }
            | Node::Cell { attrs, .. }
            | Node::Transclude { attrs, .. }
            | Node::Blob { attrs, .. }
            | Node::Thematic { attrs }
            | Node::Verbatim { attrs, .. }
            | Node::Literal { attrs, .. }
            | Node::Link { attrs, .. }
            | Node::Embed { attrs, .. }
            | Node::EmbedBlob { attrs, .. }
            | Node::Cite { attrs, .. }
            | Node::Endnote { attrs, .. }
            | Node::Format { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Returns true for kinds the walker does not descend into. An unknown
    /// node is a leaf unless its head is a known kind.
    pub fn is_leaf(&self) -> bool {
        match self {
            Node::Unknown(obj) => !obj
                .car()
                .as_symbol()
                .is_some_and(symbols::is_node_kind),
            node => matches!(
                node,
                Node::Text(_)
                    | Node::Soft
                    | Node::Hard
                    | Node::Thematic { .. }
                    | Node::Verbatim { .. }
                    | Node::Literal { .. }
                    | Node::EmbedBlob { .. }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_kind_symbols() {
        for kind in FormatKind::ALL {
            assert_eq!(FormatKind::from_symbol(&kind.symbol()), Some(*kind));
        }
        for kind in VerbatimKind::ALL {
            assert_eq!(VerbatimKind::from_symbol(&kind.symbol()), Some(*kind));
        }
        assert_eq!(ListKind::Quote.symbol().name(), "QUOTATION");
        assert_eq!(RegionKind::from_symbol(&symbols::LIST_ORDERED), None);
        assert_eq!(LiteralKind::Input.symbol().name(), "LITERAL-INPUT");
    }

    #[test]
    fn test_node_symbol() {
        assert_eq!(Node::text("a").symbol(), Some(symbols::TEXT.clone()));
        assert_eq!(
            Node::Splice(vec![]).symbol().map(|s| s.name().to_string()),
            Some("SPECIAL-SPLICE".to_string())
        );
        assert_eq!(Node::Unknown(Object::string("x")).symbol(), None);
        assert_eq!(
            Node::Unknown(Object::list(vec![Object::symbol("FUTURE")])).symbol(),
            Some(Symbol::intern("FUTURE"))
        );
    }

    #[test]
    fn test_blob_data() {
        let node = Node::blob(Attributes::new(), vec![], "png", &[0, 1, 2, 254, 255]);
        assert_eq!(node.blob_data(), Some(vec![0, 1, 2, 254, 255]));
        assert!(!node.is_leaf());
        assert_eq!(Node::Soft.blob_data(), None);
    }
}
