//! Conversion between [`Node`] and the s-expression layout.

use crate::attrs::get_attributes;
use crate::build::*;
use crate::node::{
    DescriptionEntry, EmbedRef, FormatKind, ListKind, LiteralKind, Node, Reference, RegionKind,
    VerbatimKind,
};
use crate::symbols;
use rhizome_zettel_sx::{ListBuilder, Object, Symbol};

impl Reference {
    /// Reads `(KIND "value")` or `(KIND . "value")`.
    pub fn from_sx(obj: &Object) -> Option<Reference> {
        let (kind, value) = reference_parts(obj)?;
        Some(Reference { kind, value })
    }

    pub fn to_sx(&self) -> Object {
        make_reference(&self.kind, &self.value)
    }
}

impl EmbedRef {
    fn from_sx(obj: &Object) -> EmbedRef {
        match Reference::from_sx(obj) {
            Some(reference) if obj.is_pair() => EmbedRef::Reference(reference),
            _ => EmbedRef::Raw(obj.clone()),
        }
    }

    fn to_sx(&self) -> Object {
        match self {
            EmbedRef::Reference(reference) => reference.to_sx(),
            EmbedRef::Raw(obj) => obj.clone(),
        }
    }
}

fn nodes(list: &Object) -> Vec<Node> {
    list.iter().filter_map(Node::from_sx).collect()
}

fn list_of(nodes: &[Node]) -> Object {
    nodes.iter().map(Node::to_sx).collect()
}

fn description_entries(list: &Object) -> Vec<DescriptionEntry> {
    let mut entries = Vec::new();
    let mut items = list.iter();
    while let Some(term) = items.next() {
        let values = items.next().and_then(Node::from_sx);
        entries.push(DescriptionEntry {
            term: nodes(term),
            values,
        });
    }
    entries
}

// A missing values slot in the middle is kept as nil so that the terms stay
// on even positions.
fn description_list(entries: &[DescriptionEntry]) -> Object {
    let mut lb = ListBuilder::new();
    for (i, entry) in entries.iter().enumerate() {
        lb.add(list_of(&entry.term));
        match &entry.values {
            Some(values) => {
                lb.add(values.to_sx());
            }
            None if i + 1 < entries.len() => {
                lb.add(Object::Nil);
            }
            None => {}
        }
    }
    lb.list()
}

fn decode_known(sym: &Symbol, obj: &Object) -> Option<Node> {
    if let Some(kind) = RegionKind::from_symbol(sym) {
        let (_, attrs, blocks, inlines) = region_parts(obj)?;
        return Some(Node::Region {
            kind,
            attrs: get_attributes(&attrs),
            blocks: nodes(&blocks),
            inlines: nodes(&inlines),
        });
    }
    if let Some(kind) = ListKind::from_symbol(sym) {
        let (_, attrs, items) = list_parts(obj)?;
        return Some(Node::List {
            kind,
            attrs: get_attributes(&attrs),
            items: nodes(&items),
        });
    }
    if let Some(kind) = VerbatimKind::from_symbol(sym) {
        let (_, attrs, content) = verbatim_parts(obj)?;
        return Some(Node::Verbatim {
            kind,
            attrs: get_attributes(&attrs),
            content,
        });
    }
    if let Some(kind) = LiteralKind::from_symbol(sym) {
        let (_, attrs, content) = literal_parts(obj)?;
        return Some(Node::Literal {
            kind,
            attrs: get_attributes(&attrs),
            content,
        });
    }
    if let Some(kind) = FormatKind::from_symbol(sym) {
        let (_, attrs, inlines) = format_parts(obj)?;
        return Some(Node::Format {
            kind,
            attrs: get_attributes(&attrs),
            inlines: nodes(&inlines),
        });
    }

    let node = if sym == &*symbols::BLOCK {
        Node::Block(nodes(obj.tail()))
    } else if sym == &*symbols::INLINE {
        Node::Inline(nodes(obj.tail()))
    } else if sym == &*symbols::PARA {
        Node::Para(nodes(obj.tail()))
    } else if sym == &*symbols::SPECIAL_SPLICE {
        Node::Splice(nodes(obj.tail()))
    } else if sym == &*symbols::TEXT {
        Node::Text(obj.nth(1).as_str()?.to_string())
    } else if sym == &*symbols::SOFT {
        Node::Soft
    } else if sym == &*symbols::HARD {
        Node::Hard
    } else if sym == &*symbols::THEMATIC {
        Node::Thematic {
            attrs: get_attributes(&get_thematic(obj)),
        }
    } else if sym == &*symbols::HEADING {
        let (level, attrs, inlines, slug, fragment) = heading_parts(obj)?;
        Node::Heading {
            level,
            attrs: get_attributes(&attrs),
            slug,
            fragment,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::DESCRIPTION {
        let (attrs, entries) = description_parts(obj)?;
        Node::Description {
            attrs: get_attributes(&attrs),
            entries: description_entries(&entries),
        }
    } else if sym == &*symbols::TABLE {
        let (attrs, header, rows) = table_parts(obj)?;
        Node::Table {
            attrs: get_attributes(&attrs),
            header: nodes(&header),
            rows: rows.iter().map(nodes).collect(),
        }
    } else if sym == &*symbols::CELL {
        let (attrs, inlines) = cell_parts(obj)?;
        Node::Cell {
            attrs: get_attributes(&attrs),
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::TRANSCLUDE {
        let (attrs, reference, inlines) = transclusion_parts(obj)?;
        Node::Transclude {
            attrs: get_attributes(&attrs),
            reference: Reference::from_sx(&reference)?,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::BLOB {
        let (attrs, syntax, content, description) = blob_parts(obj)?;
        Node::Blob {
            attrs: get_attributes(&attrs),
            description: nodes(&description),
            syntax,
            content,
        }
    } else if sym == &*symbols::LINK {
        let (attrs, reference, inlines) = link_parts(obj)?;
        Node::Link {
            attrs: get_attributes(&attrs),
            reference: Reference::from_sx(&reference)?,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::EMBED {
        let (attrs, reference, syntax, inlines) = embed_parts(obj)?;
        Node::Embed {
            attrs: get_attributes(&attrs),
            reference: EmbedRef::from_sx(&reference),
            syntax,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::EMBED_BLOB {
        let (attrs, syntax, content, inlines) = embed_blob_parts(obj)?;
        Node::EmbedBlob {
            attrs: get_attributes(&attrs),
            syntax,
            content,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::CITE {
        let (attrs, key, inlines) = cite_parts(obj)?;
        Node::Cite {
            attrs: get_attributes(&attrs),
            key,
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::ENDNOTE {
        let (attrs, inlines) = endnote_parts(obj)?;
        Node::Endnote {
            attrs: get_attributes(&attrs),
            inlines: nodes(&inlines),
        }
    } else if sym == &*symbols::MARK {
        let (mark, slug, fragment, inlines) = mark_parts(obj)?;
        Node::Mark {
            mark,
            slug,
            fragment,
            inlines: nodes(&inlines),
        }
    } else {
        return None;
    };
    Some(node)
}

impl Node {
    /// Decodes an s-expression into a typed node.
    ///
    /// Returns `None` only for nil. Values with an unknown head, and known
    /// kinds whose fixed prefix is malformed, become [`Node::Unknown`] and are
    /// encoded back unchanged. Nil elements of child lists are dropped.
    pub fn from_sx(obj: &Object) -> Option<Node> {
        if obj.is_nil() {
            return None;
        }
        let Some(sym) = obj.car().as_symbol() else {
            return Some(Node::Unknown(obj.clone()));
        };
        match decode_known(sym, obj) {
            Some(node) => Some(node),
            None => {
                if symbols::is_node_kind(sym) {
                    tracing::debug!(node = %obj, "malformed node kept as unknown");
                } else {
                    tracing::trace!(kind = %sym, "unknown node kind");
                }
                Some(Node::Unknown(obj.clone()))
            }
        }
    }

    /// Encodes the node in its canonical s-expression layout.
    pub fn to_sx(&self) -> Object {
        match self {
            Node::Block(children) => make_block_list(list_of(children)),
            Node::Inline(children) => make_inline_list(list_of(children)),
            Node::Para(children) => make_para_list(list_of(children)),
            Node::Heading {
                level,
                attrs,
                slug,
                fragment,
                inlines,
            } => make_heading(*level, attrs.as_assoc(), list_of(inlines), slug, fragment),
            Node::Region {
                kind,
                attrs,
                blocks,
                inlines,
            } => make_region(*kind, attrs.as_assoc(), list_of(blocks), list_of(inlines)),
            Node::List { kind, attrs, items } => make_list(*kind, attrs.as_assoc(), list_of(items)),
            Node::Description { attrs, entries } => {
                make_description(attrs.as_assoc(), description_list(entries))
            }
            Node::Table {
                attrs,
                header,
                rows,
            } => make_table(
                attrs.as_assoc(),
                list_of(header),
                rows.iter().map(|row| list_of(row)).collect(),
            ),
            Node::Cell { attrs, inlines } => make_cell(attrs.as_assoc(), list_of(inlines)),
            Node::Transclude {
                attrs,
                reference,
                inlines,
            } => make_transclusion(
                attrs.as_assoc(),
                reference.to_sx(),
                Some(list_of(inlines)),
            ),
            Node::Blob {
                attrs,
                description,
                syntax,
                content,
            } => make_blob_raw(attrs.as_assoc(), syntax, content, list_of(description)),
            Node::Thematic { attrs } => make_thematic(attrs.as_assoc()),
            Node::Verbatim {
                kind,
                attrs,
                content,
            } => make_verbatim(*kind, attrs.as_assoc(), content),
            Node::Text(text) => make_text(text),
            Node::Soft => make_soft(),
            Node::Hard => make_hard(),
            Node::Literal {
                kind,
                attrs,
                content,
            } => make_literal(*kind, attrs.as_assoc(), content),
            Node::Link {
                attrs,
                reference,
                inlines,
            } => make_link(attrs.as_assoc(), reference.to_sx(), list_of(inlines)),
            Node::Embed {
                attrs,
                reference,
                syntax,
                inlines,
            } => make_embed(attrs.as_assoc(), reference.to_sx(), syntax, list_of(inlines)),
            Node::EmbedBlob {
                attrs,
                syntax,
                content,
                inlines,
            } => make_embed_blob_raw(attrs.as_assoc(), syntax, content, list_of(inlines)),
            Node::Cite {
                attrs,
                key,
                inlines,
            } => make_cite(attrs.as_assoc(), key, list_of(inlines)),
            Node::Endnote { attrs, inlines } => make_endnote(attrs.as_assoc(), list_of(inlines)),
            Node::Mark {
                mark,
                slug,
                fragment,
                inlines,
            } => make_mark(mark, slug, fragment, list_of(inlines)),
            Node::Format {
                kind,
                attrs,
                inlines,
            } => make_format(*kind, attrs.as_assoc(), list_of(inlines)),
            Node::Splice(children) => Object::cons(&*symbols::SPECIAL_SPLICE, list_of(children)),
            Node::Unknown(obj) => obj.clone(),
        }
    }
}
