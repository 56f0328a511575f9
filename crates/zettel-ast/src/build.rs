//! Constructors and accessors for nodes in their s-expression layout.
//!
//! Every `make_*` function is total. Every `get_*` function checks the head
//! and the fixed prefix of the node; on any mismatch it returns empty values
//! (`0`, nil, `""`, `None`) instead of failing.

use crate::blob::{decode_binary, encode_binary};
use crate::node::{FormatKind, ListKind, LiteralKind, RegionKind, VerbatimKind};
use crate::symbols;
use rhizome_zettel_sx::{Object, Symbol};

/// Conses `fields` in front of `rest` and tags the result with `sym`.
fn make_node<const N: usize>(sym: &Symbol, fields: [Object; N], rest: Object) -> Object {
    let tail = fields
        .into_iter()
        .rev()
        .fold(rest, |acc, field| Object::cons(field, acc));
    Object::cons(sym, tail)
}

/// The fields after the head, if the head is `sym`.
fn tagged<'a>(node: &'a Object, sym: &Symbol) -> Option<&'a Object> {
    node.has_head(sym).then(|| node.tail())
}

/// The head and fields, if the head belongs to the family recognised by `kind`.
fn family<'a, K>(node: &'a Object, kind: fn(&Symbol) -> Option<K>) -> Option<(Symbol, &'a Object)> {
    let sym = node.car().as_symbol()?;
    kind(sym)?;
    Some((sym.clone(), node.tail()))
}

/// Splits off one mandatory field.
fn field(fields: &Object) -> Option<(&Object, &Object)> {
    let pair = fields.as_pair()?;
    Some((pair.car(), fields.tail()))
}

/// A list-valued slot. Atoms read as nil.
fn list_slot(obj: &Object) -> Object {
    if obj.is_list() { obj.clone() } else { Object::Nil }
}

fn string_field(fields: &Object) -> Option<(String, &Object)> {
    let (value, rest) = field(fields)?;
    Some((value.as_str()?.to_string(), rest))
}

pub fn make_block(blocks: impl IntoIterator<Item = Object>) -> Object {
    make_block_list(Object::list(blocks))
}

pub fn make_block_list(blocks: Object) -> Object {
    Object::cons(&*symbols::BLOCK, blocks)
}

pub fn make_inline_list(inlines: Object) -> Object {
    Object::cons(&*symbols::INLINE, inlines)
}

pub fn make_para_list(inlines: Object) -> Object {
    Object::cons(&*symbols::PARA, inlines)
}

/// Children of a `BLOCK` node.
pub fn get_block(node: &Object) -> Object {
    tagged(node, &symbols::BLOCK).cloned().unwrap_or_default()
}

/// Children of an `INLINE` node.
pub fn get_inline(node: &Object) -> Object {
    tagged(node, &symbols::INLINE).cloned().unwrap_or_default()
}

/// Children of a `PARA` node.
pub fn get_para(node: &Object) -> Object {
    tagged(node, &symbols::PARA).cloned().unwrap_or_default()
}

pub fn make_list(kind: ListKind, attrs: Object, items: Object) -> Object {
    make_node(&kind.symbol(), [attrs], items)
}

pub(crate) fn list_parts(node: &Object) -> Option<(Symbol, Object, Object)> {
    let (sym, fields) = family(node, ListKind::from_symbol)?;
    let (attrs, items) = field(fields)?;
    Some((sym, list_slot(attrs), items.clone()))
}

/// Returns the kind, attributes and items of a list node.
pub fn get_list(node: &Object) -> (Option<Symbol>, Object, Object) {
    match list_parts(node) {
        Some((sym, attrs, items)) => (Some(sym), attrs, items),
        None => Default::default(),
    }
}

pub fn make_verbatim(kind: VerbatimKind, attrs: Object, content: &str) -> Object {
    make_node(&kind.symbol(), [attrs, Object::string(content)], Object::Nil)
}

pub(crate) fn verbatim_parts(node: &Object) -> Option<(Symbol, Object, String)> {
    let (sym, fields) = family(node, VerbatimKind::from_symbol)?;
    let (attrs, rest) = field(fields)?;
    let (content, _) = string_field(rest)?;
    Some((sym, list_slot(attrs), content))
}

pub fn get_verbatim(node: &Object) -> (Option<Symbol>, Object, String) {
    match verbatim_parts(node) {
        Some((sym, attrs, content)) => (Some(sym), attrs, content),
        None => Default::default(),
    }
}

pub fn make_region(kind: RegionKind, attrs: Object, blocks: Object, inlines: Object) -> Object {
    make_node(&kind.symbol(), [attrs, blocks], inlines)
}

pub(crate) fn region_parts(node: &Object) -> Option<(Symbol, Object, Object, Object)> {
    let (sym, fields) = family(node, RegionKind::from_symbol)?;
    let (attrs, rest) = field(fields)?;
    let (blocks, inlines) = field(rest)?;
    Some((sym, list_slot(attrs), list_slot(blocks), inlines.clone()))
}

/// Returns the kind, attributes, blocks and inlines of a region.
pub fn get_region(node: &Object) -> (Option<Symbol>, Object, Object, Object) {
    match region_parts(node) {
        Some((sym, attrs, blocks, inlines)) => (Some(sym), attrs, blocks, inlines),
        None => Default::default(),
    }
}

pub fn make_heading(level: i64, attrs: Object, inlines: Object, slug: &str, fragment: &str) -> Object {
    make_node(
        &symbols::HEADING,
        [
            Object::int(level),
            attrs,
            Object::string(slug),
            Object::string(fragment),
        ],
        inlines,
    )
}

pub(crate) fn heading_parts(node: &Object) -> Option<(i64, Object, Object, String, String)> {
    let fields = tagged(node, &symbols::HEADING)?;
    let (level, rest) = field(fields)?;
    let level = level.as_int()?;
    let (attrs, rest) = field(rest)?;
    let (slug, rest) = string_field(rest)?;
    let (fragment, inlines) = string_field(rest)?;
    Some((level, list_slot(attrs), inlines.clone(), slug, fragment))
}

/// Returns level, attributes, inlines, slug and fragment of a heading.
pub fn get_heading(node: &Object) -> (i64, Object, Object, String, String) {
    heading_parts(node).unwrap_or_default()
}

pub fn make_thematic(attrs: Object) -> Object {
    make_node(&symbols::THEMATIC, [attrs], Object::Nil)
}

pub fn get_thematic(node: &Object) -> Object {
    tagged(node, &symbols::THEMATIC)
        .map(|fields| list_slot(fields.car()))
        .unwrap_or_default()
}

/// Builds a description list from alternating terms and values.
pub fn make_description(attrs: Object, entries: Object) -> Object {
    make_node(&symbols::DESCRIPTION, [attrs], entries)
}

pub(crate) fn description_parts(node: &Object) -> Option<(Object, Object)> {
    let fields = tagged(node, &symbols::DESCRIPTION)?;
    let (attrs, entries) = field(fields)?;
    Some((list_slot(attrs), entries.clone()))
}

/// Returns the attributes and the alternating terms and values.
pub fn get_description(node: &Object) -> (Object, Object) {
    description_parts(node).unwrap_or_default()
}

pub fn make_table(attrs: Object, header: Object, rows: Object) -> Object {
    make_node(&symbols::TABLE, [attrs, header], rows)
}

pub(crate) fn table_parts(node: &Object) -> Option<(Object, Object, Object)> {
    let fields = tagged(node, &symbols::TABLE)?;
    let (attrs, rest) = field(fields)?;
    let (header, rows) = field(rest)?;
    Some((list_slot(attrs), list_slot(header), rows.clone()))
}

/// Returns the attributes, the header row and the remaining rows.
pub fn get_table(node: &Object) -> (Object, Object, Object) {
    table_parts(node).unwrap_or_default()
}

pub fn make_cell(attrs: Object, inlines: Object) -> Object {
    make_node(&symbols::CELL, [attrs], inlines)
}

pub(crate) fn cell_parts(node: &Object) -> Option<(Object, Object)> {
    let fields = tagged(node, &symbols::CELL)?;
    let (attrs, inlines) = field(fields)?;
    Some((list_slot(attrs), inlines.clone()))
}

pub fn get_cell(node: &Object) -> (Object, Object) {
    cell_parts(node).unwrap_or_default()
}

/// Builds a transclusion. Without `inlines` the node ends after the
/// reference.
pub fn make_transclusion(attrs: Object, reference: Object, inlines: Option<Object>) -> Object {
    match inlines {
        None => make_node(&symbols::TRANSCLUDE, [attrs, reference], Object::Nil),
        Some(inlines) => make_node(&symbols::TRANSCLUDE, [attrs, reference], inlines),
    }
}

pub(crate) fn transclusion_parts(node: &Object) -> Option<(Object, Object, Object)> {
    let fields = tagged(node, &symbols::TRANSCLUDE)?;
    let (attrs, rest) = field(fields)?;
    let (reference, inlines) = field(rest)?;
    Some((list_slot(attrs), reference.clone(), inlines.clone()))
}

/// Returns attributes, reference and inlines of a transclusion.
pub fn get_transclusion(node: &Object) -> (Object, Object, Object) {
    transclusion_parts(node).unwrap_or_default()
}

/// Builds a block BLOB, encoding `data` according to `syntax`.
pub fn make_blob(attrs: Object, syntax: &str, data: &[u8], description: Object) -> Object {
    make_blob_raw(attrs, syntax, &encode_binary(syntax, data), description)
}

/// Builds a block BLOB from already encoded content.
pub fn make_blob_raw(attrs: Object, syntax: &str, content: &str, description: Object) -> Object {
    make_node(
        &symbols::BLOB,
        [
            attrs,
            description,
            Object::string(syntax),
            Object::string(content),
        ],
        Object::Nil,
    )
}

pub(crate) fn blob_parts(node: &Object) -> Option<(Object, String, String, Object)> {
    let fields = tagged(node, &symbols::BLOB)?;
    let (attrs, rest) = field(fields)?;
    let (description, rest) = field(rest)?;
    let (syntax, rest) = string_field(rest)?;
    let (content, _) = string_field(rest)?;
    Some((list_slot(attrs), syntax, content, list_slot(description)))
}

/// Returns attributes, syntax, decoded payload and description of a BLOB.
pub fn get_blob(node: &Object) -> (Object, String, Vec<u8>, Object) {
    match blob_parts(node) {
        Some((attrs, syntax, content, description)) => {
            let data = decode_binary(&syntax, &content);
            (attrs, syntax, data, description)
        }
        None => Default::default(),
    }
}

/// Like [`get_blob`], but returns the content as stored.
pub fn get_blob_raw(node: &Object) -> (Object, String, String, Object) {
    blob_parts(node).unwrap_or_default()
}

pub fn make_text(text: &str) -> Object {
    make_node(&symbols::TEXT, [Object::string(text)], Object::Nil)
}

pub fn get_text(node: &Object) -> String {
    tagged(node, &symbols::TEXT)
        .and_then(|fields| fields.car().as_str())
        .map(str::to_string)
        .unwrap_or_default()
}

pub fn make_soft() -> Object {
    make_node(&symbols::SOFT, [], Object::Nil)
}

pub fn make_hard() -> Object {
    make_node(&symbols::HARD, [], Object::Nil)
}

pub fn make_link(attrs: Object, reference: Object, inlines: Object) -> Object {
    make_node(&symbols::LINK, [attrs, reference], inlines)
}

pub(crate) fn link_parts(node: &Object) -> Option<(Object, Object, Object)> {
    let fields = tagged(node, &symbols::LINK)?;
    let (attrs, rest) = field(fields)?;
    let (reference, inlines) = field(rest)?;
    Some((list_slot(attrs), reference.clone(), inlines.clone()))
}

/// Returns attributes, reference and inlines of a link.
pub fn get_link(node: &Object) -> (Object, Object, Object) {
    link_parts(node).unwrap_or_default()
}

/// Builds an embed. `reference` is usually a reference node but is not
/// checked.
pub fn make_embed(attrs: Object, reference: Object, syntax: &str, inlines: Object) -> Object {
    make_node(&symbols::EMBED, [attrs, reference, Object::string(syntax)], inlines)
}

pub(crate) fn embed_parts(node: &Object) -> Option<(Object, Object, String, Object)> {
    let fields = tagged(node, &symbols::EMBED)?;
    let (attrs, rest) = field(fields)?;
    let (reference, rest) = field(rest)?;
    let (syntax, inlines) = string_field(rest)?;
    Some((list_slot(attrs), reference.clone(), syntax, inlines.clone()))
}

/// Returns attributes, reference, syntax and inlines of an embed.
pub fn get_embed(node: &Object) -> (Object, Object, String, Object) {
    embed_parts(node).unwrap_or_default()
}

/// Builds an inline BLOB, encoding `data` according to `syntax`.
pub fn make_embed_blob(attrs: Object, syntax: &str, data: &[u8], inlines: Object) -> Object {
    make_embed_blob_raw(attrs, syntax, &encode_binary(syntax, data), inlines)
}

pub fn make_embed_blob_raw(attrs: Object, syntax: &str, content: &str, inlines: Object) -> Object {
    make_node(
        &symbols::EMBED_BLOB,
        [attrs, Object::string(syntax), Object::string(content)],
        inlines,
    )
}

pub(crate) fn embed_blob_parts(node: &Object) -> Option<(Object, String, String, Object)> {
    let fields = tagged(node, &symbols::EMBED_BLOB)?;
    let (attrs, rest) = field(fields)?;
    let (syntax, rest) = string_field(rest)?;
    let (content, inlines) = string_field(rest)?;
    Some((list_slot(attrs), syntax, content, inlines.clone()))
}

/// Returns attributes, syntax, decoded payload and inlines of an inline BLOB.
pub fn get_embed_blob(node: &Object) -> (Object, String, Vec<u8>, Object) {
    match embed_blob_parts(node) {
        Some((attrs, syntax, content, inlines)) => {
            let data = decode_binary(&syntax, &content);
            (attrs, syntax, data, inlines)
        }
        None => Default::default(),
    }
}

pub fn get_embed_blob_raw(node: &Object) -> (Object, String, String, Object) {
    embed_blob_parts(node).unwrap_or_default()
}

pub fn make_cite(attrs: Object, key: &str, inlines: Object) -> Object {
    make_node(&symbols::CITE, [attrs, Object::string(key)], inlines)
}

pub(crate) fn cite_parts(node: &Object) -> Option<(Object, String, Object)> {
    let fields = tagged(node, &symbols::CITE)?;
    let (attrs, rest) = field(fields)?;
    let (key, inlines) = string_field(rest)?;
    Some((list_slot(attrs), key, inlines.clone()))
}

/// Returns attributes, citation key and inlines.
pub fn get_cite(node: &Object) -> (Object, String, Object) {
    cite_parts(node).unwrap_or_default()
}

pub fn make_endnote(attrs: Object, inlines: Object) -> Object {
    make_node(&symbols::ENDNOTE, [attrs], inlines)
}

pub(crate) fn endnote_parts(node: &Object) -> Option<(Object, Object)> {
    let fields = tagged(node, &symbols::ENDNOTE)?;
    let (attrs, inlines) = field(fields)?;
    Some((list_slot(attrs), inlines.clone()))
}

pub fn get_endnote(node: &Object) -> (Object, Object) {
    endnote_parts(node).unwrap_or_default()
}

pub fn make_mark(mark: &str, slug: &str, fragment: &str, inlines: Object) -> Object {
    make_node(
        &symbols::MARK,
        [
            Object::string(mark),
            Object::string(slug),
            Object::string(fragment),
        ],
        inlines,
    )
}

pub(crate) fn mark_parts(node: &Object) -> Option<(String, String, String, Object)> {
    let fields = tagged(node, &symbols::MARK)?;
    let (mark, rest) = string_field(fields)?;
    let (slug, rest) = string_field(rest)?;
    let (fragment, inlines) = string_field(rest)?;
    Some((mark, slug, fragment, inlines.clone()))
}

/// Returns mark, slug, fragment and inlines.
pub fn get_mark(node: &Object) -> (String, String, String, Object) {
    mark_parts(node).unwrap_or_default()
}

pub fn make_format(kind: FormatKind, attrs: Object, inlines: Object) -> Object {
    make_node(&kind.symbol(), [attrs], inlines)
}

pub(crate) fn format_parts(node: &Object) -> Option<(Symbol, Object, Object)> {
    let (sym, fields) = family(node, FormatKind::from_symbol)?;
    let (attrs, inlines) = field(fields)?;
    Some((sym, list_slot(attrs), inlines.clone()))
}

pub fn get_format(node: &Object) -> (Option<Symbol>, Object, Object) {
    match format_parts(node) {
        Some((sym, attrs, inlines)) => (Some(sym), attrs, inlines),
        None => Default::default(),
    }
}

pub fn make_literal(kind: LiteralKind, attrs: Object, text: &str) -> Object {
    make_node(&kind.symbol(), [attrs, Object::string(text)], Object::Nil)
}

pub(crate) fn literal_parts(node: &Object) -> Option<(Symbol, Object, String)> {
    let (sym, fields) = family(node, LiteralKind::from_symbol)?;
    let (attrs, rest) = field(fields)?;
    let (text, _) = string_field(rest)?;
    Some((sym, list_slot(attrs), text))
}

pub fn get_literal(node: &Object) -> (Option<Symbol>, Object, String) {
    match literal_parts(node) {
        Some((sym, attrs, text)) => (Some(sym), attrs, text),
        None => Default::default(),
    }
}

pub fn make_reference(kind: &Symbol, value: &str) -> Object {
    make_node(kind, [Object::string(value)], Object::Nil)
}

pub(crate) fn reference_parts(reference: &Object) -> Option<(Symbol, String)> {
    let sym = reference.car().as_symbol()?;
    let value = match reference.cdr() {
        Object::String(value) => value,
        rest => rest.car().as_str()?,
    };
    Some((sym.clone(), value.to_string()))
}

/// Returns the kind and value of a reference, `(KIND "value")` or
/// `(KIND . "value")`.
pub fn get_reference(reference: &Object) -> (Option<Symbol>, String) {
    match reference_parts(reference) {
        Some((sym, value)) => (Some(sym), value),
        None => Default::default(),
    }
}
