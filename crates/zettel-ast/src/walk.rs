//! Walking a document tree with a visitor.
//!
//! Three flavours share the same protocol. [`walk`] rebuilds a new tree from
//! a borrowed one, [`walk_bang`] consumes the tree and reuses its child
//! vectors, and [`walk_it`] only calls the visitor for its side effects.
//!
//! For every node, `visit_before` is called first. If it breaks, its value is
//! the result and neither the children nor `visit_after` are visited.
//! Otherwise the child regions of the node are walked in order, then
//! `visit_after` receives the rebuilt node and decides the result.
//!
//! In a rebuilt child list a `None` result removes the child and a
//! [`Node::Splice`] result is replaced by its (recursively flattened)
//! children.
//!
//! A [`Node::Unknown`] with a known kind, whose fixed fields did not decode,
//! still has its child regions walked by position. Other fields are kept
//! unchanged. Nodes of an unknown kind have no children.

use crate::node::{DescriptionEntry, FormatKind, ListKind, Node, RegionKind};
use crate::symbols;
use rhizome_zettel_sx::{ListBuilder, Object, Symbol};
use std::ops::ControlFlow;

/// Visitor for [`walk`] and [`walk_bang`].
///
/// Both flavours report [`Env::position`]. [`Env::parent_list`] is only
/// available during [`walk`]; [`walk_bang`] takes each child out of its list
/// while it is visited.
pub trait Visitor {
    /// Called before the children are walked. `Break(result)` ends the walk
    /// of this node with `result`.
    fn visit_before(&mut self, _node: &Node, _env: &Env<'_>) -> ControlFlow<Option<Node>> {
        ControlFlow::Continue(())
    }

    /// Called with the node after its children were walked.
    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        Some(node)
    }
}

/// Visitor for [`walk_it`].
pub trait VisitorIt {
    fn visit_before(&mut self, _node: &Node, _env: &Env<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_after(&mut self, _node: &Node, _env: &Env<'_>) {}
}

enum Frame<'a> {
    Root,
    Bind(Symbol, Object),
    /// Element of a child list.
    Item {
        pos: usize,
        list: Option<&'a [Node]>,
    },
    /// Single child slot outside any list.
    Slot,
}

/// The context of the node being visited.
///
/// An environment is a chain of frames borrowed from the callers up the
/// tree. Walkers push a frame for every child; callers may push their own
/// bindings with [`Env::bind`].
pub struct Env<'a> {
    parent: Option<&'a Env<'a>>,
    frame: Frame<'a>,
}

impl Default for Env<'_> {
    fn default() -> Self {
        Env {
            parent: None,
            frame: Frame::Root,
        }
    }
}

impl<'a> Env<'a> {
    pub fn root() -> Env<'static> {
        Env::default()
    }

    fn child(&'a self, frame: Frame<'a>) -> Env<'a> {
        Env {
            parent: Some(self),
            frame,
        }
    }

    fn item(&'a self, pos: usize, list: Option<&'a [Node]>) -> Env<'a> {
        self.child(Frame::Item { pos, list })
    }

    fn slot(&'a self) -> Env<'a> {
        self.child(Frame::Slot)
    }

    /// Returns a new environment where `sym` is bound to `value`.
    pub fn bind(&'a self, sym: &Symbol, value: impl Into<Object>) -> Env<'a> {
        self.child(Frame::Bind(sym.clone(), value.into()))
    }

    /// The innermost value bound to `sym`.
    pub fn lookup(&self, sym: &Symbol) -> Option<&Object> {
        self.frames().find_map(|frame| match frame {
            Frame::Bind(bound, value) if bound == sym => Some(value),
            _ => None,
        })
    }

    /// Index of the current node in its parent list, if it is in one.
    pub fn position(&self) -> Option<usize> {
        self.placement().map(|(pos, _)| pos)
    }

    /// The list the current node belongs to. Not available during
    /// [`walk_bang`], where the list is being rebuilt.
    pub fn parent_list(&self) -> Option<&'a [Node]> {
        self.placement().and_then(|(_, list)| list)
    }

    /// Number of nodes above the current one.
    pub fn depth(&self) -> usize {
        self.frames()
            .filter(|frame| matches!(frame, Frame::Item { .. } | Frame::Slot))
            .count()
    }

    fn frames(&self) -> impl Iterator<Item = &Frame<'a>> {
        std::iter::successors(Some(self), |env| env.parent).map(|env| &env.frame)
    }

    fn placement(&self) -> Option<(usize, Option<&'a [Node]>)> {
        for frame in self.frames() {
            match frame {
                Frame::Bind(..) => continue,
                Frame::Item { pos, list } => return Some((*pos, *list)),
                Frame::Root | Frame::Slot => return None,
            }
        }
        None
    }
}

fn splice_into(out: &mut Vec<Node>, node: Node) {
    match node {
        Node::Splice(children) => {
            for child in children {
                splice_into(out, child);
            }
        }
        node => out.push(node),
    }
}

/// Walks `node` without modifying it and returns the rebuilt tree.
pub fn walk<V: Visitor + ?Sized>(v: &mut V, node: &Node, env: &Env<'_>) -> Option<Node> {
    if let ControlFlow::Break(result) = v.visit_before(node, env) {
        return result;
    }
    let node = walk_children(v, node, env);
    v.visit_after(node, env)
}

fn walk_list<V: Visitor + ?Sized>(v: &mut V, list: &[Node], env: &Env<'_>) -> Vec<Node> {
    let mut result = Vec::with_capacity(list.len());
    for (pos, child) in list.iter().enumerate() {
        if let Some(node) = walk(v, child, &env.item(pos, Some(list))) {
            splice_into(&mut result, node);
        }
    }
    result
}

fn walk_children<V: Visitor + ?Sized>(v: &mut V, node: &Node, env: &Env<'_>) -> Node {
    match node {
        Node::Block(children) => Node::Block(walk_list(v, children, env)),
        Node::Inline(children) => Node::Inline(walk_list(v, children, env)),
        Node::Para(children) => Node::Para(walk_list(v, children, env)),
        Node::Splice(children) => Node::Splice(walk_list(v, children, env)),
        Node::Heading {
            level,
            attrs,
            slug,
            fragment,
            inlines,
        } => Node::Heading {
            level: *level,
            attrs: attrs.clone(),
            slug: slug.clone(),
            fragment: fragment.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Region {
            kind,
            attrs,
            blocks,
            inlines,
        } => Node::Region {
            kind: *kind,
            attrs: attrs.clone(),
            blocks: walk_list(v, blocks, env),
            inlines: walk_list(v, inlines, env),
        },
        Node::List { kind, attrs, items } => Node::List {
            kind: *kind,
            attrs: attrs.clone(),
            items: walk_list(v, items, env),
        },
        Node::Description { attrs, entries } => Node::Description {
            attrs: attrs.clone(),
            entries: entries
                .iter()
                .map(|entry| DescriptionEntry {
                    term: walk_list(v, &entry.term, env),
                    values: entry
                        .values
                        .as_ref()
                        .and_then(|values| walk(v, values, &env.slot())),
                })
                .collect(),
        },
        Node::Table {
            attrs,
            header,
            rows,
        } => Node::Table {
            attrs: attrs.clone(),
            header: walk_list(v, header, env),
            rows: rows.iter().map(|row| walk_list(v, row, env)).collect(),
        },
        Node::Cell { attrs, inlines } => Node::Cell {
            attrs: attrs.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Transclude {
            attrs,
            reference,
            inlines,
        } => Node::Transclude {
            attrs: attrs.clone(),
            reference: reference.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Blob {
            attrs,
            description,
            syntax,
            content,
        } => Node::Blob {
            attrs: attrs.clone(),
            description: walk_list(v, description, env),
            syntax: syntax.clone(),
            content: content.clone(),
        },
        Node::Link {
            attrs,
            reference,
            inlines,
        } => Node::Link {
            attrs: attrs.clone(),
            reference: reference.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Embed {
            attrs,
            reference,
            syntax,
            inlines,
        } => Node::Embed {
            attrs: attrs.clone(),
            reference: reference.clone(),
            syntax: syntax.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Cite {
            attrs,
            key,
            inlines,
        } => Node::Cite {
            attrs: attrs.clone(),
            key: key.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Endnote { attrs, inlines } => Node::Endnote {
            attrs: attrs.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Mark {
            mark,
            slug,
            fragment,
            inlines,
        } => Node::Mark {
            mark: mark.clone(),
            slug: slug.clone(),
            fragment: fragment.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Format {
            kind,
            attrs,
            inlines,
        } => Node::Format {
            kind: *kind,
            attrs: attrs.clone(),
            inlines: walk_list(v, inlines, env),
        },
        Node::Unknown(obj) => Node::Unknown(walk_unknown(v, obj, env)),
        Node::Text(_)
        | Node::Soft
        | Node::Hard
        | Node::Thematic { .. }
        | Node::Verbatim { .. }
        | Node::Literal { .. }
        | Node::EmbedBlob { .. } => node.clone(),
    }
}

/// Walks `node`, taking it apart and putting the results back in place.
pub fn walk_bang<V: Visitor + ?Sized>(v: &mut V, mut node: Node, env: &Env<'_>) -> Option<Node> {
    if let ControlFlow::Break(result) = v.visit_before(&node, env) {
        return result;
    }
    walk_children_bang(v, &mut node, env);
    v.visit_after(node, env)
}

fn walk_list_bang<V: Visitor + ?Sized>(v: &mut V, list: &mut Vec<Node>, env: &Env<'_>) {
    let mut reshape = false;
    for pos in 0..list.len() {
        // An empty splice stands in for the child while it is walked and
        // vanishes when the list is flattened.
        let child = std::mem::replace(&mut list[pos], Node::Splice(Vec::new()));
        match walk_bang(v, child, &env.item(pos, None)) {
            Some(node) => {
                reshape |= matches!(node, Node::Splice(_));
                list[pos] = node;
            }
            None => reshape = true,
        }
    }
    if reshape {
        let children = std::mem::take(list);
        for child in children {
            splice_into(list, child);
        }
    }
}

fn walk_children_bang<V: Visitor + ?Sized>(v: &mut V, node: &mut Node, env: &Env<'_>) {
    match node {
        Node::Block(children)
        | Node::Inline(children)
        | Node::Para(children)
        | Node::Splice(children) => walk_list_bang(v, children, env),
        Node::Region {
            blocks, inlines, ..
        } => {
            walk_list_bang(v, blocks, env);
            walk_list_bang(v, inlines, env);
        }
        Node::List { items, .. } => walk_list_bang(v, items, env),
        Node::Description { entries, .. } => {
            for entry in entries {
                walk_list_bang(v, &mut entry.term, env);
                if let Some(values) = entry.values.take() {
                    entry.values = walk_bang(v, values, &env.slot());
                }
            }
        }
        Node::Table { header, rows, .. } => {
            walk_list_bang(v, header, env);
            for row in rows {
                walk_list_bang(v, row, env);
            }
        }
        Node::Blob { description, .. } => walk_list_bang(v, description, env),
        Node::Heading { inlines, .. }
        | Node::Cell { inlines, .. }
        | Node::Transclude { inlines, .. }
        | Node::Link { inlines, .. }
        | Node::Embed { inlines, .. }
        | Node::Cite { inlines, .. }
        | Node::Endnote { inlines, .. }
        | Node::Mark { inlines, .. }
        | Node::Format { inlines, .. } => walk_list_bang(v, inlines, env),
        Node::Unknown(obj) => *obj = walk_unknown(v, obj, env),
        Node::Text(_)
        | Node::Soft
        | Node::Hard
        | Node::Thematic { .. }
        | Node::Verbatim { .. }
        | Node::Literal { .. }
        | Node::EmbedBlob { .. } => {}
    }
}

/// Walks `node` for the side effects of the visitor.
pub fn walk_it<V: VisitorIt + ?Sized>(v: &mut V, node: &Node, env: &Env<'_>) {
    if v.visit_before(node, env).is_break() {
        return;
    }
    walk_children_it(v, node, env);
    v.visit_after(node, env);
}

/// Walks every element of `list`, each at its index.
pub fn walk_it_list<V: VisitorIt + ?Sized>(v: &mut V, list: &[Node], env: &Env<'_>) {
    for (pos, child) in list.iter().enumerate() {
        walk_it(v, child, &env.item(pos, Some(list)));
    }
}

fn walk_children_it<V: VisitorIt + ?Sized>(v: &mut V, node: &Node, env: &Env<'_>) {
    match node {
        Node::Block(children)
        | Node::Inline(children)
        | Node::Para(children)
        | Node::Splice(children) => walk_it_list(v, children, env),
        Node::Region {
            blocks, inlines, ..
        } => {
            walk_it_list(v, blocks, env);
            walk_it_list(v, inlines, env);
        }
        Node::List { items, .. } => walk_it_list(v, items, env),
        Node::Description { entries, .. } => {
            for entry in entries {
                walk_it_list(v, &entry.term, env);
                if let Some(values) = &entry.values {
                    walk_it(v, values, &env.slot());
                }
            }
        }
        Node::Table { header, rows, .. } => {
            walk_it_list(v, header, env);
            for row in rows {
                walk_it_list(v, row, env);
            }
        }
        Node::Blob { description, .. } => walk_it_list(v, description, env),
        Node::Heading { inlines, .. }
        | Node::Cell { inlines, .. }
        | Node::Transclude { inlines, .. }
        | Node::Link { inlines, .. }
        | Node::Embed { inlines, .. }
        | Node::Cite { inlines, .. }
        | Node::Endnote { inlines, .. }
        | Node::Mark { inlines, .. }
        | Node::Format { inlines, .. } => walk_it_list(v, inlines, env),
        Node::Unknown(obj) => walk_unknown_it(v, obj, env),
        Node::Text(_)
        | Node::Soft
        | Node::Hard
        | Node::Thematic { .. }
        | Node::Verbatim { .. }
        | Node::Literal { .. }
        | Node::EmbedBlob { .. } => {}
    }
}

/// Role of an element in the layout of a known kind.
enum Slot {
    Field,
    /// A list of nodes.
    List,
    /// A single node.
    Single,
    /// One of the trailing child nodes.
    Child,
}

fn layout_slot(kind: &Symbol, index: usize) -> Slot {
    let children_from = |from: usize| {
        if index >= from {
            Slot::Child
        } else {
            Slot::Field
        }
    };
    if index == 0 {
        Slot::Field
    } else if kind == &*symbols::BLOCK
        || kind == &*symbols::INLINE
        || kind == &*symbols::PARA
        || kind == &*symbols::SPECIAL_SPLICE
    {
        Slot::Child
    } else if RegionKind::from_symbol(kind).is_some() {
        match index {
            1 => Slot::Field,
            2 => Slot::List,
            _ => Slot::Child,
        }
    } else if ListKind::from_symbol(kind).is_some()
        || FormatKind::from_symbol(kind).is_some()
        || kind == &*symbols::CELL
        || kind == &*symbols::ENDNOTE
    {
        children_from(2)
    } else if kind == &*symbols::TRANSCLUDE || kind == &*symbols::LINK || kind == &*symbols::CITE {
        children_from(3)
    } else if kind == &*symbols::EMBED || kind == &*symbols::MARK {
        children_from(4)
    } else if kind == &*symbols::HEADING {
        children_from(5)
    } else if kind == &*symbols::DESCRIPTION {
        match index {
            1 => Slot::Field,
            i if i % 2 == 0 => Slot::List,
            _ => Slot::Single,
        }
    } else if kind == &*symbols::TABLE {
        if index >= 2 { Slot::List } else { Slot::Field }
    } else if kind == &*symbols::BLOB && index == 2 {
        Slot::List
    } else {
        Slot::Field
    }
}

/// The kind of a node whose fixed fields did not decode.
fn malformed_kind(obj: &Object) -> Option<&Symbol> {
    let kind = obj.car().as_symbol().filter(|kind| symbols::is_node_kind(kind));
    if kind.is_none() {
        tracing::trace!(node = %obj, "no children to walk for unknown node");
    }
    kind
}

fn decode_list(list: &Object) -> Vec<Node> {
    list.iter().filter_map(Node::from_sx).collect()
}

fn encode_list(nodes: &[Node]) -> Object {
    nodes.iter().map(Node::to_sx).collect()
}

/// Walks the child regions of an unknown node by position, keeping every
/// other element as it is. Nodes with an unknown kind have no children.
fn walk_unknown<V: Visitor + ?Sized>(v: &mut V, obj: &Object, env: &Env<'_>) -> Object {
    let Some(kind) = malformed_kind(obj) else {
        return obj.clone();
    };
    let mut lb = ListBuilder::new();
    let mut children = Vec::new();
    let mut current = obj;
    let mut index = 0;
    while let Some(pair) = current.as_pair() {
        let item = pair.car();
        match layout_slot(kind, index) {
            Slot::Child => children.extend(Node::from_sx(item)),
            Slot::List if item.is_list() => {
                let list = decode_list(item);
                lb.add(encode_list(&walk_list(v, &list, env)));
            }
            Slot::Single => {
                lb.add(walk_object(v, item, &env.slot()));
            }
            Slot::List | Slot::Field => {
                lb.add(item.clone());
            }
        }
        index += 1;
        current = pair.cdr();
    }
    lb.extend(walk_list(v, &children, env).iter().map(Node::to_sx));
    lb.set_tail(current.clone());
    lb.list()
}

fn walk_unknown_it<V: VisitorIt + ?Sized>(v: &mut V, obj: &Object, env: &Env<'_>) {
    let Some(kind) = malformed_kind(obj) else {
        return;
    };
    let mut children = Vec::new();
    for (index, item) in obj.iter().enumerate() {
        match layout_slot(kind, index) {
            Slot::Child => children.extend(Node::from_sx(item)),
            Slot::List => walk_it_list(v, &decode_list(item), env),
            Slot::Single => {
                if let Some(node) = Node::from_sx(item) {
                    walk_it(v, &node, &env.slot());
                }
            }
            Slot::Field => {}
        }
    }
    walk_it_list(v, &children, env);
}

/// Walks a node given in its s-expression layout. Nil yields nil without
/// calling the visitor.
pub fn walk_object<V: Visitor + ?Sized>(v: &mut V, obj: &Object, env: &Env<'_>) -> Object {
    match Node::from_sx(obj) {
        Some(node) => walk(v, &node, env).map(|node| node.to_sx()).unwrap_or_default(),
        None => Object::Nil,
    }
}
