//! Visitors behind the `fmt` and `stats` commands.

use rhizome_zettel_ast::{Env, Node, Visitor, VisitorIt};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;

/// Drops empty `TEXT` nodes. Splices are flattened by the walker.
pub struct Normalize;

impl Visitor for Normalize {
    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        match node {
            Node::Text(text) if text.is_empty() => None,
            node => Some(node),
        }
    }
}

/// Node counts per kind and the deepest nesting seen.
#[derive(Debug, Default)]
pub struct Stats {
    pub kinds: BTreeMap<String, usize>,
    pub nodes: usize,
    pub depth: usize,
}

impl VisitorIt for Stats {
    fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<()> {
        let kind = node
            .symbol()
            .map_or_else(|| "?".to_string(), |sym| sym.name().to_string());
        *self.kinds.entry(kind).or_default() += 1;
        self.nodes += 1;
        self.depth = self.depth.max(env.depth());
        ControlFlow::Continue(())
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in &self.kinds {
            writeln!(f, "{kind:<16} {count}")?;
        }
        writeln!(f, "nodes: {}", self.nodes)?;
        write!(f, "depth: {}", self.depth)
    }
}
