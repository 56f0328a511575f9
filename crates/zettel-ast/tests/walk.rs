//! Walker behaviour across the three flavours.

use rhizome_zettel_ast::{Env, Node, Visitor, VisitorIt, walk, walk_bang, walk_it, walk_object};
use rhizome_zettel_sx::{Object, Symbol, read};
use std::ops::ControlFlow;

fn node(src: &str) -> Node {
    Node::from_sx(&read(src).unwrap()).unwrap()
}

fn texts(n: usize) -> Node {
    Node::Block((0..n).map(|i| Node::text(i.to_string())).collect())
}

struct Identity;
impl Visitor for Identity {}

/// Checks that every TEXT node sits at the position its text names.
#[derive(Default)]
struct PositionCheck {
    checked: usize,
}

impl PositionCheck {
    fn check(&mut self, node: &Node, env: &Env<'_>) {
        if let Node::Text(text) = node {
            assert_eq!(env.position(), text.parse().ok(), "{text}");
            self.checked += 1;
        }
    }
}

impl Visitor for PositionCheck {
    fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<Option<Node>> {
        self.check(node, env);
        ControlFlow::Continue(())
    }
}

impl VisitorIt for PositionCheck {
    fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<()> {
        self.check(node, env);
        if let Node::Text(_) = node {
            let list = env.parent_list().unwrap();
            assert!(std::ptr::eq(&list[env.position().unwrap()], node));
        }
        ControlFlow::Continue(())
    }
}

#[test]
fn test_position_in_block() {
    let tree = texts(3);

    let mut check = PositionCheck::default();
    assert_eq!(walk(&mut check, &tree, &Env::root()), Some(tree.clone()));
    assert_eq!(check.checked, 3);

    let mut check = PositionCheck::default();
    walk_it(&mut check, &tree, &Env::root());
    assert_eq!(check.checked, 3);

    let mut check = PositionCheck::default();
    assert_eq!(walk_bang(&mut check, tree.clone(), &Env::root()), Some(tree));
    assert_eq!(check.checked, 3);
}

#[test]
fn test_position_in_nested_regions() {
    let tree = node(
        r#"(BLOCK (PARA (TEXT "0") (TEXT "1"))
                  (REGION-QUOTE () ((PARA (TEXT "0"))) (TEXT "0") (TEXT "1"))
                  (TABLE () ((CELL () (TEXT "0"))) ((CELL () (TEXT "0") (TEXT "1")))))"#,
    );
    let mut check = PositionCheck::default();
    walk_it(&mut check, &tree, &Env::root());
    assert_eq!(check.checked, 8);
}

#[test]
fn test_parent_list_in_pure_walk() {
    struct Siblings(Vec<usize>);
    impl Visitor for Siblings {
        fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<Option<Node>> {
            if let Node::Text(_) = node {
                self.0.push(env.parent_list().map_or(0, <[Node]>::len));
            }
            ControlFlow::Continue(())
        }
    }

    let mut siblings = Siblings(Vec::new());
    walk(&mut siblings, &texts(2), &Env::root());
    assert_eq!(siblings.0, vec![2, 2]);

    // The list is rebuilt in place during a destructive walk.
    let mut siblings = Siblings(Vec::new());
    walk_bang(&mut siblings, texts(2), &Env::root());
    assert_eq!(siblings.0, vec![0, 0]);
}

#[test]
fn test_noop_walk_flattens_splices() {
    let tree = node(
        r#"(BLOCK (TEXT "a") (SPECIAL-SPLICE (SPECIAL-SPLICE (TEXT "b")) (TEXT "c")))"#,
    );
    let expected = r#"(BLOCK (TEXT "a") (TEXT "b") (TEXT "c"))"#;

    let result = walk(&mut Identity, &tree, &Env::root()).unwrap();
    assert_eq!(result.to_sx().to_string(), expected);

    let result = walk_bang(&mut Identity, tree, &Env::root()).unwrap();
    assert_eq!(result.to_sx().to_string(), expected);
}

/// Replaces `TEXT "x"` by a splice of two texts.
struct Double;

impl Visitor for Double {
    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        match node {
            Node::Text(text) if text == "x" => {
                Some(Node::Splice(vec![Node::text("x1"), Node::text("x2")]))
            }
            node => Some(node),
        }
    }
}

#[test]
fn test_splice_replaces_child() {
    let tree = node(r#"(PARA (TEXT "a") (TEXT "x") (TEXT "b"))"#);
    let expected = r#"(PARA (TEXT "a") (TEXT "x1") (TEXT "x2") (TEXT "b"))"#;
    let result = walk(&mut Double, &tree, &Env::root()).unwrap();
    assert_eq!(result.to_sx().to_string(), expected);
    let result = walk_bang(&mut Double, tree, &Env::root()).unwrap();
    assert_eq!(result.to_sx().to_string(), expected);
}

/// Drops SOFT and HARD breaks.
struct NoBreaks;

impl Visitor for NoBreaks {
    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        match node {
            Node::Soft | Node::Hard => None,
            node => Some(node),
        }
    }
}

#[test]
fn test_none_removes_child() {
    let tree = node(r#"(PARA (SOFT) (TEXT "a") (HARD) (TEXT "b") (SOFT))"#);
    let expected = node(r#"(PARA (TEXT "a") (TEXT "b"))"#);
    assert_eq!(walk(&mut NoBreaks, &tree, &Env::root()), Some(expected.clone()));
    assert_eq!(walk_bang(&mut NoBreaks, tree, &Env::root()), Some(expected));
    assert_eq!(walk(&mut NoBreaks, &Node::Soft, &Env::root()), None);
}

/// Replaces every FORMAT node without visiting inside it.
#[derive(Default)]
struct Prune {
    after: Vec<String>,
}

impl Visitor for Prune {
    fn visit_before(&mut self, node: &Node, _env: &Env<'_>) -> ControlFlow<Option<Node>> {
        match node {
            Node::Format { .. } => ControlFlow::Break(Some(Node::text("pruned"))),
            _ => ControlFlow::Continue(()),
        }
    }

    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        if let Node::Text(text) = &node {
            self.after.push(text.clone());
        }
        Some(node)
    }
}

#[test]
fn test_break_skips_subtree() {
    let tree = node(r#"(PARA (TEXT "a") (FORMAT-STRONG () (TEXT "inner")) (TEXT "b"))"#);
    let expected = node(r#"(PARA (TEXT "a") (TEXT "pruned") (TEXT "b"))"#);

    let mut prune = Prune::default();
    assert_eq!(walk(&mut prune, &tree, &Env::root()), Some(expected.clone()));
    assert_eq!(prune.after, ["a", "b"]);

    let mut prune = Prune::default();
    assert_eq!(walk_bang(&mut prune, tree, &Env::root()), Some(expected));
    assert_eq!(prune.after, ["a", "b"]);
}

#[test]
fn test_break_at_root() {
    struct Stop;
    impl Visitor for Stop {
        fn visit_before(&mut self, _node: &Node, _env: &Env<'_>) -> ControlFlow<Option<Node>> {
            ControlFlow::Break(None)
        }
        fn visit_after(&mut self, _node: Node, _env: &Env<'_>) -> Option<Node> {
            panic!("visit_after must not be called");
        }
    }
    assert_eq!(walk(&mut Stop, &texts(2), &Env::root()), None);
    assert_eq!(walk_bang(&mut Stop, texts(2), &Env::root()), None);
}

/// Records callbacks in order.
#[derive(Default)]
struct Trace(Vec<String>);

fn label(node: &Node) -> String {
    match node {
        Node::Text(text) => text.clone(),
        node => node
            .symbol()
            .map(|sym| sym.name().to_string())
            .unwrap_or_default(),
    }
}

impl VisitorIt for Trace {
    fn visit_before(&mut self, node: &Node, _env: &Env<'_>) -> ControlFlow<()> {
        self.0.push(format!("<{}", label(node)));
        ControlFlow::Continue(())
    }

    fn visit_after(&mut self, node: &Node, _env: &Env<'_>) {
        self.0.push(format!("{}>", label(node)));
    }
}

#[test]
fn test_leaf_visited_once() {
    for src in [
        r#"(TEXT "t")"#,
        "(SOFT)",
        "(THEMATIC ())",
        r#"(VERBATIM-CODE () "x")"#,
        r#"(LITERAL-MATH () "x")"#,
        r#"(EMBED-BLOB () "png" "AAE=" (TEXT "not walked"))"#,
        r#"(SOMETHING-ELSE "x")"#,
    ] {
        let leaf = node(src);
        assert!(leaf.is_leaf(), "{src}");
        let mut trace = Trace::default();
        walk_it(&mut trace, &leaf, &Env::root());
        let name = label(&leaf);
        assert_eq!(trace.0, [format!("<{name}"), format!("{name}>")], "{src}");
    }
}

#[test]
fn test_description_order() {
    let tree = node(
        r#"(DESCRIPTION () ((TEXT "t1")) (BLOCK (PARA (TEXT "v1"))) ((TEXT "t2") (TEXT "t3")))"#,
    );
    let mut trace = Trace::default();
    walk_it(&mut trace, &tree, &Env::root());
    assert_eq!(
        trace.0.join(" "),
        "<DESCRIPTION <t1 t1> <BLOCK <PARA <v1 v1> PARA> BLOCK> <t2 t2> <t3 t3> DESCRIPTION>"
    );
}

#[test]
fn test_description_values_have_no_position() {
    struct Values(Vec<Option<usize>>);
    impl VisitorIt for Values {
        fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<()> {
            if let Node::Block(_) = node {
                self.0.push(env.position());
            }
            ControlFlow::Continue(())
        }
    }
    let tree = node(r#"(DESCRIPTION () ((TEXT "t")) (BLOCK (PARA (TEXT "v"))))"#);
    let mut values = Values(Vec::new());
    walk_it(&mut values, &tree, &Env::root());
    assert_eq!(values.0, [None]);
}

#[test]
fn test_depth_and_bindings() {
    struct Depths {
        lang: Symbol,
        seen: Vec<(String, usize, Option<Object>)>,
    }
    impl VisitorIt for Depths {
        fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<()> {
            self.seen
                .push((label(node), env.depth(), env.lookup(&self.lang).cloned()));
            ControlFlow::Continue(())
        }
    }

    let lang = Symbol::intern("lang");
    let root = Env::root();
    let env = root.bind(&lang, "de");
    let mut depths = Depths {
        lang: lang.clone(),
        seen: Vec::new(),
    };
    walk_it(&mut depths, &node(r#"(BLOCK (PARA (TEXT "x")))"#), &env);
    let de = Some(Object::string("de"));
    assert_eq!(
        depths.seen,
        [
            ("BLOCK".to_string(), 0, de.clone()),
            ("PARA".to_string(), 1, de.clone()),
            ("x".to_string(), 2, de),
        ]
    );
}

#[test]
fn test_walk_object() {
    let mut calls = Trace::default();
    struct Counting<'a>(&'a mut Trace);
    impl Visitor for Counting<'_> {
        fn visit_before(&mut self, node: &Node, env: &Env<'_>) -> ControlFlow<Option<Node>> {
            let _ = VisitorIt::visit_before(&mut *self.0, node, env);
            ControlFlow::Continue(())
        }
    }

    assert_eq!(
        walk_object(&mut Counting(&mut calls), &Object::Nil, &Env::root()),
        Object::Nil
    );
    assert!(calls.0.is_empty());

    let src = read(r#"(PARA (TEXT "a") (SOFT))"#).unwrap();
    assert_eq!(walk_object(&mut Counting(&mut calls), &src, &Env::root()), src);
    assert_eq!(calls.0, ["<PARA", "<a", "<SOFT"]);

    assert_eq!(walk_object(&mut NoBreaks, &read("(SOFT)").unwrap(), &Env::root()), Object::Nil);
}

#[test]
fn test_identity_on_every_kind() {
    let tree = node(
        r##"(BLOCK
          (HEADING 2 (("-" . "x")) "s" "f" (TEXT "h"))
          (ORDERED () (BLOCK (PARA (TEXT "i"))))
          (QUOTATION () (INLINE (TEXT "q")))
          (REGION-VERSE () ((PARA (TEXT "v"))) (TEXT "by"))
          (DESCRIPTION () ((TEXT "t")) (BLOCK (PARA (TEXT "d"))) ((TEXT "u")))
          (TABLE () () ((CELL () (TEXT "c"))))
          (TRANSCLUDE () (HOSTED "/x") (TEXT "alt"))
          (BLOB () () "svg" "<svg/>")
          (VERBATIM-HTML () "<b>")
          (PARA
            (LINK () (SELF "#a") (TEXT "l"))
            (EMBED () (EXTERNAL "https://x") "png" (TEXT "e"))
            (EMBED-BLOB () "svg" "<svg/>" (TEXT "e"))
            (CITE () "key" (TEXT "c"))
            (ENDNOTE () (TEXT "n"))
            (MARK "m" "m" "m" (TEXT "k"))
            (FORMAT-SUPER () (TEXT "2"))
            (LITERAL-INPUT () "in")
            (HARD)))"##,
    );
    assert_eq!(walk(&mut Identity, &tree, &Env::root()), Some(tree.clone()));
    assert_eq!(walk_bang(&mut Identity, tree.clone(), &Env::root()), Some(tree));
}

/// Uppercases every TEXT node.
struct Upper;

impl Visitor for Upper {
    fn visit_after(&mut self, node: Node, _env: &Env<'_>) -> Option<Node> {
        match node {
            Node::Text(text) => Some(Node::Text(text.to_uppercase())),
            node => Some(node),
        }
    }
}

#[test]
fn test_malformed_known_node_children_walked() {
    for (src, expected) in [
        (
            r#"(LINK () (HOSTED) (TEXT "x"))"#,
            r#"(LINK () (HOSTED) (TEXT "X"))"#,
        ),
        (
            r#"(HEADING "2" () "s" "f" (TEXT "x"))"#,
            r#"(HEADING "2" () "s" "f" (TEXT "X"))"#,
        ),
        (
            r#"(CITE () 7 (TEXT "x") (SOFT))"#,
            r#"(CITE () 7 (TEXT "X") (SOFT))"#,
        ),
    ] {
        let obj = read(src).unwrap();
        let decoded = Node::from_sx(&obj).unwrap();
        assert!(matches!(decoded, Node::Unknown(_)), "{src}");
        assert!(!decoded.is_leaf(), "{src}");
        assert_eq!(walk_object(&mut Upper, &obj, &Env::root()).to_string(), expected);

        let nested = node(&format!("(PARA (TEXT \"a\") {src})"));
        let expected = format!("(PARA (TEXT \"A\") {expected})");
        let result = walk(&mut Upper, &nested, &Env::root()).unwrap();
        assert_eq!(result.to_sx().to_string(), expected);
        let result = walk_bang(&mut Upper, nested.clone(), &Env::root()).unwrap();
        assert_eq!(result.to_sx().to_string(), expected);

        let mut trace = Trace::default();
        walk_it(&mut trace, &nested, &Env::root());
        assert!(trace.0.contains(&"<x".to_string()), "{src}");
    }
}

#[test]
fn test_malformed_node_child_positions() {
    let mut check = PositionCheck::default();
    walk_it(
        &mut check,
        &node(r#"(LINK () (HOSTED) (TEXT "0") (SOFT) (TEXT "2"))"#),
        &Env::root(),
    );
    assert_eq!(check.checked, 2);
}

#[test]
fn test_unknown_kind_children_not_walked() {
    let obj = read(r#"(SOMETHING (TEXT "x"))"#).unwrap();
    assert_eq!(walk_object(&mut Upper, &obj, &Env::root()), obj);
}

/// Stops at FORMAT nodes and records every callback.
#[derive(Default)]
struct StopAtFormat(Vec<String>);

impl VisitorIt for StopAtFormat {
    fn visit_before(&mut self, node: &Node, _env: &Env<'_>) -> ControlFlow<()> {
        self.0.push(format!("<{}", label(node)));
        match node {
            Node::Format { .. } => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }

    fn visit_after(&mut self, node: &Node, _env: &Env<'_>) {
        self.0.push(format!("{}>", label(node)));
    }
}

#[test]
fn test_break_skips_subtree_in_walk_it() {
    let tree = node(
        r#"(PARA (TEXT "a") (FORMAT-STRONG () (TEXT "inner") (FORMAT-EMPH () (TEXT "deep"))) (TEXT "b"))"#,
    );
    let mut stop = StopAtFormat::default();
    walk_it(&mut stop, &tree, &Env::root());
    assert_eq!(
        stop.0.join(" "),
        "<PARA <a a> <FORMAT-STRONG <b b> PARA>"
    );
}
