//! Tests for zettel-sx.

use crate::{ListBuilder, Object, Symbol, read, text_value};

#[test]
fn test_object_constructors() {
    assert!(Object::nil().is_nil());
    assert!(Object::nil().is_atom());
    assert!(Object::nil().is_list());

    assert_eq!(Object::string("hello").as_str(), Some("hello"));
    assert_eq!(Object::int(42).as_int(), Some(42));
    assert_eq!(
        Object::symbol("PARA").as_symbol(),
        Some(&Symbol::intern("PARA"))
    );

    // Wrong type returns None
    assert_eq!(Object::int(42).as_str(), None);
    assert_eq!(Object::string("42").as_int(), None);
    assert!(Object::symbol("x").as_pair().is_none());
}

#[test]
fn test_list_builder() {
    let mut lb = ListBuilder::new();
    assert!(lb.is_empty());
    lb.add(Object::symbol("BLOCK"))
        .add(Object::int(1))
        .extend_list(&Object::list(vec![Object::int(2), Object::int(3)]));
    let list = lb.list();

    assert_eq!(list.to_string(), "(BLOCK 1 2 3)");
    assert_eq!(list.length(), 4);
    assert_eq!(list.nth(3).as_int(), Some(3));
    assert!(list.nth(4).is_nil());
}

#[test]
fn test_list_builder_keeps_improper_tail() {
    let dotted = Object::cons(Object::int(1), Object::int(2));
    let mut lb = ListBuilder::new();
    lb.add(Object::int(0)).extend_list(&dotted);
    assert_eq!(lb.list().to_string(), "(0 1 . 2)");
}

#[test]
fn test_iteration() {
    let list = read("(a b c . d)").unwrap();
    let names: Vec<String> = list.iter().map(text_value).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(list.pairs().count(), 3);
    assert_eq!(list.skip(2).cdr(), &Object::symbol("d"));
}

#[test]
fn test_assoc() {
    let alist = read(r#"(x ("class" . "a") (walk-pos . 3) ("class" . "b"))"#).unwrap();
    let found = alist.assoc(&Object::string("class")).unwrap();
    assert_eq!(found.cdr().as_str(), Some("a"));

    let pos = alist.assoc(&Object::symbol("walk-pos")).unwrap();
    assert_eq!(pos.cdr().as_int(), Some(3));

    assert!(alist.assoc(&Object::string("id")).is_none());
    assert!(Object::nil().assoc(&Object::string("class")).is_none());
}

#[test]
fn test_value_equality() {
    let a = read(r#"(BLOCK (TEXT "a"))"#).unwrap();
    let b = Object::list(vec![
        Object::symbol("BLOCK"),
        Object::list(vec![Object::symbol("TEXT"), Object::string("a")]),
    ]);
    assert_eq!(a, b);
    assert_ne!(a, read(r#"(BLOCK (TEXT "b"))"#).unwrap());
    assert_ne!(Object::string("TEXT"), Object::symbol("TEXT"));
}

#[test]
fn test_has_head() {
    let text = read(r#"(TEXT "a")"#).unwrap();
    assert!(text.has_head(&Symbol::intern("TEXT")));
    assert!(!text.has_head(&Symbol::intern("PARA")));
    assert!(!Object::string("TEXT").has_head(&Symbol::intern("TEXT")));
}

#[test]
fn test_text_value() {
    assert_eq!(text_value(&Object::string("a b")), "a b");
    assert_eq!(text_value(&Object::symbol("HOSTED")), "HOSTED");
    assert_eq!(text_value(&Object::int(7)), "7");
    assert_eq!(text_value(&Object::nil()), "()");
}

#[test]
fn test_json_serialization() {
    let obj = read(r#"(LINK (("-" . "x")) (HOSTED "/z") (TEXT "go"))"#).unwrap();
    let json = serde_json::to_value(&obj).unwrap();
    assert_eq!(
        json,
        serde_json::json!(["LINK", [["-", ".", "x"]], ["HOSTED", "/z"], ["TEXT", "go"]])
    );
}

#[test]
fn test_shared_across_threads() {
    let doc = read(r#"(BLOCK (PARA (TEXT "shared")))"#).unwrap();
    let copy = doc.clone();
    let printed = std::thread::spawn(move || copy.to_string())
        .join()
        .unwrap();
    assert_eq!(printed, doc.to_string());
}

#[test]
fn test_long_list_compare_and_drop() {
    let n = 1_000_000;
    let a = Object::list((0..n).map(Object::int));
    let b = Object::list((0..n).map(Object::int));
    assert_eq!(a, b);
    assert_ne!(a, Object::list((0..n).map(|i| Object::int(i + 1))));
    assert_eq!(a.length(), n as usize);

    // A shared tail survives dropping the list that points into it.
    let tail = b.skip(n as usize - 2).clone();
    drop(a);
    drop(b);
    assert_eq!(tail.to_string(), "(999998 999999)");
}
