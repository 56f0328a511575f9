//! S-expression values.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

/// Global symbol table. Every symbol name is stored exactly once.
static SYMBOLS: LazyLock<Mutex<HashSet<Arc<str>>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// The shared nil value, handed out by the tolerant accessors.
static NIL: Object = Object::Nil;

/// An interned symbol.
///
/// Two symbols with the same name are the same symbol: equality and hashing
/// use the identity of the interned name, not its text.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Returns the symbol with the given name, creating it on first use.
    pub fn intern(name: &str) -> Self {
        let mut table = SYMBOLS.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(name) {
            return Symbol(existing.clone());
        }
        let name: Arc<str> = Arc::from(name);
        table.insert(name.clone());
        Symbol(name)
    }

    /// Returns the name of the symbol.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A cons cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    car: Object,
    cdr: Object,
}

// Unlinks the tail one cell at a time, so long lists drop without recursion.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut rest = std::mem::take(&mut self.cdr);
        while let Object::Pair(pair) = rest {
            match Arc::try_unwrap(pair) {
                Ok(mut pair) => rest = std::mem::take(&mut pair.cdr),
                Err(_) => break,
            }
        }
    }
}

impl Pair {
    /// The first element of the cell.
    pub fn car(&self) -> &Object {
        &self.car
    }

    /// The rest of the cell.
    pub fn cdr(&self) -> &Object {
        &self.cdr
    }
}

/// An s-expression value.
///
/// Lists are chains of immutable, reference-counted cons cells, so cloning a
/// value never copies its structure.
#[derive(Debug, Clone, Default)]
pub enum Object {
    /// The empty list.
    #[default]
    Nil,
    Pair(Arc<Pair>),
    String(String),
    Int(i64),
    Symbol(Symbol),
}

// Compares along the tail iteratively; only nesting depth recurses.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            match (left, right) {
                (Object::Pair(a), Object::Pair(b)) => {
                    if Arc::ptr_eq(a, b) {
                        return true;
                    }
                    if a.car != b.car {
                        return false;
                    }
                    left = &a.cdr;
                    right = &b.cdr;
                }
                (Object::Nil, Object::Nil) => return true,
                (Object::String(a), Object::String(b)) => return a == b,
                (Object::Int(a), Object::Int(b)) => return a == b,
                (Object::Symbol(a), Object::Symbol(b)) => return a == b,
                _ => return false,
            }
        }
    }
}

impl Eq for Object {}

impl Object {
    /// Creates the empty list.
    pub fn nil() -> Self {
        Object::Nil
    }

    /// Creates a cons cell.
    pub fn cons(car: impl Into<Object>, cdr: impl Into<Object>) -> Self {
        Object::Pair(Arc::new(Pair {
            car: car.into(),
            cdr: cdr.into(),
        }))
    }

    /// Creates a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Object::String(value.into())
    }

    /// Creates an integer value.
    pub fn int(value: i64) -> Self {
        Object::Int(value)
    }

    /// Creates a symbol value, interning the name.
    pub fn symbol(name: &str) -> Self {
        Object::Symbol(Symbol::intern(name))
    }

    /// Creates a proper list from the given elements.
    pub fn list(items: impl IntoIterator<Item = Object>) -> Self {
        items.into_iter().collect()
    }

    /// Returns true for the empty list.
    pub fn is_nil(&self) -> bool {
        matches!(self, Object::Nil)
    }

    /// Returns true for a cons cell.
    pub fn is_pair(&self) -> bool {
        matches!(self, Object::Pair(_))
    }

    /// Returns true for everything that is not a cons cell. Nil is an atom.
    pub fn is_atom(&self) -> bool {
        !self.is_pair()
    }

    /// Returns true for nil or a cons cell.
    pub fn is_list(&self) -> bool {
        matches!(self, Object::Nil | Object::Pair(_))
    }

    /// Returns the cons cell if this is a Pair.
    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Object::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Returns the inner string if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the inner integer if this is an Int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Object::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the symbol if this is a Symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Object::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// First element of a cons cell, nil otherwise.
    pub fn car(&self) -> &Object {
        match self {
            Object::Pair(pair) => &pair.car,
            _ => &NIL,
        }
    }

    /// Rest of a cons cell, nil otherwise.
    pub fn cdr(&self) -> &Object {
        match self {
            Object::Pair(pair) => &pair.cdr,
            _ => &NIL,
        }
    }

    /// First element, but only if it is a list; nil otherwise.
    pub fn head(&self) -> &Object {
        let car = self.car();
        if car.is_list() { car } else { &NIL }
    }

    /// Rest of the list, but only if it is a list; nil for an improper tail.
    pub fn tail(&self) -> &Object {
        let cdr = self.cdr();
        if cdr.is_list() { cdr } else { &NIL }
    }

    /// Follows `tail` `n` times.
    pub fn skip(&self, n: usize) -> &Object {
        let mut current = self;
        for _ in 0..n {
            current = current.tail();
        }
        current
    }

    /// Element at index `n` of the list, nil if the list is shorter.
    pub fn nth(&self, n: usize) -> &Object {
        self.skip(n).car()
    }

    /// Returns true if this is a cons cell whose first element is `sym`.
    pub fn has_head(&self, sym: &Symbol) -> bool {
        self.car().as_symbol() == Some(sym)
    }

    /// Iterates over the elements of a list. Stops at an improper tail.
    pub fn iter(&self) -> Values<'_> {
        Values { current: self }
    }

    /// Iterates over the cons cells of a list.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs { current: self }
    }

    /// Number of elements of the list.
    pub fn length(&self) -> usize {
        self.pairs().count()
    }

    /// Returns the first element that is a cons cell whose car equals `key`.
    pub fn assoc(&self, key: &Object) -> Option<&Pair> {
        self.iter()
            .filter_map(Object::as_pair)
            .find(|pair| pair.car() == key)
    }
}

impl From<Symbol> for Object {
    fn from(value: Symbol) -> Self {
        Object::Symbol(value)
    }
}

impl From<&Symbol> for Object {
    fn from(value: &Symbol) -> Self {
        Object::Symbol(value.clone())
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::string(value)
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Int(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Object::list(value)
    }
}

impl FromIterator<Object> for Object {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut lb = ListBuilder::new();
        lb.extend(iter);
        lb.list()
    }
}

/// Iterator over the elements of a list.
pub struct Values<'a> {
    current: &'a Object,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Object;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Object::Pair(pair) => {
                self.current = &pair.cdr;
                Some(&pair.car)
            }
            _ => None,
        }
    }
}

/// Iterator over the cons cells of a list.
pub struct Pairs<'a> {
    current: &'a Object,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = &'a Pair;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Object::Pair(pair) => {
                self.current = &pair.cdr;
                Some(pair)
            }
            _ => None,
        }
    }
}

/// Collects elements front to back and produces a list.
#[derive(Debug, Default)]
pub struct ListBuilder {
    items: Vec<Object>,
    last: Object,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one element.
    pub fn add(&mut self, obj: impl Into<Object>) -> &mut Self {
        self.items.push(obj.into());
        self
    }

    /// Appends all elements of `list`. An improper tail becomes the tail of
    /// the built list.
    pub fn extend_list(&mut self, list: &Object) -> &mut Self {
        let mut current = list;
        while let Object::Pair(pair) = current {
            self.items.push(pair.car.clone());
            current = &pair.cdr;
        }
        if !current.is_nil() {
            self.last = current.clone();
        }
        self
    }

    /// Ends the list with `tail` instead of nil.
    pub fn set_tail(&mut self, tail: Object) -> &mut Self {
        self.last = tail;
        self
    }

    /// Returns true if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds the list.
    pub fn list(self) -> Object {
        self.items
            .into_iter()
            .rev()
            .fold(self.last, |acc, item| Object::cons(item, acc))
    }
}

impl Extend<Object> for ListBuilder {
    fn extend<I: IntoIterator<Item = Object>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Returns the string of a string or symbol atom, the printed form otherwise.
pub fn text_value(obj: &Object) -> String {
    match obj {
        Object::String(s) => s.clone(),
        Object::Symbol(sym) => sym.name().to_string(),
        other => other.to_string(),
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Nil => f.write_str("()"),
            Object::Int(i) => write!(f, "{i}"),
            Object::String(s) => write_string(f, s),
            Object::Symbol(sym) => f.write_str(sym.name()),
            Object::Pair(_) => {
                f.write_str("(")?;
                let mut current = self;
                let mut first = true;
                while let Object::Pair(pair) = current {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    write!(f, "{}", pair.car)?;
                    current = &pair.cdr;
                }
                if !current.is_nil() {
                    write!(f, " . {current}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// Lists serialize as sequences; atoms as their natural JSON value.
impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Object::Nil => serializer.serialize_seq(Some(0))?.end(),
            Object::Int(i) => serializer.serialize_i64(*i),
            Object::String(s) => serializer.serialize_str(s),
            Object::Symbol(sym) => sym.serialize(serializer),
            Object::Pair(_) => {
                let mut seq = serializer.serialize_seq(None)?;
                for item in self.iter() {
                    seq.serialize_element(item)?;
                }
                let mut end = self;
                while let Object::Pair(pair) = end {
                    end = &pair.cdr;
                }
                if !end.is_nil() {
                    seq.serialize_element(".")?;
                    seq.serialize_element(end)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_interned() {
        let a = Symbol::intern("TEXT");
        let b = Symbol::intern(&String::from("TEXT"));
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_ne!(a, Symbol::intern("text"));
    }

    #[test]
    fn test_tolerant_accessors() {
        let atom = Object::int(3);
        assert!(atom.car().is_nil());
        assert!(atom.cdr().is_nil());
        assert!(Object::nil().nth(4).is_nil());

        let dotted = Object::cons(Object::symbol("a"), Object::string("b"));
        assert_eq!(dotted.cdr().as_str(), Some("b"));
        assert!(dotted.tail().is_nil());
    }

    #[test]
    fn test_display() {
        let list = Object::list(vec![
            Object::symbol("TEXT"),
            Object::string("say \"hi\""),
            Object::int(-2),
            Object::nil(),
        ]);
        assert_eq!(list.to_string(), r#"(TEXT "say \"hi\"" -2 ())"#);

        let dotted = Object::cons(Object::string("class"), Object::string("x"));
        assert_eq!(dotted.to_string(), r#"("class" . "x")"#);
    }
}
