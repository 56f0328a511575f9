//! Structural validation of documents in their s-expression layout.

use crate::build::reference_parts;
use crate::node::{FormatKind, ListKind, LiteralKind, RegionKind, VerbatimKind};
use crate::symbols;
use rhizome_zettel_sx::{Object, Symbol};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not a node: {0}")]
    NotANode(String),

    #[error("unknown node kind: {0}")]
    UnknownKind(String),

    #[error("missing {field} in {kind}")]
    MissingField { kind: String, field: &'static str },

    #[error("invalid {field} in {kind}: expected {expected}")]
    InvalidField {
        kind: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} of {kind} is not a proper list")]
    NotAList { kind: String, field: &'static str },
}

/// Validate a document for structural correctness.
///
/// Every node reachable through the child regions the walker visits must
/// have a known kind and its fixed fields with the right types. `UNKNOWN`
/// nodes are accepted as they are. The inline children of an inline BLOB
/// are not checked, since they are never walked.
pub fn validate(obj: &Object) -> Result<(), ValidationError> {
    validate_node(obj).inspect_err(|err| tracing::debug!(%err, "invalid document"))
}

/// Cursor over the fields of one node.
struct Fields<'a> {
    kind: &'a Symbol,
    rest: &'a Object,
}

impl<'a> Fields<'a> {
    fn kind(&self) -> String {
        self.kind.name().to_string()
    }

    fn next(&mut self, field: &'static str) -> Result<&'a Object, ValidationError> {
        let pair = self.rest.as_pair().ok_or_else(|| ValidationError::MissingField {
            kind: self.kind(),
            field,
        })?;
        self.rest = pair.cdr();
        Ok(pair.car())
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> ValidationError {
        ValidationError::InvalidField {
            kind: self.kind(),
            field,
            expected,
        }
    }

    fn string(&mut self, field: &'static str) -> Result<&'a str, ValidationError> {
        let value = self.next(field)?;
        value.as_str().ok_or_else(|| self.invalid(field, "string"))
    }

    fn list(&mut self, field: &'static str) -> Result<&'a Object, ValidationError> {
        let value = self.next(field)?;
        if value.is_list() {
            Ok(value)
        } else {
            Err(self.invalid(field, "list"))
        }
    }

    fn attrs(&mut self) -> Result<(), ValidationError> {
        self.list("attrs").map(|_| ())
    }

    fn nodes(&mut self, field: &'static str) -> Result<(), ValidationError> {
        let list = self.list(field)?;
        validate_list(self.kind, field, list)
    }

    fn reference(&mut self) -> Result<(), ValidationError> {
        let value = self.next("reference")?;
        match reference_parts(value) {
            Some(_) => Ok(()),
            None => Err(self.invalid("reference", "reference")),
        }
    }

    /// The remaining fields are child nodes.
    fn children(self, field: &'static str) -> Result<(), ValidationError> {
        validate_list(self.kind, field, self.rest)
    }
}

fn validate_list(kind: &Symbol, field: &'static str, list: &Object) -> Result<(), ValidationError> {
    let mut current = list;
    while let Some(pair) = current.as_pair() {
        validate_node(pair.car())?;
        current = pair.cdr();
    }
    if current.is_nil() {
        Ok(())
    } else {
        Err(ValidationError::NotAList {
            kind: kind.name().to_string(),
            field,
        })
    }
}

fn validate_node(obj: &Object) -> Result<(), ValidationError> {
    let Some(kind) = obj.car().as_symbol() else {
        return Err(ValidationError::NotANode(obj.to_string()));
    };
    if kind == &*symbols::UNKNOWN {
        return Ok(());
    }
    if !symbols::is_node_kind(kind) {
        return Err(ValidationError::UnknownKind(kind.name().to_string()));
    }

    let mut fields = Fields {
        kind,
        rest: obj.cdr(),
    };

    if VerbatimKind::from_symbol(kind).is_some() || LiteralKind::from_symbol(kind).is_some() {
        fields.attrs()?;
        fields.string("text")?;
        return Ok(());
    }
    if RegionKind::from_symbol(kind).is_some() {
        fields.attrs()?;
        fields.nodes("blocks")?;
        return fields.children("inlines");
    }
    if ListKind::from_symbol(kind).is_some() {
        fields.attrs()?;
        return fields.children("items");
    }
    if FormatKind::from_symbol(kind).is_some() {
        fields.attrs()?;
        return fields.children("inlines");
    }

    if kind == &*symbols::BLOCK
        || kind == &*symbols::INLINE
        || kind == &*symbols::PARA
        || kind == &*symbols::SPECIAL_SPLICE
    {
        fields.children("children")
    } else if kind == &*symbols::TEXT {
        fields.string("text").map(|_| ())
    } else if kind == &*symbols::SOFT || kind == &*symbols::HARD {
        Ok(())
    } else if kind == &*symbols::THEMATIC {
        fields.attrs()
    } else if kind == &*symbols::HEADING {
        let level = fields.next("level")?;
        if level.as_int().is_none() {
            return Err(fields.invalid("level", "integer"));
        }
        fields.attrs()?;
        fields.string("slug")?;
        fields.string("fragment")?;
        fields.children("inlines")
    } else if kind == &*symbols::DESCRIPTION {
        fields.attrs()?;
        validate_description(kind, fields.rest)
    } else if kind == &*symbols::TABLE {
        fields.attrs()?;
        fields.nodes("header")?;
        while !fields.rest.is_nil() {
            fields.nodes("row")?;
        }
        Ok(())
    } else if kind == &*symbols::CELL || kind == &*symbols::ENDNOTE {
        fields.attrs()?;
        fields.children("inlines")
    } else if kind == &*symbols::TRANSCLUDE || kind == &*symbols::LINK {
        fields.attrs()?;
        fields.reference()?;
        fields.children("inlines")
    } else if kind == &*symbols::EMBED {
        fields.attrs()?;
        fields.next("reference")?;
        fields.string("syntax")?;
        fields.children("inlines")
    } else if kind == &*symbols::BLOB {
        fields.attrs()?;
        fields.nodes("description")?;
        fields.string("syntax")?;
        fields.string("content").map(|_| ())
    } else if kind == &*symbols::EMBED_BLOB {
        fields.attrs()?;
        fields.string("syntax")?;
        fields.string("content").map(|_| ())
    } else if kind == &*symbols::CITE {
        fields.attrs()?;
        fields.string("key")?;
        fields.children("inlines")
    } else if kind == &*symbols::MARK {
        fields.string("mark")?;
        fields.string("slug")?;
        fields.string("fragment")?;
        fields.children("inlines")
    } else {
        Err(ValidationError::UnknownKind(kind.name().to_string()))
    }
}

// Terms are inline lists; a values slot is a node or nil.
fn validate_description(kind: &Symbol, entries: &Object) -> Result<(), ValidationError> {
    let mut current = entries;
    let mut is_term = true;
    while let Some(pair) = current.as_pair() {
        let item = pair.car();
        if is_term {
            if !item.is_list() {
                return Err(ValidationError::InvalidField {
                    kind: kind.name().to_string(),
                    field: "term",
                    expected: "list",
                });
            }
            validate_list(kind, "term", item)?;
        } else if !item.is_nil() {
            validate_node(item)?;
        }
        is_term = !is_term;
        current = pair.cdr();
    }
    if current.is_nil() {
        Ok(())
    } else {
        Err(ValidationError::NotAList {
            kind: kind.name().to_string(),
            field: "entries",
        })
    }
}
