//! Symbols tagging node kinds, reference states, and attributes.
//!
//! Every node of a zettel document is a list whose first element is one of
//! these symbols. They are interned on first use, so comparing a node head
//! with one of them is an identity check.

use rhizome_zettel_sx::Symbol;
use std::collections::HashSet;
use std::sync::LazyLock;

macro_rules! symbols {
    ($($(#[$meta:meta])* $name:ident = $text:literal;)*) => {
        $(
            $(#[$meta])*
            pub static $name: LazyLock<Symbol> = LazyLock::new(|| Symbol::intern($text));
        )*
    };
}

symbols! {
    // Meta nodes
    BLOCK = "BLOCK";
    INLINE = "INLINE";

    // Node kinds
    BLOB = "BLOB";
    CELL = "CELL";
    CITE = "CITE";
    DESCRIPTION = "DESCRIPTION";
    EMBED = "EMBED";
    EMBED_BLOB = "EMBED-BLOB";
    ENDNOTE = "ENDNOTE";
    FORMAT_EMPH = "FORMAT-EMPH";
    FORMAT_DELETE = "FORMAT-DELETE";
    FORMAT_INSERT = "FORMAT-INSERT";
    FORMAT_MARK = "FORMAT-MARK";
    FORMAT_QUOTE = "FORMAT-QUOTE";
    FORMAT_SPAN = "FORMAT-SPAN";
    FORMAT_SUB = "FORMAT-SUB";
    FORMAT_SUPER = "FORMAT-SUPER";
    FORMAT_STRONG = "FORMAT-STRONG";
    HARD = "HARD";
    HEADING = "HEADING";
    LINK = "LINK";
    LIST_ORDERED = "ORDERED";
    LIST_UNORDERED = "UNORDERED";
    LIST_QUOTE = "QUOTATION";
    LITERAL_CODE = "LITERAL-CODE";
    LITERAL_COMMENT = "LITERAL-COMMENT";
    LITERAL_INPUT = "LITERAL-INPUT";
    LITERAL_MATH = "LITERAL-MATH";
    LITERAL_OUTPUT = "LITERAL-OUTPUT";
    MARK = "MARK";
    PARA = "PARA";
    REGION_BLOCK = "REGION-BLOCK";
    REGION_QUOTE = "REGION-QUOTE";
    REGION_VERSE = "REGION-VERSE";
    SOFT = "SOFT";
    TABLE = "TABLE";
    TEXT = "TEXT";
    THEMATIC = "THEMATIC";
    TRANSCLUDE = "TRANSCLUDE";
    UNKNOWN = "UNKNOWN";
    VERBATIM_CODE = "VERBATIM-CODE";
    VERBATIM_COMMENT = "VERBATIM-COMMENT";
    VERBATIM_EVAL = "VERBATIM-EVAL";
    VERBATIM_HTML = "VERBATIM-HTML";
    VERBATIM_MATH = "VERBATIM-MATH";
    VERBATIM_ZETTEL = "VERBATIM-ZETTEL";

    /// Placeholder whose children replace it in the parent list.
    SPECIAL_SPLICE = "SPECIAL-SPLICE";

    // Reference states
    /// Absolute URL, e.g. `https://t73f.de/links/software`.
    REF_STATE_EXTERNAL = "EXTERNAL";
    /// Site-relative, e.g. `./foo`, `../foo`, `/foo/bar`.
    REF_STATE_HOSTED = "HOSTED";
    /// Syntactically invalid, e.g. `:t73f.de/r/zsx`.
    REF_STATE_INVALID = "INVALID";
    /// Same document, e.g. `.`, `.#ext`, `#ext`.
    REF_STATE_SELF = "SELF";

    // Attributes
    ATTR_ALIGN = "align";
}

/// Values of the `align` attribute.
pub const ATTR_ALIGN_CENTER: &str = "center";
pub const ATTR_ALIGN_LEFT: &str = "left";
pub const ATTR_ALIGN_RIGHT: &str = "right";

static NODE_KINDS: LazyLock<HashSet<Symbol>> = LazyLock::new(|| {
    [
        &BLOCK,
        &INLINE,
        &BLOB,
        &CELL,
        &CITE,
        &DESCRIPTION,
        &EMBED,
        &EMBED_BLOB,
        &ENDNOTE,
        &FORMAT_EMPH,
        &FORMAT_DELETE,
        &FORMAT_INSERT,
        &FORMAT_MARK,
        &FORMAT_QUOTE,
        &FORMAT_SPAN,
        &FORMAT_SUB,
        &FORMAT_SUPER,
        &FORMAT_STRONG,
        &HARD,
        &HEADING,
        &LINK,
        &LIST_ORDERED,
        &LIST_UNORDERED,
        &LIST_QUOTE,
        &LITERAL_CODE,
        &LITERAL_COMMENT,
        &LITERAL_INPUT,
        &LITERAL_MATH,
        &LITERAL_OUTPUT,
        &MARK,
        &PARA,
        &REGION_BLOCK,
        &REGION_QUOTE,
        &REGION_VERSE,
        &SOFT,
        &TABLE,
        &TEXT,
        &THEMATIC,
        &TRANSCLUDE,
        &VERBATIM_CODE,
        &VERBATIM_COMMENT,
        &VERBATIM_EVAL,
        &VERBATIM_HTML,
        &VERBATIM_MATH,
        &VERBATIM_ZETTEL,
        &SPECIAL_SPLICE,
    ]
    .into_iter()
    .map(|sym| Symbol::clone(sym))
    .collect()
});

/// Returns true if `sym` tags one of the node kinds, including splices.
pub fn is_node_kind(sym: &Symbol) -> bool {
    NODE_KINDS.contains(sym)
}

/// Returns true if `sym` is one of the reference states.
pub fn is_reference_state(sym: &Symbol) -> bool {
    [
        &REF_STATE_EXTERNAL,
        &REF_STATE_HOSTED,
        &REF_STATE_INVALID,
        &REF_STATE_SELF,
    ]
    .into_iter()
    .any(|state| sym == &**state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        assert!(is_node_kind(&TEXT));
        assert!(is_node_kind(&Symbol::intern("FORMAT-SUPER")));
        assert!(is_node_kind(&SPECIAL_SPLICE));
        assert!(!is_node_kind(&UNKNOWN));
        assert!(!is_node_kind(&REF_STATE_SELF));
        assert!(!is_node_kind(&Symbol::intern("text")));
    }

    #[test]
    fn test_reference_states() {
        assert!(is_reference_state(&Symbol::intern("HOSTED")));
        assert!(!is_reference_state(&LINK));
    }
}
