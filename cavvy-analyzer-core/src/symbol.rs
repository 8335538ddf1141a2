use lsp_types::{Position, Range};
use serde::Serialize;

/// What a symbol is, carrying only the fields that exist for that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SymbolKind {
    Class {
        supertype: Option<String>,
    },
    Method {
        /// Enclosing class, if the method was declared inside one.
        class: Option<String>,
        return_type: String,
    },
    Field {
        class: String,
        field_type: String,
    },
    Variable {
        method: String,
        var_type: String,
    },
    Parameter {
        method: String,
    },
    /// A use of a name rather than a declaration. Never produced by the
    /// extractor; reserved for reference results assembled by callers.
    Reference,
}

/// A named declared entity with its source location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub range: Range,
    /// Spans just the name; always contained in `range`.
    pub selection_range: Range,
    #[serde(flatten)]
    pub kind: SymbolKind,
}

impl Symbol {
    /// Name of the enclosing class (for methods and fields) or method (for
    /// variables and parameters).
    pub fn parent(&self) -> Option<&str> {
        match &self.kind {
            SymbolKind::Class { .. } | SymbolKind::Reference => None,
            SymbolKind::Method { class, .. } => class.as_deref(),
            SymbolKind::Field { class, .. } => Some(class),
            SymbolKind::Variable { method, .. } => Some(method),
            SymbolKind::Parameter { method } => Some(method),
        }
    }

    /// Human-readable detail shown next to the symbol in an outline.
    pub fn detail(&self) -> Option<String> {
        match &self.kind {
            SymbolKind::Class { supertype } => {
                supertype.as_ref().map(|s| format!("extends {s}"))
            }
            SymbolKind::Method { return_type, .. } => Some(format!("() -> {return_type}")),
            SymbolKind::Field { field_type, .. } => Some(field_type.clone()),
            SymbolKind::Variable { var_type, .. } => Some(var_type.clone()),
            SymbolKind::Parameter { .. } | SymbolKind::Reference => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class { .. })
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, SymbolKind::Field { .. })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, SymbolKind::Parameter { .. })
    }

    /// The closest `lsp_types::SymbolKind`, for consumers speaking LSP.
    pub fn lsp_kind(&self) -> lsp_types::SymbolKind {
        match self.kind {
            SymbolKind::Class { .. } => lsp_types::SymbolKind::CLASS,
            SymbolKind::Method { .. } => lsp_types::SymbolKind::METHOD,
            SymbolKind::Field { .. } => lsp_types::SymbolKind::FIELD,
            SymbolKind::Variable { .. } | SymbolKind::Parameter { .. } => {
                lsp_types::SymbolKind::VARIABLE
            }
            SymbolKind::Reference => lsp_types::SymbolKind::NULL,
        }
    }
}

/// The extracted symbols of one buffer, with read-only projections over them.
///
/// All queries are linear scans; callers wanting repeated lookups cache the
/// table themselves for the lifetime of one analysis pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// First symbol whose range contains `position` (end exclusive).
    pub fn symbol_at(&self, position: Position) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|s| range_contains(&s.range, position))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_class())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_method())
    }

    pub fn fields(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_field())
    }

    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_variable())
    }

    /// Methods declared in the named class.
    pub fn methods_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.methods().filter(move |s| s.parent() == Some(class))
    }

    /// Every symbol whose parent is the named class or method.
    pub fn members_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols
            .iter()
            .filter(move |s| s.parent() == Some(parent))
    }
}

impl IntoIterator for SymbolTable {
    type Item = Symbol;
    type IntoIter = std::vec::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

fn range_contains(range: &Range, position: Position) -> bool {
    range.start <= position && position < range.end
}
