//! Symbol interner
//!
//! Every identifier spelling is interned once for the whole run. Symbols
//! are `Copy` handles, so the resolver and scope tree key their maps by
//! symbol instead of by string.

use std::collections::HashSet;
use std::fmt;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

/// Canonical handle for an identifier spelling
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(DefaultSymbol);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use string_interner::Symbol as _;
        write!(f, "Symbol({})", self.0.to_usize())
    }
}

/// Token classification attached to a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Identifier,
    /// Reserved word; never usable as a name
    Keyword,
}

/// Python reserved words. ChocoPy only uses some of them, but all are
/// rejected as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Symbols the analyzer refers to by name
#[derive(Debug, Clone, Copy)]
pub struct KnownSymbols {
    pub self_: Symbol,
    pub init: Symbol,
    pub object: Symbol,
    pub int: Symbol,
    pub str: Symbol,
    pub bool: Symbol,
    pub none: Symbol,
    pub empty: Symbol,
    pub print: Symbol,
    pub input: Symbol,
    pub len: Symbol,
}

/// Interner mapping spellings to [`Symbol`]s
pub struct SymbolTable {
    interner: StringInterner<DefaultBackend>,
    keywords: HashSet<Symbol>,
    known: KnownSymbols,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut interner = StringInterner::<DefaultBackend>::new();
        let mut intern = |s: &str| Symbol(interner.get_or_intern(s));

        let keywords = RESERVED_WORDS.iter().map(|w| intern(w)).collect();
        let known = KnownSymbols {
            self_: intern("self"),
            init: intern("__init__"),
            object: intern("object"),
            int: intern("int"),
            str: intern("str"),
            bool: intern("bool"),
            none: intern("<None>"),
            empty: intern("<Empty>"),
            print: intern("print"),
            input: intern("input"),
            len: intern("len"),
        };

        Self {
            interner,
            keywords,
            known,
        }
    }

    /// Intern `name`, returning the existing symbol if already present
    pub fn intern(&mut self, name: &str) -> Symbol {
        Symbol(self.interner.get_or_intern(name))
    }

    /// Look up a spelling without interning it
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.interner.get(name).map(Symbol)
    }

    /// Spelling of `symbol`
    pub fn name(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol.0).unwrap_or("<unknown>")
    }

    pub fn kind(&self, symbol: Symbol) -> SymbolKind {
        if self.keywords.contains(&symbol) {
            SymbolKind::Keyword
        } else {
            SymbolKind::Identifier
        }
    }

    pub fn known(&self) -> &KnownSymbols {
        &self.known
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intern_is_canonical() {
        let mut table = SymbolTable::new();
        let a = table.intern("counter");
        let b = table.intern("counter");
        let c = table.intern("count");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.name(a), "counter");
        assert_eq!(table.lookup("count"), Some(c));
        assert_eq!(table.lookup("missing"), None);
    }

    #[test]
    fn test_known_symbols_are_preinterned() {
        let mut table = SymbolTable::new();
        let known = *table.known();
        assert_eq!(table.intern("__init__"), known.init);
        assert_eq!(table.intern("<Empty>"), known.empty);
        assert_eq!(table.name(known.self_), "self");
    }

    #[test]
    fn test_keyword_classification() {
        let mut table = SymbolTable::new();
        let lambda = table.intern("lambda");
        let name = table.intern("lambda_");
        assert_eq!(table.kind(lambda), SymbolKind::Keyword);
        assert_eq!(table.kind(name), SymbolKind::Identifier);
    }
}
