//! Semantic analysis
//!
//! One forward pass over the program that registers declarations,
//! resolves names, infers a type for every expression and validates the
//! class hierarchy. User errors become [`Diagnostic`](crate::common::Diagnostic)s
//! and never stop the pass.

mod analyzer;
mod resolver;
mod scope;
mod symbol;
mod types;


pub use analyzer::SemanticAnalyzer;
pub use resolver::IdentifierResolver;
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{KnownSymbols, Symbol, SymbolKind, SymbolTable};
pub use types::{FuncType, FuncTypeId, TypeId, TypeUniverse, ValueType};
