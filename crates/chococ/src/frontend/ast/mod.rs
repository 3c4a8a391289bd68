//! Abstract Syntax Tree definitions
//!
//! Declarations live in the [`AstContext`] arena and are referenced by
//! [`DeclId`]. Statements and expressions are owned inline. The tree is
//! immutable once parsed; semantic analysis only fills the `Cell` slots on
//! expressions (inferred type, resolved declaration).

mod context;
mod decl;
mod expr;
mod stmt;
mod types;

pub use context::{AstContext, Builtins};
pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

/// A complete ChocoPy program
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<DeclId>,
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(declarations: Vec<DeclId>, statements: Vec<Stmt>) -> Self {
        Self {
            declarations,
            statements,
        }
    }
}
