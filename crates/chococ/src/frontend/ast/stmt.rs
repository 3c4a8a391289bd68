//! Statement AST nodes

use super::Expr;
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `a = b = value`
    Assign { targets: Vec<Expr>, value: Expr },

    /// Expression statement
    Expr(Expr),

    /// `for x in iterable: body`; `target` is always a name
    For {
        target: Expr,
        iterable: Expr,
        body: Vec<Stmt>,
    },

    /// `if` with optional `else`; `elif` nests another `If` in `else_body`
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    Return(Option<Expr>),

    While { condition: Expr, body: Vec<Stmt> },

    Pass,
}
