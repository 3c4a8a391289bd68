//! Expression AST nodes

use super::{DeclId, Identifier};
use crate::common::Span;
use crate::frontend::sema::TypeId;
use std::cell::Cell;
use std::fmt;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Type of this expression (filled in during semantic analysis)
    inferred: Cell<Option<TypeId>>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            inferred: Cell::new(None),
        }
    }

    pub fn inferred_type(&self) -> Option<TypeId> {
        self.inferred.get()
    }

    pub fn set_inferred_type(&self, ty: TypeId) {
        self.inferred.set(Some(ty));
    }

    /// Whether this expression may appear left of `=`
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Name(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

/// Reference to a declaration by plain name
#[derive(Debug, Clone)]
pub struct NameRef {
    pub name: Identifier,
    /// Declaration this name resolved to (filled in during semantic analysis)
    decl: Cell<Option<DeclId>>,
}

impl NameRef {
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            decl: Cell::new(None),
        }
    }

    pub fn resolved(&self) -> Option<DeclId> {
        self.decl.get()
    }

    pub fn resolve_to(&self, decl: DeclId) {
        self.decl.set(Some(decl));
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Binary operation: `a + b`, `x is None`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: `-x`, `not flag`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Function or constructor call: `f(a, b)`, `A()`
    Call {
        function: NameRef,
        args: Vec<Expr>,
    },

    /// Plain name: `x`
    Name(NameRef),

    /// Conditional expression: `a if cond else b`
    IfExpr {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// List element: `xs[i]`
    Index {
        list: Box<Expr>,
        index: Box<Expr>,
    },

    /// List display: `[1, 2, 3]`
    List(Vec<Expr>),

    Literal(Literal),

    /// Attribute access: `obj.field`
    Member {
        object: Box<Expr>,
        member: Identifier,
    },

    /// Method call: `obj.method(a)`
    MethodCall {
        object: Box<Expr>,
        method: Identifier,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    None,
    Str(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Is => "is",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Minus,
    /// `not x`
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Minus => f.write_str("-"),
            UnaryOp::Not => f.write_str("not"),
        }
    }
}
