//! Declaration AST nodes

use super::{Expr, Stmt, TypeAnnotation};
use crate::common::Span;
use crate::frontend::sema::Symbol;

/// Index of a declaration in the [`AstContext`](super::AstContext) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(super) u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A name together with where it was written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identifier {
    pub symbol: Symbol,
    pub span: Span,
}

impl Identifier {
    pub fn new(symbol: Symbol, span: Span) -> Self {
        Self { symbol, span }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Identifier,
    pub kind: DeclKind,
    pub span: Span,
}

impl Declaration {
    pub fn new(name: Identifier, kind: DeclKind, span: Span) -> Self {
        Self { name, kind, span }
    }

    pub fn as_class(&self) -> Option<&ClassDef> {
        match &self.kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDef> {
        match &self.kind {
            DeclKind::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclKind::Class(_))
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, DeclKind::Func(_))
    }

    /// Variable or parameter: something usable as a value
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, DeclKind::Var(_) | DeclKind::Param(_))
    }

    /// Declared type of a variable or parameter
    pub fn value_annotation(&self) -> Option<&TypeAnnotation> {
        match &self.kind {
            DeclKind::Var(var) => Some(&var.ty),
            DeclKind::Param(param) => Some(&param.ty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    /// `class A(B): ...`
    Class(ClassDef),

    /// `def f(x: int) -> str: ...`
    Func(FuncDef),

    /// `global x`
    Global,

    /// `nonlocal x`
    NonLocal,

    /// Function parameter `x: int`
    Param(ParamDecl),

    /// Variable definition `x: int = 0`
    Var(VarDef),
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    /// `None` only for `object`
    pub super_class: Option<Identifier>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct FuncDef {
    pub params: Vec<DeclId>,
    pub return_type: Option<TypeAnnotation>,
    pub declarations: Vec<DeclId>,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub ty: TypeAnnotation,
}

#[derive(Debug, Clone)]
pub struct VarDef {
    pub ty: TypeAnnotation,
    /// Literal initializer
    pub value: Expr,
}
