//! Type annotations as written in source

use crate::common::Span;
use crate::frontend::sema::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeAnnotationKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotationKind {
    /// Class name: `int`, `A`, or the string form `"A"`
    Class(Symbol),
    /// List type: `[T]`
    List(Box<TypeAnnotation>),
}

impl TypeAnnotation {
    pub fn new(kind: TypeAnnotationKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn class(symbol: Symbol, span: Span) -> Self {
        Self::new(TypeAnnotationKind::Class(symbol), span)
    }

    pub fn list(element: TypeAnnotation, span: Span) -> Self {
        Self::new(TypeAnnotationKind::List(Box::new(element)), span)
    }

    /// Innermost class name, looking through any list brackets
    pub fn base_class(&self) -> (Symbol, Span) {
        match &self.kind {
            TypeAnnotationKind::Class(symbol) => (*symbol, self.span),
            TypeAnnotationKind::List(element) => element.base_class(),
        }
    }
}
