//! Semantic analyzer - resolution and type checking

mod decl;
mod expr;
mod stmt;

use super::{IdentifierResolver, ScopeKind, ScopeTree, Symbol, TypeId, TypeUniverse};
use crate::common::{CompileResult, DiagKind, Diagnostic, DiagnosticSink, Span};
use crate::frontend::ast::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Single-pass semantic analyzer
///
/// Fills the inferred-type slot of every expression and the declaration
/// back-link of every name reference. Returns `Err` only when the AST
/// breaks a structural guarantee of the parser.
pub struct SemanticAnalyzer<'a> {
    ctx: &'a AstContext,
    types: &'a mut TypeUniverse,
    sink: &'a mut dyn DiagnosticSink,
    scopes: ScopeTree,
    resolver: IdentifierResolver,
    /// Classes whose bodies have been fully analyzed, built-ins included
    completed_classes: HashSet<DeclId>,
    /// Validated superclass of each class
    super_classes: HashMap<DeclId, DeclId>,
    /// Expected return type of each function being analyzed, innermost last
    return_types: Vec<TypeId>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(
        ctx: &'a AstContext,
        types: &'a mut TypeUniverse,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            ctx,
            types,
            sink,
            scopes: ScopeTree::new(),
            resolver: IdentifierResolver::new(),
            completed_classes: HashSet::new(),
            super_classes: HashMap::new(),
            return_types: Vec::new(),
        }
    }

    /// Analyze a whole program
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn analyze(&mut self, program: &Program) -> CompileResult<()> {
        self.register_builtins();

        for &decl in &program.declarations {
            self.declare(decl);
        }
        for &decl in &program.declarations {
            self.analyze_declaration(decl)?;
        }
        for stmt in &program.statements {
            self.analyze_stmt(stmt)?;
        }

        debug!(errors = self.sink.error_count(), "semantic analysis finished");
        Ok(())
    }

    fn register_builtins(&mut self) {
        let builtins = *self.ctx.builtins();
        for class in builtins.classes() {
            self.register(class);
            self.completed_classes.insert(class);
            if class != builtins.object {
                self.super_classes.insert(class, builtins.object);
            }
        }
        for func in builtins.functions() {
            self.register(func);
        }
    }

    // =========================================================================
    // Scope bookkeeping
    // =========================================================================

    /// Add `decl` to the current scope and make it visible by name
    fn register(&mut self, decl: DeclId) {
        let symbol = self.decl(decl).name.symbol;
        if self.scopes.add_decl(decl, symbol) {
            trace!(name = self.ctx.name_of(decl), "register");
            self.resolver.add_decl(decl, symbol);
        }
    }

    fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(kind);
    }

    /// Close the current scope, unregistering its declarations newest first
    fn pop_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        let ctx = self.ctx;
        for &decl in self.scopes.get(scope).decls().iter().rev() {
            self.resolver.remove_decl(decl, ctx.decl(decl).name.symbol);
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    fn decl(&self, id: DeclId) -> &'a Declaration {
        self.ctx.decl(id)
    }

    fn name(&self, symbol: Symbol) -> &'a str {
        self.ctx.symbols().name(symbol)
    }

    /// Declaration a plain use of `symbol` refers to
    ///
    /// Class members are not in scope inside their methods, so bindings
    /// living in an enclosing class scope are skipped.
    fn lookup_name(&self, symbol: Symbol) -> Option<DeclId> {
        self.resolver
            .iter(symbol)
            .find(|&decl| !self.is_hidden_member(decl, symbol))
    }

    fn is_hidden_member(&self, decl: DeclId, symbol: Symbol) -> bool {
        let current = self.scopes.current();
        self.scopes.open_scopes().iter().any(|&scope| {
            scope != current
                && self.scopes.kind(scope) == ScopeKind::Class
                && self.scopes.lookup_local(scope, symbol) == Some(decl)
        })
    }

    /// Class declared at global scope under `symbol`
    fn global_class(&self, symbol: Symbol) -> Option<DeclId> {
        self.scopes
            .lookup_local(self.scopes.global(), symbol)
            .filter(|&decl| self.decl(decl).is_class())
    }

    /// Class declaration behind a class value type
    fn class_of_type(&self, ty: TypeId) -> Option<DeclId> {
        let name = self.types.class_name(ty)?;
        let symbol = self.ctx.symbols().lookup(name)?;
        self.global_class(symbol)
    }

    /// `class` and its validated ancestors, nearest first
    fn class_chain(&self, class: DeclId) -> Vec<DeclId> {
        let mut chain = vec![class];
        let mut current = class;
        while let Some(&parent) = self.super_classes.get(&current) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Member named `symbol` of `class` or its nearest ancestor declaring it
    fn find_member(&self, class: DeclId, symbol: Symbol) -> Option<DeclId> {
        self.class_chain(class).into_iter().find_map(|c| {
            self.decl(c).as_class().and_then(|class| {
                class
                    .members
                    .iter()
                    .copied()
                    .find(|&m| self.decl(m).name.symbol == symbol)
            })
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn annotation_type(&mut self, annotation: &TypeAnnotation) -> TypeId {
        match &annotation.kind {
            TypeAnnotationKind::Class(symbol) => {
                let name = self.name(*symbol);
                self.types.class_type(name)
            }
            TypeAnnotationKind::List(element) => {
                let element = self.annotation_type(element);
                self.types.list_type(element)
            }
        }
    }

    /// Declared type of a variable or parameter
    fn decl_type(&mut self, decl: DeclId) -> TypeId {
        match self.decl(decl).value_annotation() {
            Some(annotation) => self.annotation_type(annotation),
            None => TypeId::OBJECT,
        }
    }

    /// Return type of a function; unannotated functions return `<None>`
    fn return_type(&mut self, func: &FuncDef) -> TypeId {
        match &func.return_type {
            Some(annotation) => self.annotation_type(annotation),
            None => TypeId::NONE,
        }
    }

    /// Assignment compatibility extended with nominal subclassing
    ///
    /// Every type conforms to `object`, and a class type conforms to each
    /// class on its superclass chain.
    fn conforms(&self, sub: TypeId, sup: TypeId) -> bool {
        if self.types.is_assignment_compatible(sub, sup) || sup == TypeId::OBJECT {
            return true;
        }
        let (Some(sub_class), Some(sup_class)) = (self.class_of_type(sub), self.class_of_type(sup))
        else {
            return false;
        };
        self.class_chain(sub_class).contains(&sup_class)
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.types.display(ty).to_string()
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn report(&mut self, diagnostic: Diagnostic) {
        debug!(%diagnostic, "diagnostic");
        self.sink.emit(diagnostic);
    }

    fn error(&mut self, kind: DiagKind, span: Span, args: &[&str]) {
        let diagnostic = args
            .iter()
            .fold(Diagnostic::error(kind, span), |d, arg| d.with_arg(arg));
        self.report(diagnostic);
    }
}
