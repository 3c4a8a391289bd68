//! Declarations: registration, classes, functions, variables

use super::SemanticAnalyzer;
use crate::common::{CompileError, CompileResult, DiagKind};
use crate::frontend::ast::*;
use crate::frontend::sema::{FuncTypeId, ScopeKind, TypeId};
use tracing::debug;

impl SemanticAnalyzer<'_> {
    /// Register a declaration in the current scope
    ///
    /// `global`/`nonlocal` forward the outer variable instead of adding a
    /// new binding.
    pub(super) fn declare(&mut self, id: DeclId) {
        let decl = self.decl(id);
        match &decl.kind {
            DeclKind::Global => self.check_global_decl(id),
            DeclKind::NonLocal => self.check_nonlocal_decl(id),
            kind => {
                let current = self.scopes.current();
                if self.scopes.lookup_local(current, decl.name.symbol).is_some() {
                    let name = self.name(decl.name.symbol);
                    self.error(DiagKind::DuplicateDeclaration, decl.name.span, &[name]);
                    return;
                }
                if !matches!(kind, DeclKind::Class(_)) {
                    self.check_class_shadow(id);
                }
                self.register(id);
            }
        }
    }

    /// Variables, parameters and functions may not reuse a class name
    fn check_class_shadow(&mut self, id: DeclId) {
        let decl = self.decl(id);
        let shadows_class = self
            .resolver
            .iter(decl.name.symbol)
            .any(|other| self.decl(other).is_class());
        if shadows_class {
            let name = self.name(decl.name.symbol);
            self.error(DiagKind::ShadowClassName, decl.name.span, &[name]);
        }
    }

    /// `global x`: `x` must be a variable of the global scope
    fn check_global_decl(&mut self, id: DeclId) {
        let decl = self.decl(id);
        let name = self.name(decl.name.symbol);
        let global = self.scopes.global();

        if self.scopes.current() == global {
            self.error(DiagKind::InvalidGlobal, decl.span, &[name]);
            return;
        }
        match self.scopes.lookup_local(global, decl.name.symbol) {
            Some(target) if matches!(self.decl(target).kind, DeclKind::Var(_)) => {
                self.forward(id, target);
            }
            _ => self.error(DiagKind::InvalidGlobal, decl.span, &[name]),
        }
    }

    /// `nonlocal x`: `x` must be a variable of an enclosing function
    fn check_nonlocal_decl(&mut self, id: DeclId) {
        let decl = self.decl(id);
        let name = self.name(decl.name.symbol);
        let global = self.scopes.global();

        let mut scope = self.scopes.parent(self.scopes.current());
        while let Some(s) = scope {
            if s == global {
                break;
            }
            if self.scopes.kind(s) == ScopeKind::Class {
                scope = self.scopes.parent(s);
                continue;
            }
            if let Some(target) = self.scopes.lookup_local(s, decl.name.symbol) {
                let is_local_var = matches!(self.decl(target).kind, DeclKind::Var(_))
                    && !self.scopes.is_decl_in_scope(global, target);
                if is_local_var {
                    self.forward(id, target);
                } else {
                    self.error(DiagKind::InvalidNonlocal, decl.span, &[name]);
                }
                return;
            }
            scope = self.scopes.parent(s);
        }
        self.error(DiagKind::InvalidNonlocal, decl.span, &[name]);
    }

    /// Bind an outer variable in the current scope
    fn forward(&mut self, marker: DeclId, target: DeclId) {
        let decl = self.decl(marker);
        let current = self.scopes.current();
        match self.scopes.lookup_local(current, decl.name.symbol) {
            Some(existing) if existing != target => {
                let name = self.name(decl.name.symbol);
                self.error(DiagKind::DuplicateDeclaration, decl.name.span, &[name]);
            }
            _ => self.register(target),
        }
    }

    pub(super) fn analyze_declaration(&mut self, id: DeclId) -> CompileResult<()> {
        let decl = self.decl(id);
        match &decl.kind {
            DeclKind::Class(class) => self.analyze_class(id, class),
            DeclKind::Func(func) => self.analyze_function(id, func),
            DeclKind::Var(var) => {
                self.analyze_var_def(id, var);
                Ok(())
            }
            DeclKind::Global | DeclKind::NonLocal => Ok(()),
            DeclKind::Param(_) => Err(CompileError::internal(
                "parameter outside of a parameter list",
                decl.span,
            )),
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    #[tracing::instrument(level = "debug", skip_all)]
    fn analyze_class(&mut self, id: DeclId, class: &ClassDef) -> CompileResult<()> {
        debug!(class = self.ctx.name_of(id), "analyzing class");
        self.push_scope(ScopeKind::Class);

        let super_class = self.check_super_class(id, class);
        if let Some(super_class) = super_class {
            self.super_classes.insert(id, super_class);
        }

        for &member in &class.members {
            if !matches!(self.decl(member).kind, DeclKind::Var(_) | DeclKind::Func(_)) {
                return Err(CompileError::internal(
                    "class member must be a variable or a method",
                    self.decl(member).span,
                ));
            }
            self.declare(member);
            if let Some(super_class) = super_class {
                self.check_inherited_member(super_class, member);
            }
            if self.decl(member).is_func() {
                self.check_first_method_param(id, member);
                self.check_init_params(id, member);
            }
        }

        for &member in &class.members {
            self.analyze_declaration(member)?;
        }

        self.pop_scope();
        self.completed_classes.insert(id);
        Ok(())
    }

    /// Resolve and validate the superclass of `id`
    ///
    /// The superclass must be a class whose own definition is already
    /// complete, which rejects forward references and cycles.
    fn check_super_class(&mut self, id: DeclId, class: &ClassDef) -> Option<DeclId> {
        let super_name = class.super_class?;
        let name = self.name(super_name.symbol);

        let Some(super_class) = self.lookup_name(super_name.symbol) else {
            self.error(DiagKind::SuperclassNotDefined, super_name.span, &[name]);
            return None;
        };
        if !self.decl(super_class).is_class() {
            self.error(DiagKind::SuperclassNotClass, super_name.span, &[name]);
            return None;
        }
        if self.ctx.builtins().is_special_class(super_class) {
            self.error(DiagKind::SuperclassSpecial, super_name.span, &[name]);
            return None;
        }
        if super_class == id || !self.completed_classes.contains(&super_class) {
            self.error(DiagKind::SuperclassNotDefined, super_name.span, &[name]);
            return None;
        }
        Some(super_class)
    }

    /// Inherited names may only be redefined by a matching method override
    fn check_inherited_member(&mut self, super_class: DeclId, member: DeclId) {
        let decl = self.decl(member);
        if decl.name.symbol == self.ctx.symbols().known().init {
            return;
        }
        let Some(inherited) = self.find_member(super_class, decl.name.symbol) else {
            return;
        };
        let name = self.name(decl.name.symbol);
        match (self.decl(inherited).as_func(), decl.as_func()) {
            (Some(base), Some(method)) => {
                if self.method_signature(base) != self.method_signature(method) {
                    self.error(DiagKind::MethodOverride, decl.name.span, &[name]);
                }
            }
            _ => self.error(DiagKind::AttributeRedefinition, decl.name.span, &[name]),
        }
    }

    /// Function type of a method without its leading `self`
    fn method_signature(&mut self, method: &FuncDef) -> FuncTypeId {
        let params: Vec<TypeId> = self
            .method_params(method)
            .iter()
            .map(|&p| self.decl_type(p))
            .collect();
        let ret = self.return_type(method);
        self.types.func_type(&params, ret)
    }

    /// Parameters after an implicit `self`
    pub(super) fn method_params<'f>(&self, method: &'f FuncDef) -> &'f [DeclId] {
        let self_ = self.ctx.symbols().known().self_;
        match method.params.split_first() {
            Some((&first, rest)) if self.decl(first).name.symbol == self_ => rest,
            _ => &method.params,
        }
    }

    /// A method's first parameter must be `self` of the enclosing class
    fn check_first_method_param(&mut self, class: DeclId, member: DeclId) {
        let decl = self.decl(member);
        let Some(method) = decl.as_func() else {
            return;
        };
        let known = *self.ctx.symbols().known();
        let class_name = self.decl(class).name.symbol;

        let valid = method.params.first().is_some_and(|&first| {
            let param = self.decl(first);
            param.name.symbol == known.self_
                && param.value_annotation().is_some_and(|ty| {
                    ty.kind == TypeAnnotationKind::Class(class_name)
                })
        });
        if !valid {
            let name = self.name(decl.name.symbol);
            self.error(DiagKind::FirstMethodParam, decl.name.span, &[name]);
        }
    }

    /// `__init__` parameters may not redeclare an attribute with another type
    fn check_init_params(&mut self, class: DeclId, member: DeclId) {
        let decl = self.decl(member);
        let Some(init) = decl.as_func() else {
            return;
        };
        if decl.name.symbol != self.ctx.symbols().known().init {
            return;
        }
        for &param in self.method_params(init) {
            let param_decl = self.decl(param);
            let Some(attribute) = self.find_member(class, param_decl.name.symbol) else {
                continue;
            };
            if !matches!(self.decl(attribute).kind, DeclKind::Var(_)) {
                continue;
            }
            let param_ty = self.decl_type(param);
            let attribute_ty = self.decl_type(attribute);
            if param_ty != attribute_ty {
                let name = self.name(param_decl.name.symbol);
                let ty = self.type_name(attribute_ty);
                self.error(DiagKind::InitRedefinesAttribute, param_decl.span, &[name, &ty]);
            }
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    #[tracing::instrument(level = "debug", skip_all)]
    fn analyze_function(&mut self, id: DeclId, func: &FuncDef) -> CompileResult<()> {
        debug!(function = self.ctx.name_of(id), "analyzing function");
        if let Some(return_type) = &func.return_type {
            self.check_type_annotation(return_type);
        }

        let defining = self.scopes.current();
        self.push_scope(ScopeKind::Func);
        let scope = self.scopes.current();
        self.scopes.set_parent(scope, defining);

        for &param in &func.params {
            self.declare(param);
            if let Some(annotation) = self.decl(param).value_annotation() {
                self.check_type_annotation(annotation);
            }
        }
        for &decl in &func.declarations {
            self.declare(decl);
        }
        for &decl in &func.declarations {
            self.analyze_declaration(decl)?;
        }

        let expected = self.return_type(func);
        self.return_types.push(expected);
        for stmt in &func.statements {
            self.analyze_stmt(stmt)?;
        }
        self.return_types.pop();

        if !self.types.is_assignment_compatible(TypeId::NONE, expected)
            && !always_returns(&func.statements)
        {
            let decl = self.decl(id);
            let name = self.name(decl.name.symbol);
            self.error(DiagKind::MissingReturn, decl.name.span, &[name]);
        }

        self.pop_scope();
        Ok(())
    }

    // =========================================================================
    // Variables and annotations
    // =========================================================================

    fn analyze_var_def(&mut self, id: DeclId, var: &VarDef) {
        self.check_type_annotation(&var.ty);
        let declared = self.annotation_type(&var.ty);
        let actual = self.analyze_expr(&var.value);
        if !self.conforms(actual, declared) {
            let expected = self.type_name(declared);
            let got = self.type_name(actual);
            self.error(
                DiagKind::AssignTypeMismatch,
                self.decl(id).span,
                &[&expected, &got],
            );
        }
    }

    /// The class named by an annotation must be declared at global scope
    fn check_type_annotation(&mut self, annotation: &TypeAnnotation) {
        let (symbol, span) = annotation.base_class();
        if self.global_class(symbol).is_none() {
            let name = self.name(symbol);
            self.error(DiagKind::InvalidTypeAnnotation, span, &[name]);
        }
    }
}

/// Whether every path through `stmts` ends in a `return`
///
/// An `if` counts only when both branches always return.
pub(super) fn always_returns(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|stmt| match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If {
            then_body,
            else_body,
            ..
        } => always_returns(then_body) && always_returns(else_body),
        _ => false,
    })
}
