//! Expression typing

use super::SemanticAnalyzer;
use crate::common::{DiagKind, Span};
use crate::frontend::ast::*;
use crate::frontend::sema::TypeId;

impl SemanticAnalyzer<'_> {
    /// Infer the type of `expr`, record it on the node, and return it
    pub(super) fn analyze_expr(&mut self, expr: &Expr) -> TypeId {
        let ty = match &expr.kind {
            ExprKind::Binary { op, left, right } => {
                self.analyze_binary(expr.span, *op, left, right)
            }
            ExprKind::Unary { op, operand } => self.analyze_unary(expr.span, *op, operand),
            ExprKind::Call { function, args } => self.analyze_call(expr.span, function, args),
            ExprKind::Name(name) => self.analyze_name(name),
            ExprKind::IfExpr {
                condition,
                then_expr,
                else_expr,
            } => self.analyze_if_expr(condition, then_expr, else_expr),
            ExprKind::Index { list, index } => self.analyze_index(list, index),
            ExprKind::List(elements) => self.analyze_list(elements),
            ExprKind::Literal(literal) => literal_type(literal),
            ExprKind::Member { object, member } => self.analyze_member(object, member),
            ExprKind::MethodCall {
                object,
                method,
                args,
            } => self.analyze_method_call(expr.span, object, method, args),
        };
        expr.set_inferred_type(ty);
        ty
    }

    fn analyze_name(&mut self, name: &NameRef) -> TypeId {
        let symbol = name.name.symbol;
        let spelling = self.name(symbol);

        let Some(decl) = self.lookup_name(symbol) else {
            self.error(DiagKind::UndefinedName, name.name.span, &[spelling]);
            return TypeId::OBJECT;
        };
        name.resolve_to(decl);

        if self.decl(decl).is_variable() {
            self.decl_type(decl)
        } else {
            self.error(DiagKind::NotAVariable, name.name.span, &[spelling]);
            TypeId::OBJECT
        }
    }

    fn analyze_unary(&mut self, span: Span, op: UnaryOp, operand: &Expr) -> TypeId {
        let ty = self.analyze_expr(operand);
        let expected = match op {
            UnaryOp::Minus => TypeId::INT,
            UnaryOp::Not => TypeId::BOOL,
        };
        if ty != expected {
            let name = self.type_name(ty);
            self.error(DiagKind::UnaryTypeMismatch, span, &[&op.to_string(), &name]);
        }
        expected
    }

    fn analyze_binary(&mut self, span: Span, op: BinaryOp, left: &Expr, right: &Expr) -> TypeId {
        let l = self.analyze_expr(left);
        let r = self.analyze_expr(right);

        match self.binary_result(op, l, r) {
            Ok(ty) => ty,
            Err(fallback) => {
                let left_name = self.type_name(l);
                let right_name = self.type_name(r);
                self.error(
                    DiagKind::BinaryTypeMismatch,
                    span,
                    &[op.as_str(), &left_name, &right_name],
                );
                fallback
            }
        }
    }

    /// Result type of `l op r`, or the placeholder type when ill-typed
    fn binary_result(&self, op: BinaryOp, l: TypeId, r: TypeId) -> Result<TypeId, TypeId> {
        let both = |ty: TypeId| l == ty && r == ty;
        let either = |ty: TypeId| l == ty || r == ty;
        let is_list = |ty: TypeId| ty == TypeId::EMPTY || self.types.is_list(ty);

        match op {
            BinaryOp::Add => {
                if both(TypeId::INT) || both(TypeId::STR) {
                    Ok(l)
                } else if is_list(l) && is_list(r) && (l == r || either(TypeId::EMPTY)) {
                    // `[] + xs` takes the type of the non-empty side
                    Ok(if l == TypeId::EMPTY { r } else { l })
                } else if either(TypeId::INT) {
                    Err(TypeId::INT)
                } else if either(TypeId::STR) {
                    Err(TypeId::STR)
                } else {
                    Err(TypeId::OBJECT)
                }
            }
            BinaryOp::Sub | BinaryOp::Mul => {
                if both(TypeId::INT) || (l == r && self.types.is_list(l)) {
                    Ok(l)
                } else if either(TypeId::INT) {
                    Err(TypeId::INT)
                } else {
                    Err(TypeId::OBJECT)
                }
            }
            BinaryOp::FloorDiv | BinaryOp::Mod => {
                if both(TypeId::INT) {
                    Ok(TypeId::INT)
                } else {
                    Err(TypeId::INT)
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if both(TypeId::BOOL) {
                    Ok(TypeId::BOOL)
                } else {
                    Err(TypeId::BOOL)
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                if l == r && l.is_primitive() {
                    Ok(TypeId::BOOL)
                } else {
                    Err(TypeId::BOOL)
                }
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                if both(TypeId::INT) {
                    Ok(TypeId::BOOL)
                } else {
                    Err(TypeId::BOOL)
                }
            }
            BinaryOp::Is => {
                if !l.is_primitive() && !r.is_primitive() {
                    Ok(TypeId::BOOL)
                } else {
                    Err(TypeId::BOOL)
                }
            }
        }
    }

    fn analyze_if_expr(&mut self, condition: &Expr, then_expr: &Expr, else_expr: &Expr) -> TypeId {
        let cond = self.analyze_expr(condition);
        if cond != TypeId::BOOL {
            let name = self.type_name(cond);
            self.error(DiagKind::ConditionNotBool, condition.span, &[&name]);
        }

        let then_ty = self.analyze_expr(then_expr);
        let else_ty = self.analyze_expr(else_expr);
        if self.conforms(then_ty, else_ty) {
            else_ty
        } else if self.conforms(else_ty, then_ty) {
            then_ty
        } else {
            TypeId::OBJECT
        }
    }

    fn analyze_index(&mut self, list: &Expr, index: &Expr) -> TypeId {
        let list_ty = self.analyze_expr(list);
        let index_ty = self.analyze_expr(index);
        if index_ty != TypeId::INT {
            let name = self.type_name(index_ty);
            self.error(DiagKind::IndexNotInt, index.span, &[&name]);
        }

        if list_ty == TypeId::STR {
            return TypeId::STR;
        }
        match self.types.element_type(list_ty) {
            Some(element) => element,
            None => {
                let name = self.type_name(list_ty);
                self.error(DiagKind::CannotIndex, list.span, &[&name]);
                TypeId::OBJECT
            }
        }
    }

    fn analyze_list(&mut self, elements: &[Expr]) -> TypeId {
        let Some((first, rest)) = elements.split_first() else {
            return TypeId::EMPTY;
        };

        let element = self.analyze_expr(first);
        let mut mismatch = false;
        for expr in rest {
            let ty = self.analyze_expr(expr);
            if ty != element && !mismatch {
                mismatch = true;
                let expected = self.type_name(element);
                let got = self.type_name(ty);
                self.error(DiagKind::ListElementMismatch, expr.span, &[&expected, &got]);
            }
        }

        if mismatch {
            self.types.list_type(TypeId::OBJECT)
        } else {
            self.types.list_type(element)
        }
    }

    fn analyze_member(&mut self, object: &Expr, member: &Identifier) -> TypeId {
        let object_ty = self.analyze_expr(object);
        let attribute = self
            .class_of_type(object_ty)
            .and_then(|class| self.find_member(class, member.symbol))
            .filter(|&decl| matches!(self.decl(decl).kind, DeclKind::Var(_)));

        match attribute {
            Some(decl) => self.decl_type(decl),
            None => {
                let name = self.name(member.symbol);
                let class = self.type_name(object_ty);
                self.error(DiagKind::AttributeNotFound, member.span, &[name, &class]);
                TypeId::OBJECT
            }
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn analyze_call(&mut self, span: Span, function: &NameRef, args: &[Expr]) -> TypeId {
        let symbol = function.name.symbol;
        let spelling = self.name(symbol);

        let Some(callee) = self.lookup_name(symbol) else {
            self.error(DiagKind::UndefinedName, function.name.span, &[spelling]);
            self.analyze_args(args);
            return TypeId::OBJECT;
        };
        function.resolve_to(callee);

        match &self.decl(callee).kind {
            DeclKind::Func(func) => {
                self.check_args(span, &func.params, args);
                self.return_type(func)
            }
            DeclKind::Class(_) => {
                let init = self.ctx.symbols().known().init;
                match self.find_member(callee, init).and_then(|m| self.decl(m).as_func()) {
                    Some(init) => {
                        let params = self.method_params(init);
                        self.check_args(span, params, args);
                    }
                    None => self.check_args(span, &[], args),
                }
                let name = self.name(symbol);
                self.types.class_type(name)
            }
            _ => {
                self.error(DiagKind::NotCallable, function.name.span, &[spelling]);
                self.analyze_args(args);
                TypeId::OBJECT
            }
        }
    }

    fn analyze_method_call(
        &mut self,
        span: Span,
        object: &Expr,
        method: &Identifier,
        args: &[Expr],
    ) -> TypeId {
        let object_ty = self.analyze_expr(object);
        let func = self
            .class_of_type(object_ty)
            .and_then(|class| self.find_member(class, method.symbol))
            .and_then(|decl| self.decl(decl).as_func());

        match func {
            Some(func) => {
                let params = self.method_params(func);
                self.check_args(span, params, args);
                self.return_type(func)
            }
            None => {
                let name = self.name(method.symbol);
                let class = self.type_name(object_ty);
                self.error(DiagKind::MethodNotFound, method.span, &[name, &class]);
                self.analyze_args(args);
                TypeId::OBJECT
            }
        }
    }

    fn analyze_args(&mut self, args: &[Expr]) {
        for arg in args {
            self.analyze_expr(arg);
        }
    }

    /// Match arguments against parameters by count, then pairwise by type
    fn check_args(&mut self, span: Span, params: &[DeclId], args: &[Expr]) {
        self.analyze_args(args);
        if params.len() != args.len() {
            self.error(
                DiagKind::ArgumentCount,
                span,
                &[&params.len().to_string(), &args.len().to_string()],
            );
            return;
        }

        for (i, (&param, arg)) in params.iter().zip(args).enumerate() {
            let expected = self.decl_type(param);
            let Some(actual) = arg.inferred_type() else {
                continue;
            };
            if !self.conforms(actual, expected) {
                let expected = self.type_name(expected);
                let got = self.type_name(actual);
                self.error(
                    DiagKind::ArgumentTypeMismatch,
                    arg.span,
                    &[&expected, &got, &i.to_string()],
                );
            }
        }
    }
}

fn literal_type(literal: &Literal) -> TypeId {
    match literal {
        Literal::Bool(_) => TypeId::BOOL,
        Literal::Int(_) => TypeId::INT,
        Literal::None => TypeId::NONE,
        Literal::Str(_) => TypeId::STR,
    }
}
