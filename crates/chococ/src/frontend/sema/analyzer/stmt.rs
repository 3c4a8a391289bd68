//! Statements and assignment targets

use super::SemanticAnalyzer;
use crate::common::{CompileError, CompileResult, DiagKind};
use crate::frontend::ast::*;
use crate::frontend::sema::TypeId;

impl SemanticAnalyzer<'_> {
    pub(super) fn analyze_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Assign { targets, value } => self.analyze_assign(targets, value)?,

            StmtKind::Expr(expr) => {
                self.analyze_expr(expr);
            }

            StmtKind::For {
                target,
                iterable,
                body,
            } => {
                self.analyze_for(target, iterable)?;
                self.analyze_block(body)?;
            }

            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.check_condition(condition);
                self.analyze_block(then_body)?;
                self.analyze_block(else_body)?;
            }

            StmtKind::Return(value) => self.analyze_return(stmt, value.as_ref()),

            StmtKind::While { condition, body } => {
                self.check_condition(condition);
                self.analyze_block(body)?;
            }

            StmtKind::Pass => {}
        }
        Ok(())
    }

    fn analyze_block(&mut self, stmts: &[Stmt]) -> CompileResult<()> {
        for stmt in stmts {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Expr) {
        let ty = self.analyze_expr(condition);
        if ty != TypeId::BOOL {
            let name = self.type_name(ty);
            self.error(DiagKind::ConditionNotBool, condition.span, &[&name]);
        }
    }

    /// `t1 = t2 = value`
    ///
    /// A conditional value is checked branch by branch against each target.
    fn analyze_assign(&mut self, targets: &[Expr], value: &Expr) -> CompileResult<()> {
        self.analyze_expr(value);
        let mut value_types = Vec::new();
        self.collect_branch_types(value, &mut value_types);

        for target in targets {
            let Some(target_ty) = self.analyze_target(target)? else {
                continue;
            };
            for &value_ty in &value_types {
                if !self.conforms(value_ty, target_ty) {
                    let expected = self.type_name(target_ty);
                    let got = self.type_name(value_ty);
                    self.error(DiagKind::AssignTypeMismatch, target.span, &[&expected, &got]);
                }
            }
        }
        Ok(())
    }

    /// Type of the location written by an assignment target
    ///
    /// `None` means the target is invalid and has already been reported.
    fn analyze_target(&mut self, target: &Expr) -> CompileResult<Option<TypeId>> {
        match &target.kind {
            ExprKind::Name(name) => Ok(self.analyze_name_target(target, name)),

            ExprKind::Index { list, index } => {
                let list_ty = self.analyze_expr(list);
                let index_ty = self.analyze_expr(index);
                if index_ty != TypeId::INT {
                    let name = self.type_name(index_ty);
                    self.error(DiagKind::IndexNotInt, index.span, &[&name]);
                }

                let ty = if list_ty == TypeId::STR {
                    self.error(DiagKind::StrIndexAssign, list.span, &["str"]);
                    None
                } else if let Some(element) = self.types.element_type(list_ty) {
                    Some(element)
                } else {
                    let name = self.type_name(list_ty);
                    self.error(DiagKind::CannotIndex, list.span, &[&name]);
                    None
                };
                if let Some(ty) = ty {
                    target.set_inferred_type(ty);
                }
                Ok(ty)
            }

            ExprKind::Member { .. } => {
                let ty = self.analyze_expr(target);
                Ok(Some(ty))
            }

            _ => Err(CompileError::internal(
                "assignment target must be a name, member, or index expression",
                target.span,
            )),
        }
    }

    /// A plain name may only be assigned when declared in the current
    /// scope, directly or through `global`/`nonlocal`
    fn analyze_name_target(&mut self, target: &Expr, name: &NameRef) -> Option<TypeId> {
        let symbol = name.name.symbol;
        let spelling = self.name(symbol);

        let Some(decl) = self.lookup_name(symbol) else {
            self.error(DiagKind::UndefinedName, name.name.span, &[spelling]);
            return None;
        };
        name.resolve_to(decl);

        if !self.decl(decl).is_variable() {
            self.error(DiagKind::NotAVariable, name.name.span, &[spelling]);
            return None;
        }
        if !self.scopes.is_decl_in_scope(self.scopes.current(), decl) {
            self.error(DiagKind::BadLocalAssign, name.name.span, &[spelling]);
            return None;
        }

        let ty = self.decl_type(decl);
        target.set_inferred_type(ty);
        Some(ty)
    }

    fn analyze_for(&mut self, target: &Expr, iterable: &Expr) -> CompileResult<()> {
        let iterable_ty = self.analyze_expr(iterable);
        let element = if iterable_ty == TypeId::STR {
            Some(TypeId::STR)
        } else if let Some(element) = self.types.element_type(iterable_ty) {
            Some(element)
        } else {
            let name = self.type_name(iterable_ty);
            self.error(DiagKind::NotIterable, iterable.span, &[&name]);
            None
        };

        let target_ty = self.analyze_target(target)?;
        if let (Some(element), Some(target_ty)) = (element, target_ty) {
            if !self.conforms(element, target_ty) {
                let expected = self.type_name(target_ty);
                let got = self.type_name(element);
                self.error(DiagKind::AssignTypeMismatch, target.span, &[&expected, &got]);
            }
        }
        Ok(())
    }

    fn analyze_return(&mut self, stmt: &Stmt, value: Option<&Expr>) {
        let actual = match value {
            Some(value) => self.analyze_expr(value),
            None => TypeId::NONE,
        };
        let Some(&expected) = self.return_types.last() else {
            self.error(DiagKind::ReturnAtTopLevel, stmt.span, &[]);
            return;
        };
        if !self.conforms(actual, expected) {
            let expected = self.type_name(expected);
            let got = self.type_name(actual);
            let span = value.map_or(stmt.span, |value| value.span);
            self.error(DiagKind::ReturnTypeMismatch, span, &[&expected, &got]);
        }
    }

    /// Types a value can take: one per branch of nested conditional
    /// expressions
    ///
    /// Names already reported as undefined or not a variable are left out.
    fn collect_branch_types(&self, value: &Expr, out: &mut Vec<TypeId>) {
        match &value.kind {
            ExprKind::IfExpr {
                then_expr,
                else_expr,
                ..
            } => {
                self.collect_branch_types(then_expr, out);
                self.collect_branch_types(else_expr, out);
            }
            ExprKind::Name(name) if !self.names_variable(name) => {}
            _ => out.extend(value.inferred_type()),
        }
    }

    /// Whether `name` resolved to a variable or parameter
    fn names_variable(&self, name: &NameRef) -> bool {
        name.resolved().is_some_and(|decl| self.decl(decl).is_variable())
    }
}
