//! Recursive descent parser for ChocoPy

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::frontend::sema::SymbolKind;

/// Recursive descent parser for ChocoPy
///
/// Declarations are allocated in the [`AstContext`] as they are parsed.
/// The first syntax error aborts parsing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    prev_span: Span,
    ctx: &'a mut AstContext,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str, ctx: &'a mut AstContext) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            prev_span: Span::default(),
            ctx,
        })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut declarations = Vec::new();
        loop {
            let decl = if self.check(&TokenKind::Class) {
                self.parse_class_def()?
            } else if self.check(&TokenKind::Def) {
                self.parse_func_def()?
            } else if self.at_scope_decl() {
                self.parse_scope_decl()?
            } else if self.at_var_def()? {
                self.parse_var_def()?
            } else {
                break;
            };
            declarations.push(decl);
        }

        let mut statements = Vec::new();
        while !self.at_end() {
            statements.push(self.parse_stmt()?);
        }

        Ok(Program::new(declarations, statements))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.prev_span = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Whether the token after `current` has the given kind
    fn next_is(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        let next = self.lexer.peek()?;
        Ok(std::mem::discriminant(&next.kind) == std::mem::discriminant(kind))
    }

    fn at_scope_decl(&self) -> bool {
        self.check(&TokenKind::Global) || self.check(&TokenKind::Nonlocal)
    }

    /// `ID :` starts a variable definition rather than a statement
    fn at_var_def(&mut self) -> CompileResult<bool> {
        if !matches!(self.current.kind, TokenKind::Identifier(_)) {
            return Ok(false);
        }
        self.next_is(&TokenKind::Colon)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.prev_span)
    }

    fn expect_identifier(&mut self) -> CompileResult<Identifier> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Identifier(name) => self.intern_identifier(&name, token.span),
            other => Err(CompileError::parser(
                format!("expected identifier, found {}", other),
                token.span,
            )),
        }
    }

    fn intern_identifier(&mut self, name: &str, span: Span) -> CompileResult<Identifier> {
        let symbol = self.ctx.symbols_mut().intern(name);
        if self.ctx.symbols().kind(symbol) == SymbolKind::Keyword {
            return Err(CompileError::parser(
                format!("'{}' is a reserved word", name),
                span,
            ));
        }
        Ok(Identifier::new(symbol, span))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// `class ID ( ID ) : NEWLINE INDENT class_body DEDENT`
    fn parse_class_def(&mut self) -> CompileResult<DeclId> {
        let start = self.expect(TokenKind::Class)?.span;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let super_class = self.expect_identifier()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let header = self.span_from(start);
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;

        let mut members = Vec::new();
        while !self.match_token(&TokenKind::Dedent)? {
            match &self.current.kind {
                TokenKind::Pass => {
                    self.advance()?;
                    self.expect(TokenKind::Newline)?;
                }
                TokenKind::Def => members.push(self.parse_func_def()?),
                TokenKind::Identifier(_) => members.push(self.parse_var_def()?),
                _ => return Err(self.unexpected("class member")),
            }
        }

        Ok(self.ctx.alloc(Declaration::new(
            name,
            DeclKind::Class(ClassDef {
                super_class: Some(super_class),
                members,
            }),
            header,
        )))
    }

    /// `def ID ( params ) [-> type] : NEWLINE INDENT func_body DEDENT`
    fn parse_func_def(&mut self) -> CompileResult<DeclId> {
        let start = self.expect(TokenKind::Def)?.span;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param, ty, span) = self.parse_typed_var()?;
                params.push(self.ctx.alloc(Declaration::new(
                    param,
                    DeclKind::Param(ParamDecl { ty }),
                    span,
                )));
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let return_type = if self.match_token(&TokenKind::Arrow)? {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(TokenKind::Colon)?;
        let header = self.span_from(start);
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;

        let mut declarations = Vec::new();
        loop {
            let decl = if self.check(&TokenKind::Def) {
                self.parse_func_def()?
            } else if self.at_scope_decl() {
                self.parse_scope_decl()?
            } else if self.at_var_def()? {
                self.parse_var_def()?
            } else {
                break;
            };
            declarations.push(decl);
        }

        let statements = self.parse_block_statements()?;

        Ok(self.ctx.alloc(Declaration::new(
            name,
            DeclKind::Func(FuncDef {
                params,
                return_type,
                declarations,
                statements,
            }),
            header,
        )))
    }

    /// `ID : type = literal NEWLINE`
    fn parse_var_def(&mut self) -> CompileResult<DeclId> {
        let (name, ty, start) = self.parse_typed_var()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_literal()?;
        let span = self.span_from(start);
        self.expect(TokenKind::Newline)?;
        Ok(self.ctx.alloc(Declaration::new(
            name,
            DeclKind::Var(VarDef { ty, value }),
            span,
        )))
    }

    /// `global ID NEWLINE` or `nonlocal ID NEWLINE`
    fn parse_scope_decl(&mut self) -> CompileResult<DeclId> {
        let token = self.advance()?;
        let kind = match token.kind {
            TokenKind::Global => DeclKind::Global,
            _ => DeclKind::NonLocal,
        };
        let name = self.expect_identifier()?;
        let span = self.span_from(token.span);
        self.expect(TokenKind::Newline)?;
        Ok(self.ctx.alloc(Declaration::new(name, kind, span)))
    }

    /// `ID : type`
    fn parse_typed_var(&mut self) -> CompileResult<(Identifier, TypeAnnotation, Span)> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = name.span.merge(ty.span);
        Ok((name, ty, span))
    }

    /// `ID | "ID" | [ type ]`
    fn parse_type(&mut self) -> CompileResult<TypeAnnotation> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Identifier(name) => {
                let id = self.intern_identifier(&name, token.span)?;
                Ok(TypeAnnotation::class(id.symbol, token.span))
            }
            TokenKind::StringLiteral(name) if is_identifier(&name) => {
                let id = self.intern_identifier(&name, token.span)?;
                Ok(TypeAnnotation::class(id.symbol, token.span))
            }
            TokenKind::LBracket => {
                let element = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                Ok(TypeAnnotation::list(element, self.span_from(token.span)))
            }
            other => Err(CompileError::parser(
                format!("expected type, found {}", other),
                token.span,
            )),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `NEWLINE INDENT stmt+ DEDENT`, with the leading NEWLINE INDENT
    /// already consumed by the caller for function bodies
    fn parse_block_statements(&mut self) -> CompileResult<Vec<Stmt>> {
        let mut body = vec![self.parse_stmt()?];
        while !self.match_token(&TokenKind::Dedent)? {
            if self.at_end() {
                return Err(self.unexpected("dedent"));
            }
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    fn parse_block(&mut self) -> CompileResult<Vec<Stmt>> {
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        self.parse_block_statements()
    }

    fn parse_stmt(&mut self) -> CompileResult<Stmt> {
        match &self.current.kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                let start = self.advance()?.span;
                let condition = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(Stmt::new(StmtKind::While { condition, body }, self.span_from(start)))
            }
            TokenKind::For => {
                let start = self.advance()?.span;
                let name = self.expect_identifier()?;
                let target = Expr::new(ExprKind::Name(NameRef::new(name)), name.span);
                self.expect(TokenKind::In)?;
                let iterable = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(Stmt::new(
                    StmtKind::For {
                        target,
                        iterable,
                        body,
                    },
                    self.span_from(start),
                ))
            }
            _ => {
                let stmt = self.parse_simple_stmt()?;
                self.expect(TokenKind::Newline)?;
                Ok(stmt)
            }
        }
    }

    /// `if`/`elif` chain; each `elif` becomes a nested `If` in the else body
    fn parse_if(&mut self) -> CompileResult<Stmt> {
        let start = self.advance()?.span;
        let condition = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let else_body = match &self.current.kind {
            TokenKind::Elif => vec![self.parse_if()?],
            TokenKind::Else => {
                self.advance()?;
                self.parse_block()?
            }
            _ => Vec::new(),
        };
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_body,
                else_body,
            },
            self.span_from(start),
        ))
    }

    fn parse_simple_stmt(&mut self) -> CompileResult<Stmt> {
        let start = self.current.span;
        match &self.current.kind {
            TokenKind::Pass => {
                self.advance()?;
                return Ok(Stmt::new(StmtKind::Pass, start));
            }
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(&TokenKind::Newline) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                return Ok(Stmt::new(StmtKind::Return(value), self.span_from(start)));
            }
            _ => {}
        }

        let first = self.parse_expr()?;
        if !self.check(&TokenKind::Assign) {
            return Ok(Stmt::new(StmtKind::Expr(first), self.span_from(start)));
        }

        let mut targets = Vec::new();
        let mut value = first;
        while self.match_token(&TokenKind::Assign)? {
            if !value.is_assignable() {
                return Err(CompileError::parser("invalid assignment target", value.span));
            }
            targets.push(value);
            value = self.parse_expr()?;
        }
        Ok(Stmt::new(
            StmtKind::Assign { targets, value },
            self.span_from(start),
        ))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `or_expr [if or_expr else expr]`
    fn parse_expr(&mut self) -> CompileResult<Expr> {
        let then_expr = self.parse_or()?;
        if !self.match_token(&TokenKind::If)? {
            return Ok(then_expr);
        }
        let condition = self.parse_or()?;
        self.expect(TokenKind::Else)?;
        let else_expr = self.parse_expr()?;
        let span = then_expr.span.merge(else_expr.span);
        Ok(Expr::new(
            ExprKind::IfExpr {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(&TokenKind::Or)? {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_not()?;
        while self.match_token(&TokenKind::And)? {
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> CompileResult<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.advance()?.span;
            let operand = self.parse_not()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_comparison()
    }

    /// Comparisons do not chain
    fn parse_comparison(&mut self) -> CompileResult<Expr> {
        let left = self.parse_additive()?;
        let op = match self.current.kind {
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Is => BinaryOp::Is,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_additive()?;
        Ok(binary(op, left, right))
    }

    fn parse_additive(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> CompileResult<Expr> {
        if self.check(&TokenKind::Minus) {
            let start = self.advance()?.span;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Member access, method calls and indexing
    fn parse_postfix(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_token(&TokenKind::Dot)? {
                let member = self.expect_identifier()?;
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_args()?;
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            object: Box::new(expr),
                            method: member,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.merge(member.span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            member,
                        },
                        span,
                    );
                }
            } else if self.match_token(&TokenKind::LBracket)? {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                let span = self.span_from(expr.span);
                expr = Expr::new(
                    ExprKind::Index {
                        list: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    /// Arguments after an opening parenthesis, through the closing one
    fn parse_args(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> CompileResult<Expr> {
        let start = self.current.span;
        match &self.current.kind {
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_args()?;
                    return Ok(Expr::new(
                        ExprKind::Call {
                            function: NameRef::new(name),
                            args,
                        },
                        self.span_from(start),
                    ));
                }
                Ok(Expr::new(ExprKind::Name(NameRef::new(name)), name.span))
            }
            TokenKind::LBracket => {
                self.advance()?;
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expr()?);
                        if !self.match_token(&TokenKind::Comma)? {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::new(ExprKind::List(elements), self.span_from(start)))
            }
            TokenKind::LParen => {
                self.advance()?;
                let mut inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                inner.span = self.span_from(start);
                Ok(inner)
            }
            _ => self.parse_literal(),
        }
    }

    /// `None | True | False | INTEGER | STRING`
    fn parse_literal(&mut self) -> CompileResult<Expr> {
        let token = self.advance()?;
        let literal = match token.kind {
            TokenKind::NoneLiteral => Literal::None,
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::IntLiteral(digits) => {
                let value = digits.parse::<i32>().map_err(|_| {
                    CompileError::parser(
                        format!("integer literal {} is out of range", digits),
                        token.span,
                    )
                })?;
                Literal::Int(value)
            }
            TokenKind::StringLiteral(value) => Literal::Str(value),
            other => {
                return Err(CompileError::parser(
                    format!("expected expression, found {}", other),
                    token.span,
                ));
            }
        };
        Ok(Expr::new(ExprKind::Literal(literal), token.span))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (AstContext, Program) {
        let mut ctx = AstContext::new();
        let program = Parser::new(source, &mut ctx).unwrap().parse().unwrap();
        (ctx, program)
    }

    fn parse_err(source: &str) -> CompileError {
        let mut ctx = AstContext::new();
        match Parser::new(source, &mut ctx).and_then(|mut p| p.parse()) {
            Ok(program) => panic!("expected a parse error, got {:?}", program),
            Err(err) => err,
        }
    }

    #[test]
    fn test_parse_declarations_then_statements() {
        let source = "x: int = 1\ndef f(a: int) -> int:\n    return a\nprint(f(x))\n";
        let (ctx, program) = parse(source);

        assert_eq!(program.declarations.len(), 2);
        assert_eq!(program.statements.len(), 1);
        assert_eq!(ctx.name_of(program.declarations[0]), "x");

        let func = ctx.decl(program.declarations[1]).as_func().unwrap();
        assert_eq!(func.params.len(), 1);
        assert!(func.return_type.is_some());
        assert!(matches!(func.statements[0].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn test_parse_class() {
        let source = "\
class A(object):
    x: int = 0
    def get(self: \"A\") -> int:
        return self.x
";
        let (ctx, program) = parse(source);
        let class_decl = ctx.decl(program.declarations[0]);
        let class = class_decl.as_class().unwrap();
        assert_eq!(ctx.name_of(program.declarations[0]), "A");
        assert_eq!(
            ctx.symbols().name(class.super_class.unwrap().symbol),
            "object"
        );
        assert_eq!(class.members.len(), 2);

        let method = ctx.decl(class.members[1]).as_func().unwrap();
        let self_ty = ctx.decl(method.params[0]).value_annotation().unwrap();
        assert_eq!(ctx.symbols().name(self_ty.base_class().0), "A");
    }

    #[test]
    fn test_parse_function_locals_and_nested() {
        let source = "\
def outer():
    x: int = 0
    def inner():
        nonlocal x
        x = 1
    global y
    inner()
";
        let (ctx, program) = parse(source);
        let outer = ctx.decl(program.declarations[0]).as_func().unwrap();
        assert_eq!(outer.declarations.len(), 3);
        assert!(matches!(ctx.decl(outer.declarations[2]).kind, DeclKind::Global));

        let inner = ctx.decl(outer.declarations[1]).as_func().unwrap();
        assert!(matches!(ctx.decl(inner.declarations[0]).kind, DeclKind::NonLocal));
    }

    #[test]
    fn test_parse_list_type() {
        let (ctx, program) = parse("xs: [[int]] = None\n");
        let ty = ctx.decl(program.declarations[0]).value_annotation().unwrap();
        let TypeAnnotationKind::List(inner) = &ty.kind else {
            panic!("expected list annotation, got {:?}", ty);
        };
        assert!(matches!(inner.kind, TypeAnnotationKind::List(_)));
    }

    #[test]
    fn test_typed_var_span_covers_annotation() {
        let (ctx, program) = parse("def f(abc: [int]):\n    pass\n");
        let func = ctx.decl(program.declarations[0]).as_func().unwrap();
        let param = ctx.decl(func.params[0]);

        assert_eq!(param.span, Span::new(6, 16));
        assert_eq!(param.value_annotation().unwrap().span, Span::new(11, 16));
    }

    #[test]
    fn test_precedence() {
        let (_, program) = parse("1 + 2 * 3 == 7 and not False\n");
        let StmtKind::Expr(expr) = &program.statements[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, left, right } = &expr.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::And);
        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));

        let ExprKind::Binary { op, left, .. } = &left.kind else {
            panic!("expected comparison");
        };
        assert_eq!(*op, BinaryOp::Eq);
        let ExprKind::Binary { op, right, .. } = &left.kind else {
            panic!("expected addition");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_conditional_expression() {
        let (_, program) = parse("x = 1 if True else 2\n");
        let StmtKind::Assign { targets, value } = &program.statements[0].kind else {
            panic!("expected assignment");
        };
        assert_eq!(targets.len(), 1);
        assert!(matches!(value.kind, ExprKind::IfExpr { .. }));
    }

    #[test]
    fn test_chained_assignment_and_postfix() {
        let (_, program) = parse("a.b = c[0] = d.m(1)[2]\n");
        let StmtKind::Assign { targets, value } = &program.statements[0].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(targets[0].kind, ExprKind::Member { .. }));
        assert!(matches!(targets[1].kind, ExprKind::Index { .. }));
        let ExprKind::Index { list, .. } = &value.kind else {
            panic!("expected index expression");
        };
        assert!(matches!(list.kind, ExprKind::MethodCall { .. }));
    }

    #[test]
    fn test_elif_nests_in_else() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        let (_, program) = parse(source);
        let StmtKind::If { else_body, .. } = &program.statements[0].kind else {
            panic!("expected if statement");
        };
        assert_eq!(else_body.len(), 1);
        let StmtKind::If { else_body, .. } = &else_body[0].kind else {
            panic!("expected nested if for elif");
        };
        assert_eq!(else_body.len(), 1);
    }

    #[test]
    fn test_for_and_while() {
        let source = "for x in xs:\n    while x:\n        pass\n";
        let (_, program) = parse(source);
        let StmtKind::For { target, body, .. } = &program.statements[0].kind else {
            panic!("expected for statement");
        };
        assert!(matches!(target.kind, ExprKind::Name(_)));
        assert!(matches!(body[0].kind, StmtKind::While { .. }));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_err("f() = 1\n");
        assert!(matches!(err, CompileError::Parser { message, .. } if message.contains("assignment")));
    }

    #[test]
    fn test_reserved_word_rejected() {
        let err = parse_err("lambda: int = 1\n");
        assert!(matches!(err, CompileError::Parser { message, .. } if message.contains("reserved")));
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = parse_err("x: int = 2147483648\n");
        assert!(matches!(err, CompileError::Parser { .. }));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_err("while True\n    pass\n");
        assert!(matches!(err, CompileError::Parser { message, .. } if message.contains("':'")));
    }
}
