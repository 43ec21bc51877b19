//! Expression grammar.
//!
//! Precedence climbing over SQLite's operator levels. Grammar actions that
//! reshape the tree (IS NULL folding, LIKE as a function call, IN-list
//! rewrites, AND folding) happen here so the tree matches what SQLite's
//! parser builds before name resolution.

use super::Parser;
use super::keywords::{Keyword, is_constant_function};
use super::lexer::TokenKind;
use crate::ast::{
    BinaryOp, CompoundOp, Expr, FunctionCall, InRhs, IntLiteral, RaiseAction, ResultColumn,
    Select, Source, SourceItem, UnaryOp, Window, WindowFrame,
};
use crate::error::AstResult;

const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
/// IS, MATCH, LIKE, BETWEEN, IN, ISNULL, NOTNULL, `=`, `!=`
const EQUALITY: u8 = 4;
const COMPARISON: u8 = 5;
const BITWISE: u8 = 7;
const ADDITIVE: u8 = 8;
const MULTIPLICATIVE: u8 = 9;
/// `||`, `->`, `->>`
const CONCAT: u8 = 10;
const COLLATE: u8 = 11;
const UNARY: u8 = 12;

/// Largest `?NNN` accepted.
const MAX_VARIABLE_NUMBER: u32 = 32766;

impl<'a> Parser<'a> {
    pub(super) fn expr(&mut self) -> AstResult<Expr> {
        self.expr_bp(OR)
    }

    fn expr_bp(&mut self, min: u8) -> AstResult<Expr> {
        self.enter()?;
        let result = self.climb(min);
        self.leave();
        result
    }

    fn climb(&mut self, min: u8) -> AstResult<Expr> {
        let mut lhs = self.prefix()?;
        while let Some(prec) = self.infix_precedence() {
            if prec < min {
                break;
            }
            lhs = self.infix(lhs, prec)?;
        }
        Ok(lhs)
    }

    /// Precedence of the operator under the cursor, if it continues an
    /// expression.
    fn infix_precedence(&self) -> Option<u8> {
        let token = self.peek();
        let prec = match token.kind {
            TokenKind::Eq | TokenKind::Ne => EQUALITY,
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => COMPARISON,
            TokenKind::BitAnd | TokenKind::BitOr | TokenKind::LShift | TokenKind::RShift => {
                BITWISE
            }
            TokenKind::Plus | TokenKind::Minus => ADDITIVE,
            TokenKind::Star | TokenKind::Slash | TokenKind::Rem => MULTIPLICATIVE,
            TokenKind::Concat | TokenKind::Ptr => CONCAT,
            TokenKind::Keyword(kw) => match kw {
                Keyword::Or => OR,
                Keyword::And => AND,
                Keyword::Is
                | Keyword::Isnull
                | Keyword::Notnull
                | Keyword::Between
                | Keyword::In
                | Keyword::Match => EQUALITY,
                kw if kw.is_like_kw() => EQUALITY,
                Keyword::Not => {
                    let next = self.peek_at(1).keyword()?;
                    match next {
                        Keyword::Null | Keyword::Between | Keyword::In | Keyword::Match => {
                            EQUALITY
                        }
                        kw if kw.is_like_kw() => EQUALITY,
                        _ => return None,
                    }
                }
                Keyword::Collate => COLLATE,
                _ => return None,
            },
            _ => return None,
        };
        Some(prec)
    }

    fn infix(&mut self, lhs: Expr, prec: u8) -> AstResult<Expr> {
        let token = self.advance();
        let op = match token.kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::BitAnd => BinaryOp::BitAnd,
            TokenKind::BitOr => BinaryOp::BitOr,
            TokenKind::LShift => BinaryOp::ShiftLeft,
            TokenKind::RShift => BinaryOp::ShiftRight,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Rem => BinaryOp::Rem,
            TokenKind::Concat => BinaryOp::Concat,
            TokenKind::Ptr => {
                let rhs = self.expr_bp(prec + 1)?;
                let call = FunctionCall::new(token.text, vec![lhs, rhs]);
                return Ok(Expr::Function(call));
            }
            TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
            TokenKind::Keyword(Keyword::And) => {
                let rhs = self.expr_bp(prec + 1)?;
                return Ok(fold_and(lhs, rhs));
            }
            TokenKind::Keyword(Keyword::Collate) => {
                let collation = self.ids()?;
                return Ok(Expr::Collate {
                    expr: Box::new(lhs),
                    collation,
                });
            }
            TokenKind::Keyword(Keyword::Is) => return self.is_tail(lhs),
            TokenKind::Keyword(Keyword::Isnull) => return Ok(Expr::IsNull(Box::new(lhs))),
            TokenKind::Keyword(Keyword::Notnull) => return Ok(Expr::NotNull(Box::new(lhs))),
            TokenKind::Keyword(Keyword::Not) => {
                if self.eat_kw(Keyword::Null) {
                    return Ok(Expr::NotNull(Box::new(lhs)));
                }
                let inner = self.negatable(lhs, true)?;
                return Ok(match inner {
                    // `x NOT IN ()` is already the folded boolean.
                    Expr::Boolean(_) => inner,
                    other => Expr::unary(UnaryOp::Not, other),
                });
            }
            TokenKind::Keyword(_) => {
                self.pos -= 1;
                return self.negatable(lhs, false);
            }
            _ => return Err(self.syntax_error()),
        };
        let rhs = self.expr_bp(prec + 1)?;
        Ok(Expr::binary(op, lhs, rhs))
    }

    /// BETWEEN, IN, LIKE/GLOB/REGEXP/MATCH: the operators NOT may precede.
    /// For `IN ()` the folded boolean already reflects a preceding NOT.
    fn negatable(&mut self, lhs: Expr, negated: bool) -> AstResult<Expr> {
        let token = self.advance();
        match token.keyword() {
            Some(Keyword::Between) => {
                let low = self.expr_bp(NOT)?;
                self.expect_kw(Keyword::And)?;
                let high = self.expr_bp(COMPARISON)?;
                Ok(Expr::Between {
                    expr: Box::new(lhs),
                    list: vec![low, high],
                })
            }
            Some(Keyword::In) => self.in_tail(lhs, negated),
            Some(kw) if kw.is_like_kw() || kw == Keyword::Match => {
                let rhs = self.expr_bp(COMPARISON)?;
                let mut args = vec![rhs, lhs];
                if self.eat_kw(Keyword::Escape) {
                    args.push(self.expr_bp(COMPARISON)?);
                }
                Ok(Expr::Function(FunctionCall::new(token.text, args)))
            }
            _ => {
                self.pos -= 1;
                Err(self.syntax_error())
            }
        }
    }

    /// After IS: `[NOT] [DISTINCT FROM] expr`. A NULL right operand turns the
    /// test into ISNULL / NOTNULL.
    fn is_tail(&mut self, lhs: Expr) -> AstResult<Expr> {
        let not = self.eat_kw(Keyword::Not);
        let distinct = if self.eat_kw(Keyword::Distinct) {
            self.expect_kw(Keyword::From)?;
            true
        } else {
            false
        };
        let rhs = self.expr_bp(COMPARISON)?;
        let is_not = not != distinct;
        Ok(match (rhs, is_not) {
            (Expr::Null, false) => Expr::IsNull(Box::new(lhs)),
            (Expr::Null, true) => Expr::NotNull(Box::new(lhs)),
            (rhs, false) => Expr::binary(BinaryOp::Is, lhs, rhs),
            (rhs, true) => Expr::binary(BinaryOp::IsNot, lhs, rhs),
        })
    }

    /// After IN. Returns the un-negated form except for `IN ()`, which folds
    /// straight to a boolean.
    fn in_tail(&mut self, lhs: Expr, negated: bool) -> AstResult<Expr> {
        if !self.eat(TokenKind::LParen) {
            return self.in_table(lhs);
        }
        if self.at_select_start() {
            let select = self.select()?;
            self.expect(TokenKind::RParen)?;
            return Ok(in_select(lhs, select));
        }
        let mut list = self.exprlist()?;
        self.expect(TokenKind::RParen)?;

        if list.is_empty() {
            return Ok(Expr::Boolean(negated));
        }
        if list.len() == 1 {
            let only_constant = !matches!(lhs, Expr::Vector(_)) && is_constant(&mut list[0], true);
            match list.pop() {
                Some(rhs) if only_constant => {
                    return Ok(Expr::binary(
                        BinaryOp::Eq,
                        lhs,
                        Expr::unary(UnaryOp::Pos, rhs),
                    ));
                }
                Some(Expr::Subquery(select)) => return Ok(in_select(lhs, *select)),
                Some(rhs) => list.push(rhs),
                None => {}
            }
        }
        if let Expr::Vector(columns) = &lhs {
            let rows = self.in_rows(columns.len(), list)?;
            return Ok(in_select(lhs, rows));
        }
        Ok(Expr::In {
            expr: Box::new(lhs),
            rhs: InRhs::Values(list),
        })
    }

    /// Row-value IN list: every element must be a vector of the same width,
    /// and the rows become a UNION ALL chain of single-row selects.
    fn in_rows(&self, width: usize, list: Vec<Expr>) -> AstResult<Select> {
        let mut rows = Vec::with_capacity(list.len());
        for element in list {
            let values = match element {
                Expr::Vector(values) if values.len() == width => values,
                other => {
                    let terms = match &other {
                        Expr::Vector(values) => values.len(),
                        _ => 1,
                    };
                    let plural = if terms > 1 { "s" } else { "" };
                    return Err(self.error(format!(
                        "IN(...) element has {terms} term{plural} - expected {width}"
                    )));
                }
            };
            rows.push(values);
        }
        Ok(union_all_rows(rows))
    }

    /// `IN [schema.]table [(args)]`
    fn in_table(&mut self, lhs: Expr) -> AstResult<Expr> {
        let first = self.nm()?;
        let (schema, name) = if self.eat(TokenKind::Dot) {
            (Some(first), self.nm()?)
        } else {
            (None, first)
        };
        let mut item = SourceItem::from_source(Source::Table {
            name,
            schema,
            fixed_schema: false,
        });
        if self.eat(TokenKind::LParen) {
            let args = self.exprlist()?;
            self.expect(TokenKind::RParen)?;
            if !args.is_empty() {
                item.func_args = Some(args);
            }
        }
        Ok(in_select(lhs, Select::star_from(vec![item])))
    }

    fn prefix(&mut self) -> AstResult<Expr> {
        let token = self.peek();
        match token.kind {
            TokenKind::Integer => {
                self.advance();
                Ok(Expr::Integer(IntLiteral::from_token(token.text)))
            }
            TokenKind::Float => {
                self.advance();
                Ok(Expr::Float(token.text.to_string()))
            }
            TokenKind::Blob => {
                self.advance();
                Ok(Expr::Blob(token.text.to_string()))
            }
            TokenKind::String if self.peek_at(1).kind != TokenKind::Dot => {
                self.advance();
                Ok(Expr::String(super::dequote(token.text)))
            }
            TokenKind::Variable => self.variable(),
            TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot => {
                self.advance();
                let op = match token.kind {
                    TokenKind::Minus => UnaryOp::Neg,
                    TokenKind::Plus => UnaryOp::Pos,
                    _ => UnaryOp::BitNot,
                };
                let operand = self.expr_bp(UNARY)?;
                Ok(Expr::unary(op, operand))
            }
            TokenKind::LParen => self.parenthesized(),
            TokenKind::Keyword(kw) => match kw {
                Keyword::Null => {
                    self.advance();
                    Ok(Expr::Null)
                }
                Keyword::Not => {
                    self.advance();
                    let operand = self.expr_bp(NOT)?;
                    Ok(Expr::unary(UnaryOp::Not, operand))
                }
                Keyword::Exists => {
                    self.advance();
                    self.expect(TokenKind::LParen)?;
                    let select = self.select()?;
                    self.expect(TokenKind::RParen)?;
                    Ok(Expr::Exists(Box::new(select)))
                }
                Keyword::Case => self.case(),
                Keyword::Cast => self.cast(),
                Keyword::Raise => self.raise(),
                kw if kw.is_ctime_kw() => {
                    self.advance();
                    Ok(Expr::Function(FunctionCall::new(token.text, Vec::new())))
                }
                _ if self.at_nm() => self.name_or_call(),
                _ => Err(self.syntax_error()),
            },
            TokenKind::Id | TokenKind::String => self.name_or_call(),
            _ => Err(self.syntax_error()),
        }
    }

    fn variable(&mut self) -> AstResult<Expr> {
        let token = self.peek();
        let text = token.text;
        if let Some(rest) = text.strip_prefix('#') {
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(self.syntax_error());
            }
        }
        if let Some(digits) = text.strip_prefix('?').filter(|d| !d.is_empty()) {
            let in_range = digits
                .parse::<u32>()
                .is_ok_and(|n| (1..=MAX_VARIABLE_NUMBER).contains(&n));
            if !in_range {
                return Err(self.error(format!(
                    "variable number must be between ?1 and ?{MAX_VARIABLE_NUMBER}"
                )));
            }
        }
        self.advance();
        Ok(Expr::Parameter(text.to_string()))
    }

    /// `( select )`, `( expr )` or a row value `( expr, expr, ... )`.
    fn parenthesized(&mut self) -> AstResult<Expr> {
        self.expect(TokenKind::LParen)?;
        if self.at_select_start() {
            let select = self.select()?;
            self.expect(TokenKind::RParen)?;
            return Ok(Expr::Subquery(Box::new(select)));
        }
        let mut list = self.nexprlist()?;
        self.expect(TokenKind::RParen)?;
        match list.pop() {
            Some(only) if list.is_empty() => Ok(only),
            Some(last) => {
                list.push(last);
                Ok(Expr::Vector(list))
            }
            None => Err(self.syntax_error()),
        }
    }

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    fn case(&mut self) -> AstResult<Expr> {
        self.expect_kw(Keyword::Case)?;
        let operand = if self.at_kw(Keyword::When) {
            None
        } else {
            Some(Box::new(self.expr()?))
        };
        let mut list = Vec::new();
        self.expect_kw(Keyword::When)?;
        loop {
            list.push(self.expr()?);
            self.expect_kw(Keyword::Then)?;
            list.push(self.expr()?);
            if !self.eat_kw(Keyword::When) {
                break;
            }
        }
        if self.eat_kw(Keyword::Else) {
            list.push(self.expr()?);
        }
        self.expect_kw(Keyword::End)?;
        Ok(Expr::Case { operand, list })
    }

    /// `CAST ( expr AS type )`. The type is kept as written.
    fn cast(&mut self) -> AstResult<Expr> {
        self.expect_kw(Keyword::Cast)?;
        self.expect(TokenKind::LParen)?;
        let expr = self.expr()?;
        self.expect_kw(Keyword::As)?;
        let start = self.pos;
        self.type_name()?;
        let text = self.source_between(start, self.pos);
        self.expect(TokenKind::RParen)?;
        let type_name = if text.starts_with(['\'', '"', '`', '[']) {
            super::dequote(text)
        } else {
            text.to_string()
        };
        Ok(Expr::Cast {
            expr: Box::new(expr),
            type_name,
        })
    }

    /// `[ids ...] [( signed [, signed] )]`, possibly empty.
    fn type_name(&mut self) -> AstResult<()> {
        if !self.at_ids() {
            return Ok(());
        }
        while self.at_ids() {
            self.advance();
        }
        if self.eat(TokenKind::LParen) {
            self.signed_number()?;
            if self.eat(TokenKind::Comma) {
                self.signed_number()?;
            }
            self.expect(TokenKind::RParen)?;
        }
        Ok(())
    }

    fn signed_number(&mut self) -> AstResult<()> {
        if !self.eat(TokenKind::Plus) {
            self.eat(TokenKind::Minus);
        }
        if self.at(TokenKind::Integer) || self.at(TokenKind::Float) {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error())
        }
    }

    /// `RAISE(IGNORE)` or `RAISE(ROLLBACK|ABORT|FAIL, message)`
    fn raise(&mut self) -> AstResult<Expr> {
        self.expect_kw(Keyword::Raise)?;
        self.expect(TokenKind::LParen)?;
        let expr = if self.eat_kw(Keyword::Ignore) {
            Expr::Raise {
                action: RaiseAction::Ignore,
                message: None,
            }
        } else {
            let action = match self.advance().keyword() {
                Some(Keyword::Rollback) => RaiseAction::Rollback,
                Some(Keyword::Abort) => RaiseAction::Abort,
                Some(Keyword::Fail) => RaiseAction::Fail,
                _ => {
                    self.pos -= 1;
                    return Err(self.syntax_error());
                }
            };
            self.expect(TokenKind::Comma)?;
            let message = self.nm()?;
            Expr::Raise {
                action,
                message: Some(message),
            }
        };
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    /// `nm`, `nm.nm`, `nm.nm.nm` or a function call.
    fn name_or_call(&mut self) -> AstResult<Expr> {
        let token = self.advance();
        if token.kind != TokenKind::String && self.at(TokenKind::LParen) {
            return self.call(super::dequote(token.text));
        }
        let first = Expr::Name(super::dequote(token.text));
        if !self.eat(TokenKind::Dot) {
            return Ok(first);
        }
        let second = Expr::Name(self.nm()?);
        if !self.eat(TokenKind::Dot) {
            return Ok(Expr::Dot {
                left: Box::new(first),
                right: Box::new(second),
            });
        }
        let third = Expr::Name(self.nm()?);
        Ok(Expr::Dot {
            left: Box::new(first),
            right: Box::new(Expr::Dot {
                left: Box::new(second),
                right: Box::new(third),
            }),
        })
    }

    /// Arguments and trailing FILTER / OVER of a call to `name`.
    fn call(&mut self, name: String) -> AstResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let mut call = FunctionCall::new(name, Vec::new());
        let mut order_by = None;
        if self.at(TokenKind::Star) && self.peek_at(1).kind == TokenKind::RParen {
            self.advance();
            call.args = None;
        } else {
            if self.eat_kw(Keyword::Distinct) {
                call.distinct = true;
            } else {
                self.eat_kw(Keyword::All);
            }
            call.args = Some(if self.at_kw(Keyword::Order) {
                Vec::new()
            } else {
                self.exprlist()?
            });
            if self.eat_kw(Keyword::Order) {
                self.expect_kw(Keyword::By)?;
                order_by = Some(self.sortlist()?);
            }
        }
        self.expect(TokenKind::RParen)?;

        call.window = self.filter_over()?.map(Box::new);
        if call.distinct && call.is_window_call() {
            return Err(self.error("DISTINCT is not supported for window functions"));
        }
        if let Some(items) = order_by {
            let has_args = call.args.as_ref().is_some_and(|args| !args.is_empty());
            if has_args {
                if call.is_window_call() {
                    return Err(self.error(format!(
                        "ORDER BY may not be used with non-aggregate {}()",
                        call.name
                    )));
                }
                call.order_by = Some(items.into_iter().map(|item| item.expr).collect());
            }
        }
        Ok(Expr::Function(call))
    }

    /// `[FILTER (WHERE expr)] [OVER (window) | OVER name]`
    fn filter_over(&mut self) -> AstResult<Option<Window>> {
        let filter = if self.eat_kw(Keyword::Filter) {
            self.expect(TokenKind::LParen)?;
            self.expect_kw(Keyword::Where)?;
            let expr = self.expr()?;
            self.expect(TokenKind::RParen)?;
            Some(expr)
        } else {
            None
        };
        let window = if self.at_kw(Keyword::Over) {
            let mut window = self.over_clause()?;
            window.filter = filter;
            Some(window)
        } else {
            filter.map(|expr| {
                let mut window = Window::new(WindowFrame::FilterOnly);
                window.filter = Some(expr);
                window
            })
        };
        Ok(window)
    }

    /// Possibly empty comma-separated expressions.
    pub(super) fn exprlist(&mut self) -> AstResult<Vec<Expr>> {
        if self.at(TokenKind::RParen) {
            return Ok(Vec::new());
        }
        self.nexprlist()
    }

    /// One or more comma-separated expressions.
    pub(super) fn nexprlist(&mut self) -> AstResult<Vec<Expr>> {
        let mut list = vec![self.expr()?];
        while self.eat(TokenKind::Comma) {
            list.push(self.expr()?);
        }
        Ok(list)
    }

    pub(super) fn at_select_start(&self) -> bool {
        matches!(
            self.peek().keyword(),
            Some(Keyword::Select | Keyword::Values | Keyword::With)
        )
    }
}

fn in_select(lhs: Expr, select: Select) -> Expr {
    Expr::In {
        expr: Box::new(lhs),
        rhs: InRhs::Select(Box::new(select)),
    }
}

/// Chain single-row selects with UNION ALL, first row first.
pub(super) fn union_all_rows(rows: Vec<Vec<Expr>>) -> Select {
    let mut chain: Option<Select> = None;
    for row in rows {
        let mut select = Select::with_columns(row.into_iter().map(ResultColumn::new).collect());
        if let Some(prior) = chain.take() {
            select.op = CompoundOp::UnionAll;
            select.prior = Some(Box::new(prior));
        }
        chain = Some(select);
    }
    chain.unwrap_or_default()
}

/// `a AND b` collapses to `0` when either side is a false literal.
fn fold_and(lhs: Expr, rhs: Expr) -> Expr {
    if is_false_literal(&lhs) || is_false_literal(&rhs) {
        Expr::int(0)
    } else {
        Expr::binary(BinaryOp::And, lhs, rhs)
    }
}

fn is_false_literal(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Integer(IntLiteral::Value(0)) | Expr::Boolean(false)
    )
}

/// Whether `expr` can be evaluated without touching any row.
///
/// Bare `true` / `false` names are rewritten to booleans on the way. The
/// walk stops at the first non-constant node. Calls count as constant only
/// with `allow_functions` set, for deterministic built-ins without a window.
pub(super) fn is_constant(expr: &mut Expr, allow_functions: bool) -> bool {
    match expr {
        Expr::Name(name) => {
            let value = if name.eq_ignore_ascii_case("true") {
                true
            } else if name.eq_ignore_ascii_case("false") {
                false
            } else {
                return false;
            };
            *expr = Expr::Boolean(value);
            true
        }
        Expr::Integer(_)
        | Expr::Float(_)
        | Expr::String(_)
        | Expr::Blob(_)
        | Expr::Null
        | Expr::Boolean(_)
        | Expr::Star
        | Expr::Parameter(_)
        | Expr::Unknown { .. } => true,
        Expr::Dot { .. } | Expr::Raise { .. } | Expr::Exists(_) | Expr::Subquery(_) => false,
        Expr::Cast { expr: inner, .. }
        | Expr::Collate { expr: inner, .. }
        | Expr::Span { expr: inner, .. }
        | Expr::Unary { operand: inner, .. }
        | Expr::Truth { operand: inner, .. }
        | Expr::IsNull(inner)
        | Expr::NotNull(inner) => is_constant(inner, allow_functions),
        Expr::Binary { left, right, .. } => {
            is_constant(left, allow_functions) && is_constant(right, allow_functions)
        }
        Expr::Between { expr: inner, list } => {
            is_constant(inner, allow_functions) && all_constant(list, allow_functions)
        }
        Expr::Case { operand, list } => {
            operand
                .as_deref_mut()
                .is_none_or(|e| is_constant(e, allow_functions))
                && all_constant(list, allow_functions)
        }
        Expr::In { expr: inner, rhs } => {
            is_constant(inner, allow_functions)
                && match rhs {
                    InRhs::Values(list) => all_constant(list, allow_functions),
                    InRhs::Select(_) => false,
                }
        }
        Expr::Vector(list) => all_constant(list, allow_functions),
        Expr::Function(call) => {
            allow_functions
                && call.window.is_none()
                && is_constant_function(&call.name)
                && call
                    .args
                    .as_deref_mut()
                    .is_none_or(|args| all_constant(args, allow_functions))
        }
    }
}

fn all_constant(list: &mut [Expr], allow_functions: bool) -> bool {
    list.iter_mut().all(|e| is_constant(e, allow_functions))
}
