//! SELECT statements: WITH, compound chains, select cores, FROM lists.

use super::Parser;
use super::expr::union_all_rows;
use super::keywords::Keyword;
use super::lexer::TokenKind;
use crate::ast::{
    CompoundOp, Cte, Expr, JoinConstraint, JoinType, Limit, Materialized, OrderItem,
    ResultColumn, Select, Source, SourceItem, With,
};
use crate::error::{AstError, AstResult};

/// Most members a compound SELECT may have (SQLITE_LIMIT_COMPOUND_SELECT).
pub const MAX_COMPOUND_SELECT: usize = 500;

/// A parsed select core plus whether it came from a VALUES list.
struct Core {
    select: Select,
    values: bool,
}

impl<'a> Parser<'a> {
    /// `[WITH ...] core [op core]...`
    pub(super) fn select(&mut self) -> AstResult<Select> {
        self.enter()?;
        let result = self.select_inner();
        self.leave();
        result
    }

    fn select_inner(&mut self) -> AstResult<Select> {
        let with = if self.eat_kw(Keyword::With) {
            Some(self.with_clause()?)
        } else {
            None
        };

        let Core {
            select: mut head,
            values: mut last_values,
        } = self.one_select()?;
        while let Some(op) = self.compound_op() {
            let Core {
                select: mut rhs,
                values,
            } = self.one_select()?;
            if rhs.is_compound() {
                // Multi-row VALUES on the right becomes a subquery.
                rhs = Select::star_from(vec![SourceItem::subquery(rhs)]);
            }
            rhs.op = op;
            rhs.prior = Some(Box::new(head));
            head = rhs;
            last_values = values;
        }

        head.with = with;
        self.check_compound(&head, last_values)?;
        Ok(head)
    }

    fn compound_op(&mut self) -> Option<CompoundOp> {
        let op = match self.peek().keyword()? {
            Keyword::Union => {
                self.advance();
                if self.eat_kw(Keyword::All) {
                    CompoundOp::UnionAll
                } else {
                    CompoundOp::Union
                }
            }
            Keyword::Intersect => {
                self.advance();
                CompoundOp::Intersect
            }
            Keyword::Except => {
                self.advance();
                CompoundOp::Except
            }
            _ => return None,
        };
        Some(op)
    }

    /// Only the last member may carry ORDER BY or LIMIT, and the chain is
    /// bounded unless it ends in VALUES.
    fn check_compound(&self, head: &Select, ends_in_values: bool) -> AstResult<()> {
        if !head.is_compound() {
            return Ok(());
        }
        let mut count = 1;
        let mut next = head;
        let mut current = head.prior.as_deref();
        while let Some(member) = current {
            count += 1;
            if member.order_by.is_some() || member.limit.is_some() {
                let clause = if member.order_by.is_some() {
                    "ORDER BY"
                } else {
                    "LIMIT"
                };
                return Err(self.error(format!(
                    "{clause} clause should come after {} not before",
                    next.op
                )));
            }
            next = member;
            current = member.prior.as_deref();
        }
        if !ends_in_values && count > MAX_COMPOUND_SELECT {
            return Err(self.error("too many terms in compound SELECT"));
        }
        Ok(())
    }

    fn one_select(&mut self) -> AstResult<Core> {
        if self.eat_kw(Keyword::Values) {
            let mut rows = Vec::new();
            loop {
                self.expect(TokenKind::LParen)?;
                rows.push(self.nexprlist()?);
                self.expect(TokenKind::RParen)?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            return Ok(Core {
                select: union_all_rows(rows),
                values: true,
            });
        }

        self.expect_kw(Keyword::Select)?;
        let mut select = Select::default();
        if self.eat_kw(Keyword::Distinct) {
            select.distinct = true;
        } else if self.eat_kw(Keyword::All) {
            select.all = true;
        }
        select.columns = self.result_columns()?;
        if self.eat_kw(Keyword::From) {
            select.from = self.from_list()?;
            shift_join_types(&mut select.from);
        }
        if self.eat_kw(Keyword::Where) {
            select.where_clause = Some(self.expr()?);
        }
        if self.eat_kw(Keyword::Group) {
            self.expect_kw(Keyword::By)?;
            select.group_by = Some(self.nexprlist()?);
        }
        if self.eat_kw(Keyword::Having) {
            select.having = Some(self.expr()?);
        }
        if self.eat_kw(Keyword::Window) {
            select.windows = self.window_clause()?;
        }
        if self.eat_kw(Keyword::Order) {
            self.expect_kw(Keyword::By)?;
            select.order_by = Some(self.sortlist()?);
        }
        if self.eat_kw(Keyword::Limit) {
            select.limit = Some(self.limit()?);
        }
        Ok(Core {
            select,
            values: false,
        })
    }

    /// `LIMIT x [OFFSET y]` or `LIMIT y, x`
    fn limit(&mut self) -> AstResult<Limit> {
        let first = self.expr()?;
        if self.eat_kw(Keyword::Offset) {
            return Ok(Limit {
                limit: first,
                offset: Some(self.expr()?),
            });
        }
        if self.eat(TokenKind::Comma) {
            return Ok(Limit {
                limit: self.expr()?,
                offset: Some(first),
            });
        }
        Ok(Limit {
            limit: first,
            offset: None,
        })
    }

    fn result_columns(&mut self) -> AstResult<Vec<ResultColumn>> {
        let mut columns = Vec::new();
        loop {
            columns.push(self.result_column()?);
            if !self.eat(TokenKind::Comma) {
                return Ok(columns);
            }
        }
    }

    fn result_column(&mut self) -> AstResult<ResultColumn> {
        if self.eat(TokenKind::Star) {
            return Ok(ResultColumn::new(Expr::Star));
        }
        if self.at_nm()
            && self.peek_at(1).kind == TokenKind::Dot
            && self.peek_at(2).kind == TokenKind::Star
        {
            let table = self.nm()?;
            self.advance();
            self.advance();
            return Ok(ResultColumn::new(Expr::Dot {
                left: Box::new(Expr::Name(table)),
                right: Box::new(Expr::Star),
            }));
        }
        let expr = self.expr()?;
        Ok(ResultColumn {
            expr,
            alias: self.alias()?,
        })
    }

    /// `AS nm`, a bare `ids`, or nothing.
    fn alias(&mut self) -> AstResult<Option<String>> {
        if self.eat_kw(Keyword::As) {
            return self.nm().map(Some);
        }
        if self.at_ids() {
            return self.ids().map(Some);
        }
        Ok(None)
    }

    /// ORDER BY terms: `expr [ASC|DESC] [NULLS FIRST|LAST]`.
    pub(super) fn sortlist(&mut self) -> AstResult<Vec<OrderItem>> {
        let mut items = Vec::new();
        loop {
            let expr = self.expr()?;
            let desc = if self.eat_kw(Keyword::Desc) {
                true
            } else {
                self.eat_kw(Keyword::Asc);
                false
            };
            let nulls_large = if self.eat_kw(Keyword::Nulls) {
                let nulls_last = if self.eat_kw(Keyword::Last) {
                    true
                } else {
                    self.expect_kw(Keyword::First)?;
                    false
                };
                Some(nulls_last != desc)
            } else {
                None
            };
            items.push(OrderItem {
                expr,
                desc,
                nulls_large,
            });
            if !self.eat(TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    // FROM

    /// FROM items with each item's join flags still describing the join that
    /// follows it; [`shift_join_types`] moves them into place.
    fn from_list(&mut self) -> AstResult<Vec<SourceItem>> {
        let mut items: Vec<SourceItem> = Vec::new();
        loop {
            self.from_item(&mut items)?;
            let Some(join) = self.join_op()? else {
                return Ok(items);
            };
            if let Some(last) = items.last_mut() {
                last.join_type = join;
            }
        }
    }

    /// `,`, `JOIN` or `JOIN_KW [nm [nm]] JOIN`.
    fn join_op(&mut self) -> AstResult<Option<JoinType>> {
        if self.eat(TokenKind::Comma) {
            return Ok(Some(JoinType::NONE));
        }
        if self.eat_kw(Keyword::Join) {
            return Ok(Some(JoinType::INNER));
        }
        if !self.peek().keyword().is_some_and(Keyword::is_join_kw) {
            return Ok(None);
        }
        let first = self.advance();
        let mut words = vec![first];
        while words.len() < 3 && !self.at_kw(Keyword::Join) && self.at_nm() {
            words.push(self.advance());
        }
        self.expect_kw(Keyword::Join)?;

        let mut join = JoinType::NONE;
        let mut known = true;
        for word in &words {
            match join_keyword(word.text) {
                Some(flags) => join |= flags,
                None => {
                    known = false;
                    break;
                }
            }
        }
        let invalid = !known
            || join.contains(JoinType::INNER | JoinType::OUTER)
            || (join.intersects(JoinType::OUTER)
                && !join.intersects(JoinType::LEFT | JoinType::RIGHT));
        if invalid {
            let text: Vec<&str> = words.iter().map(|w| w.text).collect();
            return Err(AstError::parse(
                first.offset,
                format!("unknown join type: {}", text.join(" ")),
            ));
        }
        Ok(Some(join))
    }

    fn from_item(&mut self, items: &mut Vec<SourceItem>) -> AstResult<()> {
        if self.eat(TokenKind::LParen) {
            if self.at_select_start() {
                let select = self.select()?;
                self.expect(TokenKind::RParen)?;
                let mut item = SourceItem::subquery(select);
                item.alias = self.alias()?;
                item.constraint = self.join_constraint(items.is_empty())?;
                items.push(item);
                return Ok(());
            }
            let mut nested = self.from_list()?;
            self.expect(TokenKind::RParen)?;
            let alias = self.alias()?;
            let constraint = self.join_constraint(items.is_empty())?;
            if items.is_empty() && alias.is_none() && constraint.is_none() {
                items.append(&mut nested);
                return Ok(());
            }
            let mut item = if nested.len() == 1 {
                let inner = nested.remove(0);
                let mut lifted = SourceItem::from_source(inner.source);
                lifted.func_args = inner.func_args;
                lifted
            } else {
                shift_join_types(&mut nested);
                SourceItem::subquery(Select::star_from(nested))
            };
            item.alias = alias;
            item.constraint = constraint;
            items.push(item);
            return Ok(());
        }

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
            item.alias = self.alias()?;
        } else {
            item.alias = self.alias()?;
            self.indexed_by()?;
        }
        item.constraint = self.join_constraint(items.is_empty())?;
        items.push(item);
        Ok(())
    }

    /// `INDEXED BY name` or `NOT INDEXED`; accepted and dropped.
    fn indexed_by(&mut self) -> AstResult<()> {
        if self.eat_kw(Keyword::Indexed) {
            self.expect_kw(Keyword::By)?;
            self.nm()?;
        } else if self.at_kw(Keyword::Not) && self.peek_at(1).is(Keyword::Indexed) {
            self.advance();
            self.advance();
        }
        Ok(())
    }

    /// `ON expr` or `USING (names)`. Not allowed on the first item.
    fn join_constraint(&mut self, first: bool) -> AstResult<Option<JoinConstraint>> {
        let token = self.peek();
        let constraint = if self.eat_kw(Keyword::On) {
            JoinConstraint::On(self.expr()?)
        } else if self.eat_kw(Keyword::Using) {
            self.expect(TokenKind::LParen)?;
            let mut names = vec![self.nm()?];
            while self.eat(TokenKind::Comma) {
                names.push(self.nm()?);
            }
            self.expect(TokenKind::RParen)?;
            JoinConstraint::Using(names)
        } else {
            return Ok(None);
        };
        if first {
            let clause = match constraint {
                JoinConstraint::On(_) => "ON",
                JoinConstraint::Using(_) => "USING",
            };
            return Err(AstError::parse(
                token.offset,
                format!("a JOIN clause is required before {clause}"),
            ));
        }
        Ok(Some(constraint))
    }

    // WITH

    fn with_clause(&mut self) -> AstResult<With> {
        let recursive = self.eat_kw(Keyword::Recursive);
        let mut ctes: Vec<Cte> = Vec::new();
        loop {
            let cte = self.cte()?;
            if ctes.iter().any(|c| c.name.eq_ignore_ascii_case(&cte.name)) {
                return Err(self.error(format!("duplicate WITH table name: {}", cte.name)));
            }
            ctes.push(cte);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        tracing::trace!(recursive, ctes = ctes.len(), "parsed WITH clause");
        Ok(With { recursive, ctes })
    }

    /// `name [(col, ...)] AS [[NOT] MATERIALIZED] (select)`
    fn cte(&mut self) -> AstResult<Cte> {
        let name = self.nm()?;
        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                let token = self.peek();
                columns.push(self.nm()?);
                let collated = if self.eat_kw(Keyword::Collate) {
                    self.ids()?;
                    true
                } else {
                    false
                };
                let sorted = self.eat_kw(Keyword::Asc) || self.eat_kw(Keyword::Desc);
                if collated || sorted {
                    return Err(self.error(format!(
                        "syntax error after column name \"{}\"",
                        token.text
                    )));
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }
        self.expect_kw(Keyword::As)?;
        let materialized = if self.eat_kw(Keyword::Materialized) {
            Materialized::Yes
        } else if self.at_kw(Keyword::Not) {
            self.advance();
            self.expect_kw(Keyword::Materialized)?;
            Materialized::No
        } else {
            Materialized::Any
        };
        self.expect(TokenKind::LParen)?;
        let select = self.select()?;
        self.expect(TokenKind::RParen)?;
        Ok(Cte {
            name,
            columns,
            materialized,
            select: Box::new(select),
        })
    }
}

/// Move each item's join flags onto the item after it, so every item
/// describes how it joins the one before. Items left of the last RIGHT
/// join are also tagged LTORJ.
pub(super) fn shift_join_types(items: &mut [SourceItem]) {
    if items.len() < 2 {
        return;
    }
    let mut all = JoinType::NONE;
    for i in (1..items.len()).rev() {
        items[i].join_type = items[i - 1].join_type;
        all |= items[i].join_type;
    }
    items[0].join_type = JoinType::NONE;

    if all.intersects(JoinType::RIGHT) {
        let last_right = items
            .iter()
            .rposition(|item| item.join_type.intersects(JoinType::RIGHT))
            .unwrap_or(0);
        for item in &mut items[..last_right] {
            item.join_type |= JoinType::LTORJ;
        }
    }
}

/// Flags for one word of a `JOIN_KW [nm [nm]] JOIN` sequence.
fn join_keyword(word: &str) -> Option<JoinType> {
    let flags = match word.to_ascii_lowercase().as_str() {
        "natural" => JoinType::NATURAL,
        "left" => JoinType::LEFT | JoinType::OUTER,
        "outer" => JoinType::OUTER,
        "right" => JoinType::RIGHT | JoinType::OUTER,
        "full" => JoinType::LEFT | JoinType::RIGHT | JoinType::OUTER,
        "inner" => JoinType::INNER,
        "cross" => JoinType::INNER | JoinType::CROSS,
        _ => return None,
    };
    Some(flags)
}
