//! OVER clauses, WINDOW definitions and frame specifications.

use super::Parser;
use super::expr::is_constant;
use super::keywords::Keyword;
use super::lexer::TokenKind;
use crate::ast::{Expr, Frame, FrameBound, FrameExclude, FrameUnits, Window, WindowFrame};
use crate::error::AstResult;

impl<'a> Parser<'a> {
    /// `OVER ( window )` or `OVER name`.
    pub(super) fn over_clause(&mut self) -> AstResult<Window> {
        self.expect_kw(Keyword::Over)?;
        if self.eat(TokenKind::LParen) {
            let window = self.window_body()?;
            self.expect(TokenKind::RParen)?;
            return Ok(window);
        }
        if !self.at_nm() {
            return Err(self.syntax_error());
        }
        let mut window = Window::new(WindowFrame::None);
        window.name = Some(self.advance().text.to_string());
        Ok(window)
    }

    /// `WINDOW name AS (window), ...`, most recent definition first. Each
    /// definition may build on one defined before it.
    pub(super) fn window_clause(&mut self) -> AstResult<Vec<Window>> {
        let mut defined: Vec<Window> = Vec::new();
        loop {
            let name = self.nm_raw()?;
            self.expect_kw(Keyword::As)?;
            self.expect(TokenKind::LParen)?;
            let mut window = self.window_body()?;
            self.expect(TokenKind::RParen)?;
            window.name = Some(name);
            if !defined.is_empty() {
                self.inherit(&mut window, &defined)?;
            }
            defined.insert(0, window);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(defined)
    }

    /// Copy PARTITION BY and ORDER BY from the base window named by `window`.
    fn inherit(&self, window: &mut Window, defined: &[Window]) -> AstResult<()> {
        let Some(base) = window.base.clone() else {
            return Ok(());
        };
        let existing = defined
            .iter()
            .find(|w| w.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(&base)))
            .ok_or_else(|| self.error(format!("no such window: {base}")))?;

        let conflict = if window.partition_by.is_some() {
            Some("PARTITION clause")
        } else if existing.order_by.is_some() && window.order_by.is_some() {
            Some("ORDER BY clause")
        } else if existing.spec().is_some_and(|frame| !frame.implicit) {
            Some("frame specification")
        } else {
            None
        };
        if let Some(what) = conflict {
            return Err(self.error(format!("cannot override {what} of window: {base}")));
        }

        window.partition_by = existing.partition_by.clone();
        if existing.order_by.is_some() {
            window.order_by = existing.order_by.clone();
        }
        window.base = None;
        Ok(())
    }

    /// `[base] [PARTITION BY ...] [ORDER BY ...] [frame]`
    fn window_body(&mut self) -> AstResult<Window> {
        let starts_clause = self.at_kw(Keyword::Partition)
            || self.at_kw(Keyword::Order)
            || self.at_frame_units()
            || self.at(TokenKind::RParen);
        let base = if starts_clause {
            None
        } else {
            Some(self.nm_raw()?)
        };

        let partition_by = if self.eat_kw(Keyword::Partition) {
            self.expect_kw(Keyword::By)?;
            Some(self.nexprlist()?)
        } else {
            None
        };
        let order_by = if self.eat_kw(Keyword::Order) {
            self.expect_kw(Keyword::By)?;
            Some(self.sortlist()?)
        } else {
            None
        };
        let frame = if self.at_frame_units() {
            self.frame()?
        } else {
            Frame::implicit()
        };

        let mut window = Window::new(WindowFrame::Spec(frame));
        window.base = base;
        window.partition_by = partition_by;
        window.order_by = order_by;
        Ok(window)
    }

    fn at_frame_units(&self) -> bool {
        matches!(
            self.peek().keyword(),
            Some(Keyword::Rows | Keyword::Range | Keyword::Groups)
        )
    }

    /// `units start [EXCLUDE ..]` or `units BETWEEN start AND end [EXCLUDE ..]`
    fn frame(&mut self) -> AstResult<Frame> {
        let units = match self.advance().keyword() {
            Some(Keyword::Rows) => FrameUnits::Rows,
            Some(Keyword::Range) => FrameUnits::Range,
            _ => FrameUnits::Groups,
        };
        let (start, end) = if self.eat_kw(Keyword::Between) {
            let start = self.frame_bound(Keyword::Preceding)?;
            self.expect_kw(Keyword::And)?;
            let end = self.frame_bound(Keyword::Following)?;
            (start, end)
        } else {
            (self.frame_bound(Keyword::Preceding)?, FrameBound::CurrentRow)
        };
        let exclude = if self.eat_kw(Keyword::Exclude) {
            Some(self.frame_exclude()?)
        } else {
            None
        };

        let unsupported = matches!(
            (&start, &end),
            (FrameBound::CurrentRow, FrameBound::Preceding(_))
                | (
                    FrameBound::Following(_),
                    FrameBound::Preceding(_) | FrameBound::CurrentRow
                )
        );
        if unsupported {
            return Err(self.error("unsupported frame specification"));
        }

        Ok(Frame {
            units,
            start: constant_offset(start),
            end: constant_offset(end),
            exclude,
            implicit: false,
        })
    }

    /// One frame boundary. `unbounded` is the direction UNBOUNDED may take
    /// at this end of the frame.
    fn frame_bound(&mut self, unbounded: Keyword) -> AstResult<FrameBound> {
        if self.eat_kw(Keyword::Unbounded) {
            self.expect_kw(unbounded)?;
            return Ok(FrameBound::Unbounded);
        }
        if self.eat_kw(Keyword::Current) {
            self.expect_kw(Keyword::Row)?;
            return Ok(FrameBound::CurrentRow);
        }
        let offset = Box::new(self.expr()?);
        if self.eat_kw(Keyword::Preceding) {
            Ok(FrameBound::Preceding(offset))
        } else if self.eat_kw(Keyword::Following) {
            Ok(FrameBound::Following(offset))
        } else {
            Err(self.syntax_error())
        }
    }

    fn frame_exclude(&mut self) -> AstResult<FrameExclude> {
        let token = self.advance();
        match token.keyword() {
            Some(Keyword::No) => {
                self.expect_kw(Keyword::Others)?;
                Ok(FrameExclude::NoOthers)
            }
            Some(Keyword::Current) => {
                self.expect_kw(Keyword::Row)?;
                Ok(FrameExclude::CurrentRow)
            }
            Some(Keyword::Group) => Ok(FrameExclude::Group),
            Some(Keyword::Ties) => Ok(FrameExclude::Ties),
            _ => {
                self.pos -= 1;
                Err(self.syntax_error())
            }
        }
    }

    /// A name kept exactly as written, quotes included.
    fn nm_raw(&mut self) -> AstResult<String> {
        if self.at_nm() {
            Ok(self.advance().text.to_string())
        } else {
            Err(self.syntax_error())
        }
    }
}

/// Offsets must be constant; anything else becomes NULL.
fn constant_offset(bound: FrameBound) -> FrameBound {
    let replace = |mut expr: Box<Expr>| {
        if !is_constant(&mut expr, false) {
            *expr = Expr::Null;
        }
        expr
    };
    match bound {
        FrameBound::Preceding(expr) => FrameBound::Preceding(replace(expr)),
        FrameBound::Following(expr) => FrameBound::Following(replace(expr)),
        other => other,
    }
}
