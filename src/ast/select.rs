use std::ops::{BitOr, BitOrAssign};

use crate::ast::Expr;

/// Operator joining a compound member to its `prior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompoundOp {
    /// Not part of a compound (or the first member of one).
    #[default]
    Select,
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl CompoundOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompoundOp::Select => "SELECT",
            CompoundOp::Union => "UNION",
            CompoundOp::UnionAll => "UNION ALL",
            CompoundOp::Intersect => "INTERSECT",
            CompoundOp::Except => "EXCEPT",
        }
    }
}

impl std::fmt::Display for CompoundOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One SELECT core, possibly the tail of a compound chain.
///
/// Compound members link backwards: `prior` points at the member written
/// before this one and `op` is the operator between them. Only the last
/// member's ORDER BY and LIMIT belong to the compound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub op: CompoundOp,
    pub prior: Option<Box<Select>>,
    pub distinct: bool,
    pub all: bool,
    pub with: Option<With>,
    pub columns: Vec<ResultColumn>,
    pub from: Vec<SourceItem>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<Vec<Expr>>,
    pub having: Option<Expr>,
    /// Named windows, most recently defined first.
    pub windows: Vec<Window>,
    pub order_by: Option<Vec<OrderItem>>,
    pub limit: Option<Limit>,
}

impl Select {
    /// `SELECT <columns>` with every other clause empty.
    pub fn with_columns(columns: Vec<ResultColumn>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// `SELECT * FROM <from>`
    pub fn star_from(from: Vec<SourceItem>) -> Self {
        Self {
            columns: vec![ResultColumn::new(Expr::Star)],
            from,
            ..Self::default()
        }
    }

    pub fn is_compound(&self) -> bool {
        self.prior.is_some()
    }

    /// Members of the compound chain in source order.
    pub fn members(&self) -> Vec<&Select> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(select) = current {
            chain.push(select);
            current = select.prior.as_deref();
        }
        chain.reverse();
        chain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub expr: Expr,
    /// Only set by `AS name` or an implicit `expr name`.
    pub alias: Option<String>,
}

impl ResultColumn {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub desc: bool,
    /// `Some` only when NULLS FIRST/LAST was written. The flag is set when
    /// the requested NULLS placement differs from the sort direction.
    pub nulls_large: Option<bool>,
}

impl OrderItem {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            desc: false,
            nulls_large: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub limit: Expr,
    pub offset: Option<Expr>,
}

/// Join flags relative to the previous FROM item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinType(u8);

impl JoinType {
    pub const NONE: JoinType = JoinType(0);
    pub const INNER: JoinType = JoinType(0x01);
    pub const CROSS: JoinType = JoinType(0x02);
    pub const NATURAL: JoinType = JoinType(0x04);
    pub const LEFT: JoinType = JoinType(0x08);
    pub const RIGHT: JoinType = JoinType(0x10);
    pub const OUTER: JoinType = JoinType(0x20);
    /// Item sits to the left of a RIGHT JOIN.
    pub const LTORJ: JoinType = JoinType(0x40);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: JoinType) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: JoinType) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for JoinType {
    type Output = JoinType;

    fn bitor(self, rhs: JoinType) -> JoinType {
        JoinType(self.0 | rhs.0)
    }
}

impl BitOrAssign for JoinType {
    fn bitor_assign(&mut self, rhs: JoinType) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table {
        name: String,
        schema: Option<String>,
        /// Schema was pinned implicitly rather than written by the user.
        fixed_schema: bool,
    },
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<String>),
}

/// One FROM-clause term.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceItem {
    pub source: Source,
    pub alias: Option<String>,
    pub join_type: JoinType,
    pub constraint: Option<JoinConstraint>,
    /// Table-valued function arguments.
    pub func_args: Option<Vec<Expr>>,
}

impl SourceItem {
    pub fn table(name: impl Into<String>) -> Self {
        Self::from_source(Source::Table {
            name: name.into(),
            schema: None,
            fixed_schema: false,
        })
    }

    pub fn subquery(select: Select) -> Self {
        Self::from_source(Source::Subquery(Box::new(select)))
    }

    pub fn from_source(source: Source) -> Self {
        Self {
            source,
            alias: None,
            join_type: JoinType::NONE,
            constraint: None,
            func_args: None,
        }
    }
}

/// CTE materialization hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Materialized {
    #[default]
    Any,
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub materialized: Materialized,
    pub select: Box<Select>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnits {
    Rows,
    Range,
    Groups,
}

impl FrameUnits {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameUnits::Rows => "ROWS",
            FrameUnits::Range => "RANGE",
            FrameUnits::Groups => "GROUPS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    Unbounded,
    CurrentRow,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

impl FrameBound {
    pub fn kind(&self) -> &'static str {
        match self {
            FrameBound::Unbounded => "UNBOUNDED",
            FrameBound::CurrentRow => "CURRENT ROW",
            FrameBound::Preceding(_) => "PRECEDING",
            FrameBound::Following(_) => "FOLLOWING",
        }
    }

    pub fn expr(&self) -> Option<&Expr> {
        match self {
            FrameBound::Preceding(e) | FrameBound::Following(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameExclude {
    NoOthers,
    CurrentRow,
    Group,
    Ties,
}

impl FrameExclude {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameExclude::NoOthers => "NO OTHERS",
            FrameExclude::CurrentRow => "CURRENT ROW",
            FrameExclude::Group => "GROUP",
            FrameExclude::Ties => "TIES",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub units: FrameUnits,
    pub start: FrameBound,
    pub end: FrameBound,
    pub exclude: Option<FrameExclude>,
    /// Default `RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW` supplied
    /// when no frame was written.
    pub implicit: bool,
}

impl Frame {
    pub fn implicit() -> Self {
        Self {
            units: FrameUnits::Range,
            start: FrameBound::Unbounded,
            end: FrameBound::CurrentRow,
            exclude: None,
            implicit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowFrame {
    /// Bare `OVER name` reference.
    None,
    /// `f(x) FILTER (WHERE ...)` without OVER.
    FilterOnly,
    Spec(Frame),
}

/// A window definition or OVER clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub name: Option<String>,
    pub base: Option<String>,
    pub partition_by: Option<Vec<Expr>>,
    pub order_by: Option<Vec<OrderItem>>,
    pub frame: WindowFrame,
    pub filter: Option<Expr>,
}

impl Window {
    pub fn new(frame: WindowFrame) -> Self {
        Self {
            name: None,
            base: None,
            partition_by: None,
            order_by: None,
            frame,
            filter: None,
        }
    }

    pub fn is_filter_only(&self) -> bool {
        matches!(self.frame, WindowFrame::FilterOnly)
    }

    pub fn spec(&self) -> Option<&Frame> {
        match &self.frame {
            WindowFrame::Spec(frame) => Some(frame),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_in_source_order() {
        let first = Select::with_columns(vec![ResultColumn::new(Expr::int(1))]);
        let mut second = Select::with_columns(vec![ResultColumn::new(Expr::int(2))]);
        second.op = CompoundOp::Union;
        second.prior = Some(Box::new(first));
        let mut third = Select::with_columns(vec![ResultColumn::new(Expr::int(3))]);
        third.op = CompoundOp::Except;
        third.prior = Some(Box::new(second));

        let members = third.members();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].columns[0].expr, Expr::int(1));
        assert_eq!(members[1].op, CompoundOp::Union);
        assert_eq!(members[2].op, CompoundOp::Except);
        assert!(third.is_compound());
        assert!(!members[0].is_compound());
    }

    #[test]
    fn test_join_flags() {
        let full = JoinType::LEFT | JoinType::RIGHT | JoinType::OUTER;
        assert!(full.contains(JoinType::LEFT | JoinType::RIGHT));
        assert!(!full.contains(JoinType::NATURAL));
        assert!(full.intersects(JoinType::RIGHT));
        assert_eq!(full.bits(), 0x38);
        assert!(JoinType::default().is_empty());
    }
}
