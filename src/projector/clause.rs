use super::Projector;
use crate::ast::{
    JoinConstraint, JoinType, Materialized, OrderItem, ResultColumn, Source, SourceItem, With,
};
use crate::error::AstResult;

/// Canonical phrase for a join, or `None` for a comma join / first item.
///
/// FULL OUTER wins over LEFT, LEFT over RIGHT, RIGHT over CROSS, CROSS over
/// a bare NATURAL, and NATURAL over plain INNER.
pub fn join_phrase(join: JoinType) -> Option<&'static str> {
    let natural = join.contains(JoinType::NATURAL);
    if join.contains(JoinType::LEFT | JoinType::RIGHT) {
        return Some(if natural {
            "NATURAL FULL OUTER JOIN"
        } else {
            "FULL OUTER JOIN"
        });
    }
    if join.contains(JoinType::LEFT) {
        return Some(if natural { "NATURAL LEFT JOIN" } else { "LEFT JOIN" });
    }
    if join.contains(JoinType::RIGHT) {
        return Some(if natural { "NATURAL RIGHT JOIN" } else { "RIGHT JOIN" });
    }
    if join.contains(JoinType::CROSS) {
        return Some("CROSS JOIN");
    }
    if natural {
        return Some("NATURAL JOIN");
    }
    if join.contains(JoinType::INNER) {
        return Some("JOIN");
    }
    None
}

impl Projector {
    pub(crate) fn visit_result_columns(&mut self, columns: &[ResultColumn]) -> AstResult<()> {
        self.out.begin_array()?;
        for column in columns {
            self.out.begin_object()?;
            self.out.key("expr")?;
            self.visit_expr(Some(&column.expr))?;
            self.out.key_str("alias", column.alias.as_deref())?;
            self.out.end_object()?;
        }
        self.out.end_array()
    }

    pub(crate) fn visit_order_by(&mut self, items: Option<&[OrderItem]>) -> AstResult<()> {
        let Some(items) = items else {
            return self.out.null();
        };
        self.out.begin_array()?;
        for item in items {
            self.out.begin_object()?;
            self.out.key("expr")?;
            self.visit_expr(Some(&item.expr))?;
            self.out
                .key_str("direction", Some(if item.desc { "DESC" } else { "ASC" }))?;
            if let Some(large) = item.nulls_large {
                let last = large != item.desc;
                self.out
                    .key_str("nulls", Some(if last { "LAST" } else { "FIRST" }))?;
            }
            self.out.end_object()?;
        }
        self.out.end_array()
    }

    pub(crate) fn visit_id_list(&mut self, names: &[String]) -> AstResult<()> {
        self.out.begin_array()?;
        for name in names {
            self.out.string(Some(name))?;
        }
        self.out.end_array()
    }

    /// An empty FROM list is written as `null`.
    pub(crate) fn visit_from(&mut self, items: &[SourceItem]) -> AstResult<()> {
        if items.is_empty() {
            return self.out.null();
        }
        self.out.begin_array()?;
        for item in items {
            self.visit_source_item(item)?;
        }
        self.out.end_array()
    }

    fn visit_source_item(&mut self, item: &SourceItem) -> AstResult<()> {
        self.out.begin_object()?;
        match &item.source {
            Source::Subquery(select) => {
                self.out.key_str("type", Some("subquery"))?;
                self.out.key("select")?;
                self.visit_select(Some(select))?;
            }
            Source::Table {
                name,
                schema,
                fixed_schema,
            } => {
                self.out.key_str("type", Some("table"))?;
                self.out.key_str("name", Some(name))?;
                if let Some(schema) = schema.as_deref().filter(|_| !fixed_schema) {
                    self.out.key_str("schema", Some(schema))?;
                }
            }
        }
        self.out.key_str("alias", item.alias.as_deref())?;
        self.out.key_str("join_type", join_phrase(item.join_type))?;
        match &item.constraint {
            Some(JoinConstraint::On(expr)) => {
                self.out.key("on")?;
                self.visit_expr(Some(expr))?;
            }
            Some(JoinConstraint::Using(names)) => {
                self.out.key("using")?;
                self.visit_id_list(names)?;
            }
            None => {}
        }
        if let Some(args) = &item.func_args {
            self.out.key("args")?;
            self.visit_expr_list(Some(args))?;
        }
        self.out.end_object()
    }

    pub(crate) fn visit_with(&mut self, with: &With) -> AstResult<()> {
        self.out.begin_array()?;
        for cte in &with.ctes {
            self.out.begin_object()?;
            self.out.key_str("name", Some(&cte.name))?;
            if !cte.columns.is_empty() {
                self.out.key("columns")?;
                self.visit_id_list(&cte.columns)?;
            }
            match cte.materialized {
                Materialized::Yes => self.out.key_str("materialized", Some("MATERIALIZED"))?,
                Materialized::No => {
                    self.out.key_str("materialized", Some("NOT MATERIALIZED"))?
                }
                Materialized::Any => {}
            }
            self.out.key("select")?;
            self.visit_select(Some(&cte.select))?;
            self.out.end_object()?;
        }
        self.out.end_array()
    }
}
