use super::Projector;
use crate::ast::{Limit, Select};
use crate::error::AstResult;

impl Projector {
    pub(crate) fn visit_select(&mut self, select: Option<&Select>) -> AstResult<()> {
        match select {
            None => self.out.null(),
            Some(select) if select.is_compound() => self.visit_compound(select),
            Some(select) => self.visit_simple(select),
        }
    }

    fn visit_simple(&mut self, select: &Select) -> AstResult<()> {
        self.out.begin_object()?;
        self.visit_core(select, |p| {
            if let Some(with) = &select.with {
                p.out.key("with")?;
                p.visit_with(with)?;
            }
            Ok(())
        })?;
        if !select.windows.is_empty() {
            self.out.key("window_definitions")?;
            self.visit_window_list(&select.windows)?;
        }
        self.out.key("order_by")?;
        self.visit_order_by(select.order_by.as_deref())?;
        self.visit_limit(select.limit.as_ref())?;
        self.out.end_object()
    }

    /// The chain is collected tail to head and written in source order.
    /// Each member after the first carries the operator stored on itself.
    fn visit_compound(&mut self, select: &Select) -> AstResult<()> {
        let members = select.members();
        tracing::trace!(members = members.len(), "flattening compound select");

        self.out.begin_object()?;
        self.out.key_str("type", Some("compound"))?;
        if let Some(with) = &select.with {
            self.out.key("with")?;
            self.visit_with(with)?;
        }
        self.out.key("body")?;
        self.out.begin_array()?;
        for (i, member) in members.iter().enumerate() {
            self.out.begin_object()?;
            if i > 0 {
                self.out.key_str("operator", Some(member.op.as_str()))?;
            }
            self.out.key("select")?;
            self.out.begin_object()?;
            self.visit_core(member, |_| Ok(()))?;
            self.out.end_object()?;
            self.out.end_object()?;
        }
        self.out.end_array()?;
        self.out.key("order_by")?;
        self.visit_order_by(select.order_by.as_deref())?;
        self.visit_limit(select.limit.as_ref())?;
        self.out.end_object()
    }

    /// Fields shared by simple selects and compound members. `extra` runs
    /// between the flags and the column list.
    fn visit_core<F>(&mut self, select: &Select, extra: F) -> AstResult<()>
    where
        F: FnOnce(&mut Self) -> AstResult<()>,
    {
        self.out.key_str("type", Some("select"))?;
        self.out.key_bool("distinct", select.distinct)?;
        self.out.key_bool("all", select.all)?;
        extra(self)?;
        self.out.key("columns")?;
        self.visit_result_columns(&select.columns)?;
        self.out.key("from")?;
        self.visit_from(&select.from)?;
        self.out.key("where")?;
        self.visit_expr(select.where_clause.as_ref())?;
        self.out.key("group_by")?;
        self.visit_expr_list(select.group_by.as_deref())?;
        self.out.key("having")?;
        self.visit_expr(select.having.as_ref())
    }

    /// With a LIMIT clause both keys are written; without one only
    /// `"limit": null`.
    fn visit_limit(&mut self, limit: Option<&Limit>) -> AstResult<()> {
        match limit {
            Some(limit) => {
                self.out.key("limit")?;
                self.visit_expr(Some(&limit.limit))?;
                self.out.key("offset")?;
                self.visit_expr(limit.offset.as_ref())
            }
            None => self.out.key_null("limit"),
        }
    }
}
