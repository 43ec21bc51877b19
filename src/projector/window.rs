use super::Projector;
use crate::ast::{FrameBound, Window};
use crate::error::AstResult;

impl Projector {
    /// `frame` is written only for ROWS/RANGE/GROUPS frames, including the
    /// implicit default one.
    pub(crate) fn visit_window(&mut self, window: &Window) -> AstResult<()> {
        self.out.begin_object()?;
        self.out.key_str("name", window.name.as_deref())?;
        self.out.key_str("base", window.base.as_deref())?;

        if let Some(partition) = &window.partition_by {
            self.out.key("partition_by")?;
            self.visit_expr_list(Some(partition))?;
        }
        if let Some(order_by) = &window.order_by {
            self.out.key("order_by")?;
            self.visit_order_by(Some(order_by))?;
        }

        if let Some(frame) = window.spec() {
            self.out.key("frame")?;
            self.out.begin_object()?;
            self.out.key_str("type", Some(frame.units.as_str()))?;
            self.out.key("start")?;
            self.visit_frame_bound(&frame.start)?;
            self.out.key("end")?;
            self.visit_frame_bound(&frame.end)?;
            if let Some(exclude) = frame.exclude {
                self.out.key_str("exclude", Some(exclude.as_str()))?;
            }
            self.out.end_object()?;
        }

        if let Some(filter) = &window.filter {
            self.out.key("filter")?;
            self.visit_expr(Some(filter))?;
        }
        self.out.end_object()
    }

    fn visit_frame_bound(&mut self, bound: &FrameBound) -> AstResult<()> {
        self.out.begin_object()?;
        self.out.key_str("type", Some(bound.kind()))?;
        if let Some(expr) = bound.expr() {
            self.out.key("expr")?;
            self.visit_expr(Some(expr))?;
        }
        self.out.end_object()
    }

    pub(crate) fn visit_window_list(&mut self, windows: &[Window]) -> AstResult<()> {
        self.out.begin_array()?;
        for window in windows {
            self.visit_window(window)?;
        }
        self.out.end_array()
    }
}
