use super::Projector;
use crate::ast::{Expr, FunctionCall, InRhs, IntLiteral};
use crate::error::{AstError, AstResult};

impl Projector {
    /// Absent expressions are written as `null`.
    pub(crate) fn visit_expr(&mut self, expr: Option<&Expr>) -> AstResult<()> {
        let Some(expr) = expr else {
            return self.out.null();
        };

        self.out.begin_object()?;
        match expr {
            Expr::Integer(lit) => {
                self.out.key_str("type", Some("integer"))?;
                self.out.key("value")?;
                match lit {
                    IntLiteral::Value(v) => self.out.integer(i64::from(*v))?,
                    IntLiteral::Text(text) => self.out.string(Some(text))?,
                }
            }
            Expr::Float(text) => self.literal("float", text)?,
            Expr::String(text) => self.literal("string", text)?,
            Expr::Blob(text) => self.literal("blob", text)?,
            Expr::Null => self.out.key_str("type", Some("null"))?,
            Expr::Boolean(value) => {
                self.out.key_str("type", Some("boolean"))?;
                self.out.key_bool("value", *value)?;
            }
            Expr::Name(name) => {
                self.out.key_str("type", Some("name"))?;
                self.out.key_str("name", Some(name))?;
            }
            Expr::Star => self.out.key_str("type", Some("star"))?,
            Expr::Dot { left, right } => {
                self.out.key_str("type", Some("dot"))?;
                self.out.key("left")?;
                self.visit_expr(Some(left))?;
                self.out.key("right")?;
                self.visit_expr(Some(right))?;
            }
            Expr::Parameter(name) => {
                self.out.key_str("type", Some("parameter"))?;
                self.out.key_str("name", Some(name))?;
            }
            Expr::Cast { expr, type_name } => {
                self.out.key_str("type", Some("cast"))?;
                self.out.key("expr")?;
                self.visit_expr(Some(expr))?;
                self.out.key_str("as", Some(type_name))?;
            }
            Expr::Case { operand, list } => self.visit_case(operand.as_deref(), list)?,
            Expr::Between { expr, list } => {
                let [low, high] = list.as_slice() else {
                    return Err(AstError::malformed(format!(
                        "BETWEEN expects 2 bounds, found {}",
                        list.len()
                    )));
                };
                self.out.key_str("type", Some("between"))?;
                self.out.key("expr")?;
                self.visit_expr(Some(expr))?;
                self.out.key("low")?;
                self.visit_expr(Some(low))?;
                self.out.key("high")?;
                self.visit_expr(Some(high))?;
            }
            Expr::In { expr, rhs } => {
                self.out.key_str("type", Some("in"))?;
                self.out.key("expr")?;
                self.visit_expr(Some(expr))?;
                match rhs {
                    InRhs::Select(select) => {
                        self.out.key("select")?;
                        self.visit_select(Some(select))?;
                    }
                    InRhs::Values(values) => {
                        self.out.key("values")?;
                        self.visit_expr_list(Some(values))?;
                    }
                }
            }
            Expr::Exists(select) => {
                self.out.key_str("type", Some("exists"))?;
                self.out.key("select")?;
                self.visit_select(Some(select))?;
            }
            Expr::Subquery(select) => {
                self.out.key_str("type", Some("subquery"))?;
                self.out.key("select")?;
                self.visit_select(Some(select))?;
            }
            Expr::Collate { expr, collation } => {
                self.out.key_str("type", Some("collate"))?;
                self.out.key("expr")?;
                self.visit_expr(Some(expr))?;
                self.out.key_str("collation", Some(collation))?;
            }
            Expr::Function(call) => self.visit_function(call)?,
            Expr::Unary { op, operand } => {
                self.out.key_str("type", Some("unary"))?;
                self.out.key_str("op", Some(op.symbol()))?;
                self.out.key("operand")?;
                self.visit_expr(Some(operand))?;
            }
            Expr::IsNull(operand) => self.postfix("isnull", operand)?,
            Expr::NotNull(operand) => self.postfix("notnull", operand)?,
            Expr::Truth {
                negated,
                value,
                operand,
            } => {
                let op = match (negated, value) {
                    (false, true) => "IS TRUE",
                    (false, false) => "IS FALSE",
                    (true, true) => "IS NOT TRUE",
                    (true, false) => "IS NOT FALSE",
                };
                self.out.key_str("type", Some("truth_test"))?;
                self.out.key_str("op", Some(op))?;
                self.out.key("operand")?;
                self.visit_expr(Some(operand))?;
            }
            Expr::Raise { action, message } => {
                self.out.key_str("type", Some("raise"))?;
                self.out.key_str("action", Some(action.as_str()))?;
                if let Some(message) = message {
                    self.out.key_str("message", Some(message))?;
                }
            }
            Expr::Vector(values) => {
                self.out.key_str("type", Some("vector"))?;
                self.out.key("values")?;
                self.visit_expr_list(Some(values))?;
            }
            Expr::Span { text, expr } => {
                self.out.key_str("type", Some("span"))?;
                self.out.key_str("text", Some(text))?;
                self.out.key("expr")?;
                self.visit_expr(Some(expr))?;
            }
            Expr::Binary { op, left, right } => {
                self.out.key_str("type", Some("binary"))?;
                self.out.key_str("op", Some(op.symbol()))?;
                self.out.key("left")?;
                self.visit_expr(Some(left))?;
                self.out.key("right")?;
                self.visit_expr(Some(right))?;
            }
            Expr::Unknown { op } => {
                self.out.key_str("type", Some("unknown"))?;
                self.out.key("op")?;
                self.out.integer(i64::from(*op))?;
            }
        }
        self.out.end_object()
    }

    pub(crate) fn visit_expr_list(&mut self, list: Option<&[Expr]>) -> AstResult<()> {
        let Some(list) = list else {
            return self.out.null();
        };
        self.out.begin_array()?;
        for expr in list {
            self.visit_expr(Some(expr))?;
        }
        self.out.end_array()
    }

    fn literal(&mut self, kind: &str, text: &str) -> AstResult<()> {
        self.out.key_str("type", Some(kind))?;
        self.out.key_str("value", Some(text))
    }

    fn postfix(&mut self, kind: &str, operand: &Expr) -> AstResult<()> {
        self.out.key_str("type", Some(kind))?;
        self.out.key("operand")?;
        self.visit_expr(Some(operand))
    }

    /// WHEN/THEN pairs are taken two at a time; an odd leftover is ELSE.
    fn visit_case(&mut self, operand: Option<&Expr>, list: &[Expr]) -> AstResult<()> {
        self.out.key_str("type", Some("case"))?;
        self.out.key("operand")?;
        self.visit_expr(operand)?;

        self.out.key("when_clauses")?;
        self.out.begin_array()?;
        for pair in list.chunks_exact(2) {
            self.out.begin_object()?;
            self.out.key("when")?;
            self.visit_expr(Some(&pair[0]))?;
            self.out.key("then")?;
            self.visit_expr(Some(&pair[1]))?;
            self.out.end_object()?;
        }
        self.out.end_array()?;

        self.out.key("else")?;
        let else_branch = if list.len() % 2 == 1 { list.last() } else { None };
        self.visit_expr(else_branch)
    }

    fn visit_function(&mut self, call: &FunctionCall) -> AstResult<()> {
        self.out.key_str("type", Some("function"))?;
        self.out.key_str("name", Some(&call.name))?;
        self.out.key("args")?;
        self.visit_expr_list(Some(call.args.as_deref().unwrap_or(&[])))?;
        self.out.key_bool("distinct", call.distinct)?;
        if let Some(order_by) = &call.order_by {
            self.out.key("order_by")?;
            self.visit_expr_list(Some(order_by))?;
        }
        if let Some(window) = call.window.as_deref().filter(|w| !w.is_filter_only()) {
            self.out.key("over")?;
            self.visit_window(window)?;
        }
        Ok(())
    }
}
