mod select;

use crate::ast::Select;
use crate::error::AstError;
use crate::parser::parse;

/// Parse a statement that must be a SELECT.
pub(super) fn select(sql: &str) -> Select {
    parse(sql)
        .unwrap_or_else(|e| panic!("{sql}: {e}"))
        .unwrap_or_else(|| panic!("{sql}: not a SELECT"))
}

/// First result column of a single-column SELECT.
pub(super) fn column(sql: &str) -> crate::ast::Expr {
    select(sql).columns.remove(0).expr
}

/// Message of the parse error `sql` produces.
pub(super) fn error(sql: &str) -> String {
    match parse(sql) {
        Err(AstError::Parse { message, .. }) => message,
        other => panic!("{sql}: expected a parse error, got {other:?}"),
    }
}
