//! Projection of SELECT trees onto their canonical JSON form.
//!
//! One [`Projector`] owns one [`JsonWriter`] and produces one document.
//! The visit methods are split by tree shape: expressions, clause lists,
//! windows and whole selects.

mod clause;
mod expr;
mod select;
mod window;

#[cfg(test)]
mod tests;

use crate::ast::Select;
use crate::error::AstResult;
use crate::json::{JsonWriter, WriterOptions};

pub use clause::join_phrase;

pub struct Projector {
    out: JsonWriter,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(WriterOptions::default())
    }
}

impl Projector {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            out: JsonWriter::new(options),
        }
    }

    /// Project a whole SELECT (simple or compound) into a JSON document.
    pub fn project(mut self, select: &Select) -> AstResult<String> {
        self.visit_select(Some(select))?;
        Ok(self.out.finish())
    }
}

/// Project `select` with default writer options.
pub fn to_json(select: &Select) -> AstResult<String> {
    Projector::default().project(select)
}
