//! # dump-ast: SELECT trees as canonical JSON
//!
//! Parses the first statement of a SQLite query and, if it is a SELECT,
//! projects its unresolved tree onto a stable JSON document suitable for
//! diffing across implementations.
//!
//! ## Quick Example
//!
//! ```rust
//! let json = dump_ast::dump("SELECT 1 + 2").unwrap();
//! assert!(json.contains("\"op\": \"+\""));
//! ```
//!
//! ## Pieces
//!
//! | Module      | Role                                          |
//! |-------------|-----------------------------------------------|
//! | `parser`    | SQLite SELECT grammar, builds [`ast::Select`] |
//! | `projector` | tree to JSON, one document per call           |
//! | `json`      | bounded, indenting writer                     |
//! | `capture`   | keeps only the first top-level SELECT         |
//! | `fixture`   | golden files for conformance runs             |

pub mod ast;
pub mod capture;
pub mod config;
pub mod error;
pub mod fixture;
pub mod json;
pub mod parser;
pub mod projector;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::capture::{CaptureBridge, CaptureState};
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::fixture::Fixture;
    pub use crate::parser::parse;
    pub use crate::projector::{Projector, to_json};
    pub use crate::{Session, dump, dump_with};
}

use capture::CaptureBridge;
use config::Config;
use error::{AstError, AstResult};
use json::WriterOptions;

/// Dump the first SELECT of `sql` with default settings.
///
/// # Example
///
/// ```
/// use dump_ast::{dump, error::AstError};
///
/// assert!(dump("SELECT * FROM t").is_ok());
/// assert!(matches!(dump("CREATE TABLE t(x)"), Err(AstError::NoSelect)));
/// ```
pub fn dump(sql: &str) -> AstResult<String> {
    Session::default().run(sql)
}

/// Dump the first SELECT of `sql` using the output settings in `config`.
pub fn dump_with(sql: &str, config: &Config) -> AstResult<String> {
    Session::new(config.clone()).run(sql)
}

/// A reusable dumping context: one capture bridge, re-armed per request.
#[derive(Debug, Default)]
pub struct Session {
    bridge: CaptureBridge,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            bridge: CaptureBridge::new(WriterOptions::from(&config.output)),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse `sql` and return the JSON document of its first SELECT.
    ///
    /// A document captured before a later failure is still returned; the
    /// failure is logged.
    pub fn run(&mut self, sql: &str) -> AstResult<String> {
        self.bridge.arm();
        let result = parser::parse_with_hook(sql, &mut self.bridge);
        match (self.bridge.finish(), result) {
            (Some(document), Ok(())) => Ok(document),
            (Some(document), Err(e)) => {
                tracing::warn!(error = %e, "ignoring error after captured SELECT");
                Ok(document)
            }
            (None, Err(e)) => Err(e),
            (None, Ok(())) => Err(AstError::NoSelect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_reusable() {
        let mut session = Session::default();
        let first = session.run("SELECT 1").unwrap();
        let second = session.run("SELECT 2").unwrap();
        assert_ne!(first, second);
        assert_eq!(session.run("SELECT 1").unwrap(), first);
    }

    #[test]
    fn test_no_select() {
        assert!(matches!(dump(""), Err(AstError::NoSelect)));
        assert!(matches!(
            dump("DELETE FROM t WHERE x = 1"),
            Err(AstError::NoSelect)
        ));
    }

    #[test]
    fn test_parse_error_position() {
        let err = dump("SELECT 1 FROM").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: incomplete input");
        assert_eq!(err.position(), Some(13));
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let depth = parser::MAX_DEPTH + 1;
        let sql = format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = dump(&sql).unwrap_err();
        assert!(matches!(err, AstError::Parse { .. }));
        assert!(err.to_string().contains("Expression tree is too large"));
    }

    #[test]
    fn test_deep_tree_is_projected() {
        let sql = format!("SELECT {}x", "- ".repeat(500));
        let json = dump(&sql).unwrap();
        assert_eq!(json.matches("\"op\": \"-\"").count(), 500);
    }

    #[test]
    fn test_dump_with_indent() {
        let mut config = Config::default();
        config.output.indent = 4;
        let json = dump_with("SELECT 1", &config).unwrap();
        assert!(json.contains("\n    \"type\""));
    }

    #[test]
    fn test_overflow() {
        let mut config = Config::default();
        config.output.max_bytes = 32;
        assert!(matches!(
            dump_with("SELECT a, b, c FROM t", &config),
            Err(AstError::OutputOverflow { limit: 32 })
        ));
    }
}
