//! Unresolved SELECT syntax tree.
//!
//! The tree is exactly what the grammar builds: no name binding, no `*`
//! expansion, no constant folding beyond what the grammar actions do.

pub mod expr;
pub mod select;

pub use expr::*;
pub use select::*;
