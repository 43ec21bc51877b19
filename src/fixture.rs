//! Golden fixtures: a SQL statement paired with the AST document it dumps to.
//!
//! Fixture files hold exactly two keys, `sql` and `ast`. Comparison is
//! structural, so key order inside `ast` does not matter but presence does.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::dump_with;
use crate::error::{AstError, AstResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub sql: String,
    pub ast: Value,
}

/// One line of a batch file: `{"name": "...", "sql": "..."}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchEntry {
    pub name: String,
    pub sql: String,
}

impl Fixture {
    /// Dump `sql` and pair it with the result.
    pub fn generate(sql: &str, config: &Config) -> AstResult<Self> {
        let document = dump_with(sql, config)?;
        Ok(Self {
            sql: sql.to_string(),
            ast: serde_json::from_str(&document)?,
        })
    }

    /// Read one fixture file.
    pub fn load(path: &Path) -> AstResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write `<dir>/<name>.json`, creating `dir` if needed.
    pub fn write(&self, dir: &Path, name: &str) -> AstResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.json"));
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "wrote fixture");
        Ok(path)
    }

    /// Regenerate the AST and compare it with the stored one.
    pub fn verify(&self, name: &str, config: &Config) -> AstResult<()> {
        let actual = Self::generate(&self.sql, config)?;
        if actual.ast == self.ast {
            return Ok(());
        }
        Err(AstError::FixtureMismatch {
            name: name.to_string(),
            expected: serde_json::to_string_pretty(&self.ast)?,
            actual: serde_json::to_string_pretty(&actual.ast)?,
        })
    }
}

/// Load every `*.json` fixture in `dir`, sorted by file name. Each entry is
/// paired with its file stem.
pub fn load_dir(dir: &Path) -> AstResult<Vec<(String, Fixture)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok((name, Fixture::load(path)?))
        })
        .collect()
}

/// Parse one batch line. Blank lines yield `None`.
pub fn parse_batch_line(line: &str) -> AstResult<Option<BatchEntry>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}
