//! SQLite SELECT front end.
//!
//! Builds the unresolved [`Select`] tree exactly as SQLite's grammar actions
//! shape it, so the projector sees the same structure the reference tool
//! dumps. Parsing stops after the first statement.
//!
//! Layout:
//! - `lexer` - nom tokenizer
//! - `keywords` - keyword table and classes
//! - `expr` - expression grammar and constant folding
//! - `select` - select cores, compounds, FROM, WITH
//! - `window` - OVER clauses, WINDOW definitions and frames

pub mod keywords;
pub mod lexer;

mod expr;
mod select;
mod window;

#[cfg(test)]
mod tests;

use crate::ast::Select;
use crate::error::{AstError, AstResult};
use keywords::Keyword;
use lexer::{Token, TokenKind};

/// Maximum nesting of expressions and subqueries.
pub const MAX_DEPTH: usize = 1000;

/// Stack for one parse call. Nesting up to [`MAX_DEPTH`] recurses once per
/// level in the parser and again in the projector.
const PARSE_STACK_SIZE: usize = 128 * 1024 * 1024;

/// Receives each top-level SELECT the parser completes.
pub trait SelectHook {
    fn on_select(&mut self, select: &Select) -> AstResult<()>;
}

/// Parse the first statement of `sql`.
///
/// Returns `Ok(None)` when the statement is not a SELECT (or the input is
/// empty).
pub fn parse(sql: &str) -> AstResult<Option<Select>> {
    on_parse_stack(|| Parser::new(sql).statement())
}

/// Parse `sql` and hand a completed top-level SELECT to `hook`. Errors from
/// the hook are returned as is.
///
/// The hook runs on the same thread as the parser, so it may recurse as
/// deeply as the tree does.
pub fn parse_with_hook(sql: &str, hook: &mut (dyn SelectHook + Send)) -> AstResult<()> {
    on_parse_stack(|| match Parser::new(sql).statement()? {
        Some(select) => hook.on_select(&select),
        None => Ok(()),
    })
}

/// Run `f` on a scoped thread sized for [`MAX_DEPTH`] nesting. A panic in
/// `f` is resumed on the caller.
fn on_parse_stack<T: Send>(f: impl FnOnce() -> AstResult<T> + Send) -> AstResult<T> {
    std::thread::scope(|scope| -> AstResult<T> {
        let handle = std::thread::Builder::new()
            .name("dump-ast-parse".into())
            .stack_size(PARSE_STACK_SIZE)
            .spawn_scoped(scope, f)?;
        handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

/// Recursive-descent parser over a token vector.
pub(crate) struct Parser<'a> {
    sql: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(sql: &'a str) -> Self {
        Self {
            sql,
            tokens: lexer::tokenize(sql),
            pos: 0,
            depth: 0,
        }
    }

    fn statement(&mut self) -> AstResult<Option<Select>> {
        while self.eat(TokenKind::Semi) {}
        if self.at(TokenKind::Eof) {
            tracing::debug!("empty input");
            return Ok(None);
        }
        if self.eat_kw(Keyword::Explain) && self.eat_kw(Keyword::Query) {
            self.expect_kw(Keyword::Plan)?;
        }

        let token = self.peek();
        match token.keyword() {
            Some(Keyword::Select | Keyword::Values) => {}
            Some(Keyword::With) if self.with_leads_to_dml() => {
                tracing::debug!("WITH prefix on a data-modifying statement");
                return self.skip_other_statement();
            }
            Some(Keyword::With) => {}
            Some(kw) if kw.starts_other_statement() => {
                tracing::debug!(keyword = kw.as_str(), "not a SELECT statement");
                return self.skip_other_statement();
            }
            _ => return Err(self.syntax_error()),
        }

        let select = self.select()?;
        if !self.at(TokenKind::Semi) && !self.at(TokenKind::Eof) {
            return Err(self.syntax_error());
        }
        tracing::debug!(compound = select.is_compound(), "parsed SELECT statement");
        Ok(Some(select))
    }

    /// Pass over a statement that is not parsed. Only its tokens up to the
    /// first `;` are checked.
    fn skip_other_statement(&mut self) -> AstResult<Option<Select>> {
        let end = self.tokens[self.pos..]
            .iter()
            .position(|t| matches!(t.kind, TokenKind::Semi | TokenKind::Eof))
            .map_or(self.tokens.len(), |n| self.pos + n);
        if let Some(n) = self.tokens[self.pos..end]
            .iter()
            .position(|t| t.kind == TokenKind::Illegal)
        {
            self.pos += n;
            return Err(self.syntax_error());
        }
        Ok(None)
    }

    /// Skim past a WITH prefix to the statement keyword behind it.
    fn with_leads_to_dml(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::Keyword(kw) if depth == 0 => match kw {
                    Keyword::Insert | Keyword::Update | Keyword::Delete | Keyword::Replace => {
                        return true;
                    }
                    Keyword::Select | Keyword::Values => return false,
                    _ => {}
                },
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    // Token cursor

    fn peek(&self) -> Token<'a> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Token<'a> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn at_kw(&self, kw: Keyword) -> bool {
        self.peek().is(kw)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_kw(&mut self, kw: Keyword) -> bool {
        self.eat(TokenKind::Keyword(kw))
    }

    fn expect(&mut self, kind: TokenKind) -> AstResult<Token<'a>> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error())
        }
    }

    fn expect_kw(&mut self, kw: Keyword) -> AstResult<Token<'a>> {
        self.expect(TokenKind::Keyword(kw))
    }

    // Names

    /// `nm`: identifiers, strings, join keywords and fallback keywords.
    fn at_nm(&self) -> bool {
        match self.peek().kind {
            TokenKind::Id | TokenKind::String => true,
            TokenKind::Keyword(kw) => kw.is_join_kw() || kw.falls_back_to_id(),
            _ => false,
        }
    }

    /// `ids`: like `nm` but without the join keywords.
    fn at_ids(&self) -> bool {
        match self.peek().kind {
            TokenKind::Id | TokenKind::String => true,
            TokenKind::Keyword(kw) => kw.falls_back_to_id(),
            _ => false,
        }
    }

    fn nm(&mut self) -> AstResult<String> {
        if self.at_nm() {
            Ok(dequote(self.advance().text))
        } else {
            Err(self.syntax_error())
        }
    }

    fn ids(&mut self) -> AstResult<String> {
        if self.at_ids() {
            Ok(dequote(self.advance().text))
        } else {
            Err(self.syntax_error())
        }
    }

    /// Raw source text between two token positions.
    fn source_between(&self, start: usize, end: usize) -> &'a str {
        if start >= end {
            return "";
        }
        let first = self.tokens[start];
        let last = self.tokens[end - 1];
        &self.sql[first.offset..last.offset + last.text.len()]
    }

    // Errors

    /// Error for the token under the cursor.
    fn syntax_error(&self) -> AstError {
        let token = self.peek();
        let message = match token.kind {
            TokenKind::Eof => "incomplete input".to_string(),
            TokenKind::Illegal => format!("unrecognized token: \"{}\"", token.text),
            _ => format!("near \"{}\": syntax error", token.text),
        };
        AstError::parse(token.offset, message)
    }

    /// Grammar-action error positioned at the cursor.
    fn error(&self, message: impl Into<String>) -> AstError {
        AstError::parse(self.peek().offset, message)
    }

    fn enter(&mut self) -> AstResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!(
                "Expression tree is too large (maximum depth {MAX_DEPTH})"
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Strip SQL quoting: `'..'`, `".."`, `` `..` `` with doubled escapes, and
/// `[..]`. Unquoted text is returned as is.
pub fn dequote(text: &str) -> String {
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), text.chars().last()) else {
        return text.to_string();
    };
    let close = match first {
        '\'' | '"' | '`' => first,
        '[' => ']',
        _ => return text.to_string(),
    };
    if text.len() < 2 || last != close {
        return text.to_string();
    }
    let inner = &text[1..text.len() - 1];
    if first == '[' {
        return inner.to_string();
    }
    let mut doubled = String::with_capacity(2);
    doubled.push(close);
    doubled.push(close);
    inner.replace(&doubled, &close.to_string())
}
