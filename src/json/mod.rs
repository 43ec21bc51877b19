//! Pretty-printing JSON emitter with a bounded buffer.
//!
//! The writer is driven by a flat sequence of calls (`begin_object`, `key`,
//! `string`, ...) and tracks only what it needs for layout: whether a comma
//! is pending, whether a value follows a key on the same line, and the
//! current depth. Appending past `max_bytes` fails with
//! [`AstError::OutputOverflow`] instead of truncating.

use std::fmt::Write;

use crate::config::{DEFAULT_MAX_BYTES, OutputConfig};
use crate::error::{AstError, AstResult};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    pub max_bytes: usize,
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            indent: 2,
        }
    }
}

impl From<&OutputConfig> for WriterOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
            indent: config.indent,
        }
    }
}

pub struct JsonWriter {
    buffer: String,
    options: WriterOptions,
    need_comma: bool,
    after_key: bool,
    depth: usize,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new(WriterOptions::default())
    }
}

impl JsonWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            buffer: String::new(),
            options,
            need_comma: false,
            after_key: false,
            depth: 0,
        }
    }

    /// Finished document, without a trailing newline.
    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn begin_object(&mut self) -> AstResult<()> {
        self.open('{')
    }

    pub fn end_object(&mut self) -> AstResult<()> {
        self.close('}')
    }

    pub fn begin_array(&mut self) -> AstResult<()> {
        self.open('[')
    }

    pub fn end_array(&mut self) -> AstResult<()> {
        self.close(']')
    }

    pub fn key(&mut self, name: &str) -> AstResult<()> {
        if self.need_comma {
            self.raw(",")?;
        }
        self.newline()?;
        self.quoted(name)?;
        self.raw(": ")?;
        self.need_comma = false;
        self.after_key = true;
        Ok(())
    }

    /// String value; `None` is written as `null`.
    pub fn string(&mut self, value: Option<&str>) -> AstResult<()> {
        self.prefix()?;
        match value {
            Some(s) => self.quoted(s)?,
            None => self.raw("null")?,
        }
        self.need_comma = true;
        Ok(())
    }

    pub fn integer(&mut self, value: i64) -> AstResult<()> {
        self.prefix()?;
        self.raw(&value.to_string())?;
        self.need_comma = true;
        Ok(())
    }

    pub fn boolean(&mut self, value: bool) -> AstResult<()> {
        self.prefix()?;
        self.raw(if value { "true" } else { "false" })?;
        self.need_comma = true;
        Ok(())
    }

    pub fn null(&mut self) -> AstResult<()> {
        self.prefix()?;
        self.raw("null")?;
        self.need_comma = true;
        Ok(())
    }

    pub fn key_str(&mut self, name: &str, value: Option<&str>) -> AstResult<()> {
        self.key(name)?;
        self.string(value)
    }

    pub fn key_bool(&mut self, name: &str, value: bool) -> AstResult<()> {
        self.key(name)?;
        self.boolean(value)
    }

    pub fn key_null(&mut self, name: &str) -> AstResult<()> {
        self.key(name)?;
        self.null()
    }

    fn open(&mut self, bracket: char) -> AstResult<()> {
        self.prefix()?;
        self.push(bracket)?;
        self.depth += 1;
        self.need_comma = false;
        Ok(())
    }

    fn close(&mut self, bracket: char) -> AstResult<()> {
        self.depth = self.depth.saturating_sub(1);
        self.after_key = false;
        // Nothing was written since the opening bracket.
        if self.need_comma {
            self.newline()?;
        }
        self.push(bracket)?;
        self.need_comma = true;
        Ok(())
    }

    /// Separator before a value: inline after a key, otherwise on a new line.
    fn prefix(&mut self) -> AstResult<()> {
        if self.after_key {
            self.after_key = false;
        } else {
            if self.need_comma {
                self.raw(",")?;
            }
            if !self.buffer.is_empty() {
                self.newline()?;
            }
        }
        self.need_comma = false;
        Ok(())
    }

    fn newline(&mut self) -> AstResult<()> {
        let width = self.depth * self.options.indent;
        self.reserve(1 + width)?;
        self.buffer.push('\n');
        self.buffer.extend(std::iter::repeat_n(' ', width));
        Ok(())
    }

    fn quoted(&mut self, s: &str) -> AstResult<()> {
        self.push('"')?;
        for c in s.chars() {
            match c {
                '"' => self.raw("\\\"")?,
                '\\' => self.raw("\\\\")?,
                '\u{08}' => self.raw("\\b")?,
                '\u{0c}' => self.raw("\\f")?,
                '\n' => self.raw("\\n")?,
                '\r' => self.raw("\\r")?,
                '\t' => self.raw("\\t")?,
                c if (c as u32) < 0x20 => {
                    self.reserve(6)?;
                    // Writing to a String cannot fail.
                    let _ = write!(self.buffer, "\\u{:04x}", c as u32);
                }
                c => self.push(c)?,
            }
        }
        self.push('"')
    }

    fn push(&mut self, c: char) -> AstResult<()> {
        self.reserve(c.len_utf8())?;
        self.buffer.push(c);
        Ok(())
    }

    fn raw(&mut self, s: &str) -> AstResult<()> {
        self.reserve(s.len())?;
        self.buffer.push_str(s);
        Ok(())
    }

    fn reserve(&self, additional: usize) -> AstResult<()> {
        if self.buffer.len() + additional > self.options.max_bytes {
            return Err(AstError::OutputOverflow {
                limit: self.options.max_bytes,
            });
        }
        Ok(())
    }
}
