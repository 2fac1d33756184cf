use crate::encode::number::write_canonical_number;
use crate::encode::quoting::{needs_quoting_ext, quote_string_into};
use crate::error::{ToonError, ToonResult};
use crate::options::{Delimiter, EncodeOptions};
use crate::value::Value;

/// Line-oriented output buffer. Lines are separated, never terminated:
/// callers emit a newline before each subsequent line so the finished
/// document carries no trailing newline.
pub(crate) struct Writer {
    buffer: String,
    pub(crate) options: EncodeOptions,
    indent_unit: String,
    indent_cache: Vec<String>,
}

impl Writer {
    pub fn new(options: EncodeOptions) -> Self {
        let indent_unit = " ".repeat(options.indent.get_spaces());
        Self {
            buffer: String::new(),
            options,
            indent_unit,
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn push_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn indent(&mut self, depth: usize) {
        if depth == 0 {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer.push_str(&self.indent_cache[depth]);
    }

    pub fn delimiter_char(&self) -> char {
        self.options.delimiter.as_char()
    }

    pub fn write_delimiter(&mut self) {
        self.buffer.push(self.delimiter_char());
    }

    /// Keys are quoted by exactly the same rule as string values.
    pub fn write_key(&mut self, key: &str) {
        if needs_quoting_ext(key, self.delimiter_char(), self.options.ensure_ascii) {
            quote_string_into(&mut self.buffer, key, self.options.ensure_ascii);
        } else {
            self.buffer.push_str(key);
        }
    }

    /// Scalar leaf in canonical text form, quoted where the grammar
    /// demands it. Composite values are a caller bug surfaced as
    /// `UnsupportedType`; callers recurse instead of passing them here.
    pub fn write_scalar(&mut self, value: &Value) -> ToonResult<()> {
        match value {
            Value::Null => self.buffer.push_str("null"),
            Value::Bool(b) => self.buffer.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write_canonical_number(&mut self.buffer, n),
            Value::String(s) => {
                if needs_quoting_ext(s, self.delimiter_char(), self.options.ensure_ascii) {
                    quote_string_into(&mut self.buffer, s, self.options.ensure_ascii);
                } else {
                    self.buffer.push_str(s);
                }
            }
            other => return Err(ToonError::UnsupportedType(other.type_name().to_string())),
        }
        Ok(())
    }

    /// Array header at the current cursor: `[N]`, `[N<delim>]` for a
    /// non-comma delimiter, `{f1,f2}` field list for tabular form, and
    /// the trailing colon. The owning key, when present, is fused
    /// directly in front by the caller.
    pub fn write_array_header(&mut self, len: usize, fields: Option<&[&str]>) {
        self.buffer.push('[');
        let mut buf = itoa::Buffer::new();
        self.buffer.push_str(buf.format(len as u64));
        if self.options.delimiter != Delimiter::Comma {
            self.write_delimiter();
        }
        self.buffer.push(']');

        if let Some(fields) = fields {
            self.buffer.push('{');
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.write_delimiter();
                }
                self.write_key(field);
            }
            self.buffer.push('}');
        }

        self.buffer.push(':');
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let mut next = self
                .indent_cache
                .last()
                .cloned()
                .unwrap_or_default();
            next.push_str(&self.indent_unit);
            self.indent_cache.push(next);
        }
    }
}
