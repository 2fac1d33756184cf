use indexmap::IndexMap;
use memchr::{memchr, memchr2, memchr_iter};
use smallvec::SmallVec;

use crate::decode::expand;
use crate::decode::scanner::{LineCursor, ParsedLine};
use crate::decode::validator::{ValidationWarning, Validator};
use crate::encode::number::has_forbidden_leading_zeros;
use crate::error::{ToonError, ToonResult};
use crate::handlers::TypeHandlerRegistry;
use crate::options::{DecodeOptions, ExpandPaths};
use crate::value::{Number, Value};

type TokenBuf<'a> = SmallVec<[&'a str; 16]>;

/// An array header parsed from one line: optional owning key, declared
/// length, delimiter (explicit marker or comma), optional tabular field
/// list, optional inline payload.
#[derive(Debug)]
struct ArrayHeader<'a> {
    key: Option<KeyToken>,
    len: usize,
    delimiter: char,
    fields: Option<Vec<KeyToken>>,
    inline: Option<&'a str>,
}

#[derive(Debug, Clone)]
struct KeyToken {
    value: String,
    quoted: bool,
}

/// Recursive-descent decoder over scanned lines. Blank lines never reach
/// it; the scanner keeps them on a side list.
pub(crate) struct Parser<'s, 'a> {
    cursor: LineCursor<'s, 'a>,
    validator: Validator,
    expand_paths: ExpandPaths,
    max_depth: usize,
    handlers: Option<&'s TypeHandlerRegistry>,
}

impl<'s, 'a> Parser<'s, 'a> {
    pub fn new(
        lines: &'s [ParsedLine<'a>],
        validator: Validator,
        options: &DecodeOptions,
        handlers: Option<&'s TypeHandlerRegistry>,
    ) -> Self {
        Self {
            cursor: LineCursor::new(lines),
            validator,
            expand_paths: options.expand_paths,
            max_depth: options.max_depth,
            handlers,
        }
    }

    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        self.validator.into_warnings()
    }

    pub fn parse_document(&mut self) -> ToonResult<Value> {
        let Some(first) = self.cursor.peek().copied() else {
            return Ok(Value::Object(IndexMap::new()));
        };

        if self.validator.strict() && first.depth != 0 {
            return Err(ToonError::syntax(
                "Unexpected indentation",
                first.line_number,
                first.indent + 1,
            ));
        }

        if first.content.starts_with('[') {
            if let Some(header) =
                self.parse_array_header(first.content, first.line_number, first.indent + 1)?
            {
                if header.key.is_none() {
                    self.cursor.advance();
                    let value = self.parse_array_body(
                        &header,
                        first.depth,
                        first.line_number,
                        first.indent + 1,
                    )?;
                    self.ensure_consumed()?;
                    return Ok(value);
                }
            }
        }

        if self.cursor.len() == 1 {
            let content = first.content;
            let structured = self
                .parse_array_header(content, first.line_number, first.indent + 1)?
                .is_some()
                || split_key_value(content, first.line_number, first.indent + 1)?.is_some();
            if !structured {
                self.cursor.advance();
                return self.parse_scalar_token(content, first.line_number, first.indent + 1);
            }
        }

        let mut map = IndexMap::new();
        self.parse_object_into(&mut map, first.depth)?;
        self.ensure_consumed()?;
        Ok(Value::Object(map))
    }

    fn ensure_consumed(&self) -> ToonResult<()> {
        if let Some(line) = self.cursor.peek() {
            return Err(ToonError::syntax(
                "Unexpected trailing content",
                line.line_number,
                line.indent + 1,
            ));
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> ToonResult<()> {
        if depth > self.max_depth {
            return Err(ToonError::MaxDepthExceeded(self.max_depth));
        }
        Ok(())
    }

    fn parse_object(&mut self, depth: usize) -> ToonResult<Value> {
        let mut map = IndexMap::new();
        self.parse_object_into(&mut map, depth)?;
        Ok(Value::Object(map))
    }

    fn parse_object_into(
        &mut self,
        map: &mut IndexMap<String, Value>,
        depth: usize,
    ) -> ToonResult<()> {
        while let Some(line) = self.cursor.peek().copied() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(ToonError::syntax(
                    "Unexpected indentation",
                    line.line_number,
                    line.indent + 1,
                ));
            }
            let line_no = line.line_number;
            let column = line.indent + 1;
            self.check_depth(depth)?;

            if let Some(header) = self.parse_array_header(line.content, line_no, column)? {
                let Some(key) = header.key.clone() else {
                    return Err(ToonError::syntax(
                        "Array header missing key in object context",
                        line_no,
                        column,
                    ));
                };
                self.cursor.advance();
                let value = self.parse_array_body(&header, depth, line_no, column)?;
                self.insert_entry(map, key, value, line_no, column)?;
                continue;
            }

            if let Some((key_raw, value_raw)) = split_key_value(line.content, line_no, column)? {
                self.cursor.advance();
                let key = self.parse_key_token(key_raw.trim(), line_no, column)?;
                let value_trimmed = value_raw.trim();
                let value = if value_trimmed.is_empty() {
                    match self.cursor.peek() {
                        Some(next) if next.depth > depth => self.parse_object(depth + 1)?,
                        _ => Value::Object(IndexMap::new()),
                    }
                } else {
                    self.parse_scalar_token(value_trimmed, line_no, column)?
                };
                self.insert_entry(map, key, value, line_no, column)?;
                continue;
            }

            if self.validator.strict() {
                return Err(ToonError::syntax(
                    "Expected 'key: value'",
                    line_no,
                    column,
                ));
            }
            self.cursor.advance();
            let key = self.parse_key_token(line.content, line_no, column)?;
            self.insert_entry(map, key, Value::Null, line_no, column)?;
        }
        Ok(())
    }

    fn insert_entry(
        &mut self,
        map: &mut IndexMap<String, Value>,
        key: KeyToken,
        value: Value,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        if self.expand_paths == ExpandPaths::Safe {
            if let Some(parts) = expand::expandable_parts(&key.value, key.quoted) {
                return expand::insert_path(map, &parts, value, line, column);
            }
        }
        if map.contains_key(&key.value) {
            self.validator.validate_duplicate_key(&key.value, line, column)?;
        }
        map.insert(key.value, value);
        Ok(())
    }

    /// Dispatch an array body per its header: inline payload, tabular
    /// rows, or `- ` list items. `base_depth` is the depth of the line
    /// carrying the header; body lines sit one deeper (the encoder's
    /// form) or at the header's own depth (tolerated at the root).
    fn parse_array_body(
        &mut self,
        header: &ArrayHeader<'a>,
        base_depth: usize,
        line_no: usize,
        column: usize,
    ) -> ToonResult<Value> {
        self.check_depth(base_depth + 1)?;

        if let Some(payload) = header.inline {
            let tokens = split_delimited(payload, header.delimiter, line_no, column)?;
            let mut items = Vec::with_capacity(tokens.len());
            for token in &tokens {
                if token.is_empty() {
                    items.push(Value::String(String::new()));
                } else {
                    items.push(self.parse_scalar_token(token, line_no, column)?);
                }
            }
            self.validator
                .validate_array_length(header.len, items.len(), line_no, column)?;
            return Ok(Value::Array(items));
        }

        if let Some(fields) = &header.fields {
            return self.parse_tabular_rows(header, fields, base_depth, line_no, column);
        }

        if header.len == 0 {
            return Ok(Value::Array(Vec::new()));
        }

        self.parse_list_items(header, base_depth, line_no, column)
    }

    fn parse_tabular_rows(
        &mut self,
        header: &ArrayHeader<'a>,
        fields: &[KeyToken],
        base_depth: usize,
        line_no: usize,
        column: usize,
    ) -> ToonResult<Value> {
        if fields.is_empty() {
            return Err(ToonError::syntax("Empty field list", line_no, column));
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.value == field.value) {
                return Err(ToonError::syntax(
                    format!("Duplicate field name '{}'", field.value),
                    line_no,
                    column,
                ));
            }
        }

        let mut rows = Vec::with_capacity(header.len);
        let mut row_depth: Option<usize> = None;
        while let Some(line) = self.cursor.peek().copied() {
            match row_depth {
                None => {
                    if line.depth > base_depth + 1 {
                        return Err(ToonError::syntax(
                            "Unexpected indentation",
                            line.line_number,
                            line.indent + 1,
                        ));
                    }
                    if line.depth < base_depth
                        || !looks_like_row(line.content, header.delimiter)
                    {
                        break;
                    }
                    row_depth = Some(line.depth);
                }
                Some(expected) => {
                    if line.depth > expected {
                        return Err(ToonError::syntax(
                            "Unexpected indentation",
                            line.line_number,
                            line.indent + 1,
                        ));
                    }
                    if line.depth < expected || !looks_like_row(line.content, header.delimiter) {
                        break;
                    }
                }
            }

            self.cursor.advance();
            let row_line = line.line_number;
            let row_column = line.indent + 1;
            let cells = split_delimited(line.content, header.delimiter, row_line, row_column)?;
            self.validator.validate_field_count(
                fields.len(),
                cells.len(),
                rows.len() + 1,
                row_line,
                row_column,
            )?;

            let mut obj = IndexMap::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                let value = match cells.get(i) {
                    Some(token) if !token.is_empty() => {
                        self.parse_scalar_token(token, row_line, row_column)?
                    }
                    Some(_) => Value::String(String::new()),
                    None => Value::Null,
                };
                obj.insert(field.value.clone(), value);
            }
            rows.push(Value::Object(obj));

            if rows.len() == header.len && row_depth == Some(base_depth) {
                // Rows at the header's own depth have no dedent boundary;
                // the declared count is the only terminator.
                break;
            }
        }

        self.validator
            .validate_row_count(header.len, rows.len(), line_no, column)?;
        Ok(Value::Array(rows))
    }

    fn parse_list_items(
        &mut self,
        header: &ArrayHeader<'a>,
        base_depth: usize,
        line_no: usize,
        column: usize,
    ) -> ToonResult<Value> {
        let mut items = Vec::with_capacity(header.len);
        let mut item_depth: Option<usize> = None;
        while let Some(line) = self.cursor.peek().copied() {
            let is_item = line.content.starts_with('-');
            match item_depth {
                None => {
                    if line.depth > base_depth + 1 {
                        return Err(ToonError::syntax(
                            "Unexpected indentation",
                            line.line_number,
                            line.indent + 1,
                        ));
                    }
                    if line.depth < base_depth || !is_item {
                        break;
                    }
                    item_depth = Some(line.depth);
                }
                Some(expected) => {
                    if line.depth > expected {
                        return Err(ToonError::syntax(
                            "Unexpected indentation",
                            line.line_number,
                            line.indent + 1,
                        ));
                    }
                    if line.depth < expected || !is_item {
                        break;
                    }
                }
            }

            self.cursor.advance();
            let item_content = line.content[1..].trim_start();
            let item = self.parse_list_item(item_content, line)?;
            items.push(item);

            if items.len() == header.len && item_depth == Some(base_depth) {
                break;
            }
        }

        self.validator
            .validate_array_length(header.len, items.len(), line_no, column)?;
        Ok(Value::Array(items))
    }

    /// One `- ` element: empty object, nested array (fused or keyless
    /// header), object with its first pair on the dash line, or a bare
    /// scalar.
    fn parse_list_item(&mut self, item_content: &'a str, line: ParsedLine<'a>) -> ToonResult<Value> {
        let item_depth = line.depth;
        let line_no = line.line_number;
        let column = line.indent + 1;

        if item_content.is_empty() || item_content == "{}" {
            return Ok(Value::Object(IndexMap::new()));
        }

        if let Some(header) = self.parse_array_header(item_content, line_no, column)? {
            match &header.key {
                None => return self.parse_array_body(&header, item_depth, line_no, column),
                Some(key) => {
                    let key = key.clone();
                    let value = self.parse_array_body(&header, item_depth + 1, line_no, column)?;
                    let mut map = IndexMap::new();
                    self.insert_entry(&mut map, key, value, line_no, column)?;
                    self.parse_object_into(&mut map, item_depth + 1)?;
                    return Ok(Value::Object(map));
                }
            }
        }

        if let Some((key_raw, value_raw)) = split_key_value(item_content, line_no, column)? {
            let key = self.parse_key_token(key_raw.trim(), line_no, column)?;
            let value_trimmed = value_raw.trim();
            let value = if value_trimmed.is_empty() {
                // Nested content of the first pair sits two levels below
                // the dash; one level below means sibling fields.
                match self.cursor.peek() {
                    Some(next) if next.depth > item_depth + 1 => {
                        self.parse_object(item_depth + 2)?
                    }
                    _ => Value::Object(IndexMap::new()),
                }
            } else {
                self.parse_scalar_token(value_trimmed, line_no, column)?
            };
            let mut map = IndexMap::new();
            self.insert_entry(&mut map, key, value, line_no, column)?;
            self.parse_object_into(&mut map, item_depth + 1)?;
            return Ok(Value::Object(map));
        }

        self.parse_scalar_token(item_content, line_no, column)
    }

    /// Recognize and decompose an array-header line. Returns `Ok(None)`
    /// when the line has no unquoted `[` before its first unquoted `:`.
    fn parse_array_header(
        &self,
        content: &'a str,
        line_no: usize,
        column: usize,
    ) -> ToonResult<Option<ArrayHeader<'a>>> {
        let mut bracket_start = None;
        let mut in_quotes = false;
        let mut escape = false;
        for (idx, ch) in content.char_indices() {
            if escape {
                escape = false;
                continue;
            }
            if in_quotes {
                match ch {
                    '\\' => escape = true,
                    '"' => in_quotes = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_quotes = true,
                '[' => {
                    bracket_start = Some(idx);
                    break;
                }
                ':' => return Ok(None),
                _ => {}
            }
        }
        if in_quotes {
            return Err(ToonError::syntax("Unterminated string", line_no, column));
        }
        let Some(bracket_start) = bracket_start else {
            return Ok(None);
        };

        let bracket_end = match content[bracket_start + 1..].find(']') {
            Some(idx) => bracket_start + 1 + idx,
            None => {
                return Err(ToonError::syntax(
                    "Unterminated array header",
                    line_no,
                    column,
                ));
            }
        };

        let key_part = content[..bracket_start].trim();
        let key = if key_part.is_empty() {
            None
        } else {
            Some(self.parse_key_token(key_part, line_no, column)?)
        };

        let inner = content[bracket_start + 1..bracket_end].trim_matches(' ');
        let mut digits_end = 0;
        for (idx, ch) in inner.char_indices() {
            if ch.is_ascii_digit() {
                digits_end = idx + ch.len_utf8();
            } else {
                break;
            }
        }
        if digits_end == 0 {
            return Err(ToonError::syntax("Array length missing", line_no, column));
        }
        let len: usize = inner[..digits_end]
            .parse()
            .map_err(|_| ToonError::syntax("Invalid array length", line_no, column))?;

        let mut delimiter = ',';
        let mut marker = inner[digits_end..].chars().skip_while(|ch| *ch == ' ');
        if let Some(ch) = marker.next() {
            if !matches!(ch, ',' | '\t' | '|') || marker.any(|extra| extra != ' ') {
                return Err(ToonError::syntax(
                    "Invalid array delimiter",
                    line_no,
                    column,
                ));
            }
            delimiter = ch;
        }

        let mut rest = content[bracket_end + 1..].trim_start();
        let mut fields = None;
        if let Some(after_brace) = rest.strip_prefix('{') {
            let end = after_brace.find('}').ok_or_else(|| {
                ToonError::syntax("Unterminated field list", line_no, column)
            })?;
            let segment = &after_brace[..end];
            let mut parsed = Vec::new();
            for token in split_delimited(segment, delimiter, line_no, column)? {
                if token.is_empty() {
                    return Err(ToonError::syntax("Empty field name", line_no, column));
                }
                parsed.push(self.parse_key_token(token, line_no, column)?);
            }
            fields = Some(parsed);
            rest = after_brace[end + 1..].trim_start();
        }

        let colon_idx = rest.find(':').ok_or_else(|| {
            ToonError::syntax("Array header missing ':'", line_no, column)
        })?;
        if !rest[..colon_idx].trim().is_empty() {
            return Err(ToonError::syntax("Invalid array header", line_no, column));
        }
        let payload = rest[colon_idx + 1..].trim();
        let inline = if payload.is_empty() {
            None
        } else {
            Some(payload)
        };

        Ok(Some(ArrayHeader {
            key,
            len,
            delimiter,
            fields,
            inline,
        }))
    }

    fn parse_key_token(&self, token: &str, line_no: usize, column: usize) -> ToonResult<KeyToken> {
        if token.starts_with('"') {
            let value = parse_quoted(token, line_no, column)?;
            return Ok(KeyToken {
                value,
                quoted: true,
            });
        }
        Ok(KeyToken {
            value: token.to_string(),
            quoted: false,
        })
    }

    fn parse_scalar_token(
        &self,
        token: &str,
        line_no: usize,
        column: usize,
    ) -> ToonResult<Value> {
        if token.starts_with('"') {
            return Ok(Value::String(parse_quoted(token, line_no, column)?));
        }
        match token {
            "null" => return Ok(Value::Null),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Some(number) = parse_number_token(token) {
            return Ok(Value::Number(number));
        }
        if let Some(registry) = self.handlers {
            if let Some(value) = registry.decode_token(token) {
                return Ok(value);
            }
        }
        Ok(Value::String(token.to_string()))
    }
}

/// Split `key: value` at the first colon outside quotes.
fn split_key_value<'c>(
    content: &'c str,
    line_no: usize,
    column: usize,
) -> ToonResult<Option<(&'c str, &'c str)>> {
    let bytes = content.as_bytes();
    if memchr(b'"', bytes).is_none() && memchr(b'\\', bytes).is_none() {
        return Ok(memchr(b':', bytes).map(|idx| (&content[..idx], &content[idx + 1..])));
    }

    let mut in_quotes = false;
    let mut escape = false;
    for (idx, &byte) in bytes.iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if in_quotes {
            match byte {
                b'\\' => escape = true,
                b'"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_quotes = true,
            b':' => return Ok(Some((&content[..idx], &content[idx + 1..]))),
            _ => {}
        }
    }
    if in_quotes {
        return Err(ToonError::syntax("Unterminated string", line_no, column));
    }
    Ok(None)
}

/// Split a delimited payload into trimmed tokens, ignoring delimiters
/// inside quoted segments. Empty tokens are preserved.
fn split_delimited<'c>(
    input: &'c str,
    delimiter: char,
    line_no: usize,
    column: usize,
) -> ToonResult<TokenBuf<'c>> {
    let mut tokens = TokenBuf::new();
    let bytes = input.as_bytes();
    let delim_byte = delimiter as u8;

    if memchr(b'"', bytes).is_none() && memchr(b'\\', bytes).is_none() {
        let mut start = 0;
        for idx in memchr_iter(delim_byte, bytes) {
            tokens.push(trim_ascii(&input[start..idx]));
            start = idx + 1;
        }
        tokens.push(trim_ascii(&input[start..]));
        return Ok(tokens);
    }

    let mut in_quotes = false;
    let mut escape = false;
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        if escape {
            escape = false;
            idx += 1;
            continue;
        }
        if in_quotes {
            match memchr2(b'\\', b'"', &bytes[idx..]) {
                Some(offset) => {
                    let pos = idx + offset;
                    if bytes[pos] == b'\\' {
                        escape = true;
                    } else {
                        in_quotes = false;
                    }
                    idx = pos + 1;
                }
                None => idx = bytes.len(),
            }
            continue;
        }
        match memchr2(delim_byte, b'"', &bytes[idx..]) {
            Some(offset) => {
                let pos = idx + offset;
                if bytes[pos] == b'"' {
                    in_quotes = true;
                    idx = pos + 1;
                    continue;
                }
                tokens.push(trim_ascii(&input[start..pos]));
                start = pos + 1;
                idx = start;
            }
            None => break,
        }
    }
    if in_quotes {
        return Err(ToonError::syntax("Unterminated string", line_no, column));
    }
    tokens.push(trim_ascii(&input[start..]));
    Ok(tokens)
}

/// A tabular row has no unquoted colon before its first unquoted
/// delimiter; a `key:` line does, and terminates the row block.
fn looks_like_row(content: &str, delimiter: char) -> bool {
    let bytes = content.as_bytes();
    let delim_byte = delimiter as u8;
    let mut in_quotes = false;
    let mut escape = false;
    for &byte in bytes {
        if escape {
            escape = false;
            continue;
        }
        if in_quotes {
            match byte {
                b'\\' => escape = true,
                b'"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        if byte == b'"' {
            in_quotes = true;
            continue;
        }
        if byte == delim_byte {
            return true;
        }
        if byte == b':' {
            return false;
        }
    }
    true
}

fn trim_ascii(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut start = 0;
    let mut end = bytes.len();
    while start < end && matches!(bytes[start], b' ' | b'\t') {
        start += 1;
    }
    while end > start && matches!(bytes[end - 1], b' ' | b'\t') {
        end -= 1;
    }
    &s[start..end]
}

fn parse_number_token(token: &str) -> Option<Number> {
    if has_forbidden_leading_zeros(token) {
        return None;
    }
    let bytes = token.as_bytes();
    let mut idx = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        idx = 1;
    }
    if idx >= bytes.len() || !bytes[idx].is_ascii_digit() {
        return None;
    }

    let mut has_dot = false;
    let mut has_exp = false;
    let mut prev = b'0';
    for &byte in &bytes[idx..] {
        match byte {
            b'0'..=b'9' => {}
            b'.' => {
                if has_dot || has_exp {
                    return None;
                }
                has_dot = true;
            }
            b'e' | b'E' => {
                if has_exp {
                    return None;
                }
                has_exp = true;
            }
            b'+' | b'-' => {
                if !matches!(prev, b'e' | b'E') {
                    return None;
                }
            }
            _ => return None,
        }
        prev = byte;
    }
    if !prev.is_ascii_digit() && prev != b'.' {
        return None;
    }

    if !has_dot && !has_exp {
        if negative {
            if let Ok(i) = token.parse::<i64>() {
                return Some(Number::NegInt(i));
            }
        } else if let Ok(u) = token.parse::<u64>() {
            return Some(Number::PosInt(u));
        }
    }
    token.parse::<f64>().ok().map(Number::Float)
}

/// Unescape a quoted string token. The closing quote is mandatory and
/// nothing may follow it.
fn parse_quoted(token: &str, line_no: usize, column: usize) -> ToonResult<String> {
    if token.len() < 2 || !token.ends_with('"') {
        return Err(ToonError::syntax("Unterminated string", line_no, column));
    }
    let inner = &token[1..token.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '"' {
            return Err(ToonError::syntax(
                "Unexpected quote inside string",
                line_no,
                column,
            ));
        }
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let escaped = chars
            .next()
            .ok_or_else(|| ToonError::syntax("Unterminated escape", line_no, column))?;
        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let unit = read_hex4(&mut chars, line_no, column)?;
                if (0xD800..0xDC00).contains(&unit) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(ToonError::syntax(
                            "Unpaired surrogate escape",
                            line_no,
                            column,
                        ));
                    }
                    let low = read_hex4(&mut chars, line_no, column)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(ToonError::syntax(
                            "Unpaired surrogate escape",
                            line_no,
                            column,
                        ));
                    }
                    let code =
                        0x10000 + ((unit - 0xD800) as u32) * 0x400 + (low - 0xDC00) as u32;
                    let ch = char::from_u32(code).ok_or_else(|| {
                        ToonError::syntax("Invalid unicode escape", line_no, column)
                    })?;
                    out.push(ch);
                } else {
                    let ch = char::from_u32(unit as u32).ok_or_else(|| {
                        ToonError::syntax("Invalid unicode escape", line_no, column)
                    })?;
                    out.push(ch);
                }
            }
            _ => {
                return Err(ToonError::syntax(
                    format!("Invalid escape '\\{escaped}'"),
                    line_no,
                    column,
                ));
            }
        }
    }
    Ok(out)
}

fn read_hex4(
    chars: &mut std::str::Chars<'_>,
    line_no: usize,
    column: usize,
) -> ToonResult<u16> {
    let mut code: u16 = 0;
    for _ in 0..4 {
        let ch = chars
            .next()
            .ok_or_else(|| ToonError::syntax("Invalid unicode escape", line_no, column))?;
        let digit = ch
            .to_digit(16)
            .ok_or_else(|| ToonError::syntax("Invalid unicode escape", line_no, column))?;
        code = (code << 4) | digit as u16;
    }
    Ok(code)
}
