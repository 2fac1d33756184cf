use memchr::memchr_iter;

use crate::decode::validator::Validator;
use crate::error::{ToonError, ToonResult};

/// One non-blank source line: raw text, leading indentation width,
/// de-indented content, computed depth, 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub raw: &'a str,
    pub indent: usize,
    pub content: &'a str,
    pub depth: usize,
    pub line_number: usize,
}

/// Position of a blank (or whitespace-only) line, kept out of the main
/// line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankLine {
    pub line_number: usize,
    pub indent: usize,
    pub depth: usize,
}

#[derive(Debug)]
pub struct ScanResult<'a> {
    pub lines: Vec<ParsedLine<'a>>,
    pub blank_lines: Vec<BlankLine>,
}

/// Reduce source text to parsed lines plus a blank-line side list.
///
/// Depth is `indent / indent_size`; indentation that is not an exact
/// multiple is a validator checkpoint (fatal in strict mode, floored
/// with a warning in lenient mode). Tabs in indentation are a syntax
/// error in strict mode and count as one indent unit otherwise.
pub fn scan_lines<'a>(
    input: &'a str,
    indent_size: usize,
    validator: &mut Validator,
) -> ToonResult<ScanResult<'a>> {
    let mut result = ScanResult {
        lines: Vec::new(),
        blank_lines: Vec::new(),
    };
    if input.is_empty() {
        return Ok(result);
    }

    let bytes = input.as_bytes();
    let mut start = 0;
    let mut line_number = 0;
    for idx in memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len())) {
        if idx == bytes.len() && start >= bytes.len() {
            break;
        }
        line_number += 1;
        let mut end = idx;
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        scan_line(
            &input[start..end],
            line_number,
            indent_size,
            validator,
            &mut result,
        )?;
        start = idx + 1;
    }

    Ok(result)
}

fn scan_line<'a>(
    raw: &'a str,
    line_number: usize,
    indent_size: usize,
    validator: &mut Validator,
    result: &mut ScanResult<'a>,
) -> ToonResult<()> {
    let mut indent = 0usize;
    let mut consumed = 0usize;
    for &byte in raw.as_bytes() {
        match byte {
            b' ' => {
                indent += 1;
                consumed += 1;
            }
            b'\t' => {
                if validator.strict() {
                    return Err(ToonError::syntax(
                        "Tab character in indentation",
                        line_number,
                        consumed + 1,
                    ));
                }
                indent += indent_size;
                consumed += 1;
            }
            _ => break,
        }
    }

    let content = raw[consumed..].trim_end();
    if content.is_empty() {
        result.blank_lines.push(BlankLine {
            line_number,
            indent,
            depth: indent / indent_size,
        });
        return Ok(());
    }

    if indent % indent_size != 0 {
        validator.validate_indent_consistency(indent, indent_size, line_number, 1)?;
    }

    result.lines.push(ParsedLine {
        raw,
        indent,
        content,
        depth: indent / indent_size,
        line_number,
    });
    Ok(())
}

/// Read-only cursor over scanned lines with peek/advance and depth-aware
/// peeking for dedent detection.
#[derive(Debug)]
pub struct LineCursor<'s, 'a> {
    lines: &'s [ParsedLine<'a>],
    position: usize,
}

impl<'s, 'a> LineCursor<'s, 'a> {
    pub fn new(lines: &'s [ParsedLine<'a>]) -> Self {
        Self { lines, position: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.lines.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn peek(&self) -> Option<&ParsedLine<'a>> {
        self.lines.get(self.position)
    }

    /// Current line only when it sits at `depth`; `None` signals a
    /// dedent boundary without consuming anything.
    pub fn peek_at_depth(&self, depth: usize) -> Option<&ParsedLine<'a>> {
        self.peek().filter(|line| line.depth == depth)
    }

    pub fn next(&mut self) -> Option<&ParsedLine<'a>> {
        let line = self.lines.get(self.position);
        if line.is_some() {
            self.position += 1;
        }
        line
    }

    pub fn advance(&mut self) {
        if self.position < self.lines.len() {
            self.position += 1;
        }
    }
}
