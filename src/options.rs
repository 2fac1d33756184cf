use crate::constants::{DEFAULT_INDENT, MAX_DEPTH, MAX_INDENT, MIN_INDENT};
use crate::error::{ToonError, ToonResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub fn get_spaces(self) -> usize {
        let Indent::Spaces(count) = self;
        count
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(DEFAULT_INDENT)
    }
}

/// Key folding mode for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFolding {
    #[default]
    Off,
    /// Collapse single-key wrapper chains into dotted keys, skipping any
    /// segment that is not a safe identifier.
    Safe,
}

/// Path expansion mode for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandPaths {
    #[default]
    Off,
    /// Expand unquoted dotted keys whose segments are all identifiers
    /// into nested objects.
    Safe,
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub indent: Indent,
    pub delimiter: Delimiter,
    pub key_folding: KeyFolding,
    /// Escape non-ASCII characters as `\uXXXX` (forces quoting).
    pub ensure_ascii: bool,
    /// Sort object keys by code point. Tabular field lists are always
    /// sorted, independent of this flag.
    pub sort_keys: bool,
    pub max_depth: usize,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    pub fn with_ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn validate(&self) -> ToonResult<()> {
        let spaces = self.indent.get_spaces();
        if !(MIN_INDENT..=MAX_INDENT).contains(&spaces) {
            return Err(ToonError::InvalidOptions(format!(
                "indent must be between {MIN_INDENT} and {MAX_INDENT}, got {spaces}"
            )));
        }
        Ok(())
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            delimiter: Delimiter::default(),
            key_folding: KeyFolding::default(),
            ensure_ascii: false,
            sort_keys: false,
            max_depth: MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub indent: Indent,
    pub strict: bool,
    pub expand_paths: ExpandPaths,
    pub max_depth: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_expand_paths(mut self, expand_paths: ExpandPaths) -> Self {
        self.expand_paths = expand_paths;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn validate(&self) -> ToonResult<()> {
        let spaces = self.indent.get_spaces();
        if !(MIN_INDENT..=MAX_INDENT).contains(&spaces) {
            return Err(ToonError::InvalidOptions(format!(
                "indent must be between {MIN_INDENT} and {MAX_INDENT}, got {spaces}"
            )));
        }
        Ok(())
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            strict: true,
            expand_paths: ExpandPaths::default(),
            max_depth: MAX_DEPTH,
        }
    }
}
