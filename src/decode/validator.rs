use crate::error::{ToonError, ToonResult};

/// A structural mismatch observed in lenient mode. Strict mode never
/// produces these; it raises instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Pure policy layer for structural checkpoints: declared-vs-actual
/// counts, duplicate keys, indentation multiples. In strict mode every
/// violation raises immediately with its source position; in lenient
/// mode it is recorded and the decoder continues with the observed data.
#[derive(Debug)]
pub struct Validator {
    strict: bool,
    warnings: Vec<ValidationWarning>,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            warnings: Vec::new(),
        }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        self.warnings
    }

    fn report(&mut self, message: String, line: usize, column: usize) -> ToonResult<()> {
        if self.strict {
            return Err(ToonError::Validation {
                message,
                line,
                column,
            });
        }
        self.warnings.push(ValidationWarning {
            message,
            line,
            column,
        });
        Ok(())
    }

    pub fn validate_array_length(
        &mut self,
        declared: usize,
        actual: usize,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        if declared == actual {
            return Ok(());
        }
        self.report(
            format!("Array declares {declared} items but found {actual}"),
            line,
            column,
        )
    }

    pub fn validate_row_count(
        &mut self,
        declared: usize,
        actual: usize,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        if declared == actual {
            return Ok(());
        }
        self.report(
            format!("Array declares {declared} rows but found {actual}"),
            line,
            column,
        )
    }

    pub fn validate_field_count(
        &mut self,
        expected: usize,
        actual: usize,
        row: usize,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        if expected == actual {
            return Ok(());
        }
        self.report(
            format!("Row has {actual} values but expected {expected} fields in row {row}"),
            line,
            column,
        )
    }

    pub fn validate_duplicate_key(
        &mut self,
        key: &str,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        self.report(format!("Duplicate key '{key}'"), line, column)
    }

    pub fn validate_indent_consistency(
        &mut self,
        indent: usize,
        indent_size: usize,
        line: usize,
        column: usize,
    ) -> ToonResult<()> {
        if indent % indent_size == 0 {
            return Ok(());
        }
        self.report(
            format!("Inconsistent indentation: {indent} is not a multiple of {indent_size}"),
            line,
            column,
        )
    }
}
