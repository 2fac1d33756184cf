pub(crate) mod expand;
pub(crate) mod parser;
pub mod scanner;
pub mod validator;

use crate::error::ToonResult;
use crate::handlers::TypeHandlerRegistry;
use crate::options::DecodeOptions;
use crate::value::Value;

use parser::Parser;
use validator::{ValidationWarning, Validator};

/// Decode TOON text to a [`Value`].
///
/// # Examples
/// ```
/// use toon_codec::{decode_to_value, DecodeOptions, Value};
///
/// let value = decode_to_value("[3]: 1,2,3", &DecodeOptions::default())?;
/// assert_eq!(serde_json::Value::from(value), serde_json::json!([1, 2, 3]));
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn decode_to_value(input: &str, options: &DecodeOptions) -> ToonResult<Value> {
    let (value, _) = decode_impl(input, options, None)?;
    Ok(value)
}

/// Decode TOON text, surfacing the validation warnings accumulated in
/// lenient mode. Strict decodes return an empty warning list; every
/// substitution of observed-for-declared structure in lenient mode
/// appears here, so nothing is lost silently.
///
/// # Examples
/// ```
/// use toon_codec::{decode_with_warnings, DecodeOptions};
///
/// let options = DecodeOptions::new().with_strict(false);
/// let (value, warnings) = decode_with_warnings("[3]: 1,2", &options)?;
/// assert_eq!(value.as_array().unwrap().len(), 2);
/// assert_eq!(warnings.len(), 1);
/// assert!(warnings[0].message.contains("declares 3 items but found 2"));
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn decode_with_warnings(
    input: &str,
    options: &DecodeOptions,
) -> ToonResult<(Value, Vec<ValidationWarning>)> {
    decode_impl(input, options, None)
}

/// Decode with a type-handler registry consulted for unquoted tokens
/// that fail primitive parsing (first matching handler wins).
pub fn decode_to_value_with_handlers(
    input: &str,
    options: &DecodeOptions,
    handlers: &TypeHandlerRegistry,
) -> ToonResult<Value> {
    let (value, _) = decode_impl(input, options, Some(handlers))?;
    Ok(value)
}

fn decode_impl(
    input: &str,
    options: &DecodeOptions,
    handlers: Option<&TypeHandlerRegistry>,
) -> ToonResult<(Value, Vec<ValidationWarning>)> {
    options.validate()?;
    let mut validator = Validator::new(options.strict);
    let scan = scanner::scan_lines(input, options.indent.get_spaces(), &mut validator)?;
    let mut parser = Parser::new(&scan.lines, validator, options, handlers);
    let value = parser.parse_document()?;
    Ok((value, parser.into_warnings()))
}
