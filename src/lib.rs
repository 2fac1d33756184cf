//! TOON is a line-oriented, indentation-sensitive text format that
//! round-trips the JSON data model while minimizing token count for
//! language-model consumption. This crate implements the bidirectional
//! codec: the array-header grammar with tabular, inline, and list
//! encodings, the quoting rules shared by string values and object
//! keys, and a strict/lenient decoder that reconstructs values from
//! scanned indentation.
//!
//! ```
//! use toon_codec::{decode_to_value, encode_default, DecodeOptions, Value};
//! use serde_json::json;
//!
//! let users = json!({
//!     "users": [
//!         {"id": 1, "name": "Alice"},
//!         {"id": 2, "name": "Bob"}
//!     ]
//! });
//! let toon = encode_default(&users)?;
//! assert_eq!(toon, "users[2]{id,name}:\n  1,Alice\n  2,Bob");
//!
//! let back = decode_to_value(&toon, &DecodeOptions::default())?;
//! assert_eq!(serde_json::Value::from(back), users);
//! # Ok::<(), toon_codec::ToonError>(())
//! ```

pub mod constants;
pub mod decision;
pub mod decode;
pub mod encode;
pub mod error;
pub mod handlers;
pub mod options;
mod ser;
pub mod value;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::decode::validator::ValidationWarning;
pub use crate::decode::{decode_to_value, decode_to_value_with_handlers, decode_with_warnings};
pub use crate::encode::encode_value;
pub use crate::encode::quoting::{is_safe_identifier, needs_quoting, quote_string};
pub use crate::error::{ToonError, ToonResult};
pub use crate::handlers::{TypeHandler, TypeHandlerRegistry};
pub use crate::options::{
    DecodeOptions, Delimiter, EncodeOptions, ExpandPaths, Indent, KeyFolding,
};
pub use crate::value::{Number, Value};

/// Encode any serializable value to TOON.
///
/// # Examples
/// ```
/// use serde::Serialize;
/// use toon_codec::{encode, EncodeOptions};
///
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// let user = User {
///     name: "Alice".to_string(),
///     age: 30,
/// };
/// let toon = encode(&user, &EncodeOptions::default())?;
/// assert_eq!(toon, "name: Alice\nage: 30");
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn encode<T: Serialize>(value: &T, options: &EncodeOptions) -> ToonResult<String> {
    let value = ser::to_value(value)?;
    encode_value(&value, options)
}

/// Encode with default options (2-space indent, comma delimiter).
///
/// # Examples
/// ```
/// use toon_codec::encode_default;
/// use serde_json::json;
///
/// let data = json!({"tags": ["reading", "gaming", "coding"]});
/// assert_eq!(encode_default(&data)?, "tags[3]: reading,gaming,coding");
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn encode_default<T: Serialize>(value: &T) -> ToonResult<String> {
    encode(value, &EncodeOptions::default())
}

/// Decode TOON text into any deserializable type.
///
/// Empty or whitespace-only input decodes to an empty object.
///
/// # Examples
/// ```
/// use serde::Deserialize;
/// use toon_codec::{decode, DecodeOptions};
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// let user: User = decode("name: Alice\nage: 30", &DecodeOptions::default())?;
/// assert_eq!(user, User { name: "Alice".to_string(), age: 30 });
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn decode<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> ToonResult<T> {
    let value = decode_to_value(input, options)?;
    serde_json::from_value(serde_json::Value::from(value))
        .map_err(|err| ToonError::Deserialize(err.to_string()))
}

/// Decode with default options (strict mode on).
///
/// # Examples
/// ```
/// use toon_codec::decode_default;
///
/// let value: serde_json::Value = decode_default("[3]: 1,2,3")?;
/// assert_eq!(value, serde_json::json!([1, 2, 3]));
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn decode_default<T: DeserializeOwned>(input: &str) -> ToonResult<T> {
    decode(input, &DecodeOptions::default())
}
