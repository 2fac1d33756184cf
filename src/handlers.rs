//! Pluggable type handlers: an ordered strategy list consulted by the
//! decoder for unquoted tokens that fail primitive parsing. The first
//! handler whose predicate matches wins; the codec treats whatever it
//! returns as an ordinary [`Value`] from then on.
//!
//! The encode direction belongs to the typed/graph collaborators: the
//! owned `Value` model is closed, so there is no in-band value the base
//! formatter cannot represent.

use crate::value::Value;

/// One decode strategy: a match predicate plus a token decoder.
pub trait TypeHandler {
    /// Short diagnostic name, e.g. `"iso-date"`.
    fn name(&self) -> &str;

    /// Whether this handler claims the token.
    fn matches(&self, token: &str) -> bool;

    /// Decode a claimed token. Returning `None` passes the token to the
    /// next handler in priority order.
    fn decode(&self, token: &str) -> Option<Value>;
}

/// Ordered first-match dispatch over registered handlers.
#[derive(Default)]
pub struct TypeHandlerRegistry {
    handlers: Vec<Box<dyn TypeHandler>>,
}

impl TypeHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler at the lowest priority.
    pub fn register(&mut self, handler: Box<dyn TypeHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// First handler that both claims and successfully decodes the
    /// token wins; `None` falls back to the plain-string reading.
    pub fn decode_token(&self, token: &str) -> Option<Value> {
        self.handlers
            .iter()
            .filter(|handler| handler.matches(token))
            .find_map(|handler| handler.decode(token))
    }
}

impl std::fmt::Debug for TypeHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("TypeHandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}
