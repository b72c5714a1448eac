use alloc::string::String;

/// Result type alias for strategy operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by the strategy surface.
///
/// The resolver pipeline itself is total over its input domain (any integer
/// position, any viewport size, any well-formed tree); only the id-based
/// lookups and the flat mutation extension can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No item with the given original id exists in the source.
    #[error("item not found: {id}")]
    NotFound { id: String },
    /// A composite string did not parse as `"<id>__<index>"`.
    #[error("malformed composite key: {composite}")]
    MalformedKey { composite: String },
}
