/// Error type returned by action handlers.
///
/// Boxed so handlers can `?` any error they run into.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The handler for `action` rejected the transition. Nothing was
    /// committed and no subscriber was notified.
    #[error("action `{action}` failed: {source}")]
    Handler {
        action: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    /// Name of the action whose dispatch failed.
    pub fn action(&self) -> &str {
        match self {
            StoreError::Handler { action, .. } => action,
        }
    }
}
