use thiserror::Error;

/// Boxed error handed back by external collaborators such as the show
/// registry.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during mihari core operations.
///
/// Unparsable filenames are not errors; they surface as `Ok(None)` from
/// the parser and land in the unparseable cache.
#[derive(Debug, Error)]
pub enum MihariError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The external show-lookup capability failed.
    ///
    /// A collaborator defect, not an unparsable filename: it propagates to
    /// the caller and the filename is not cached.
    #[error("show lookup failed: {0}")]
    ShowLookup(BoxError),
}

/// Result type alias for mihari operations.
pub type Result<T> = std::result::Result<T, MihariError>;
