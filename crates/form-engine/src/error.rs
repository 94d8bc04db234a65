use form_spec::ValidationError;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// `FormNotFound`/`OwnerNotFound` map to a client-visible 404,
/// `Validation` and `InvalidForm` to a 400, the rest to a 500. Failed
/// submissions are never retried here; the caller resubmits from
/// scratch, which may create a duplicate external record.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("form '{0}' not found")]
    FormNotFound(String),
    #[error("owner '{0}' has no stored credentials")]
    OwnerNotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("external write failed: {0}")]
    UpstreamWrite(String),
    #[error("storage error: {0}")]
    Store(String),
    #[error("invalid form definition: {0}")]
    InvalidForm(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
