/// Convenience result type used across Cadre.
pub type CadreResult<T> = Result<T, CadreError>;

/// Top-level error taxonomy used by the editing core.
///
/// Only genuinely recoverable runtime conditions are represented here
/// (resource exhaustion and data-dependent raster failures). Caller-contract
/// breaches such as journal misuse, invalid indices, or the wrong layer
/// variant are programming errors and panic instead of returning a value.
#[derive(thiserror::Error, Debug)]
pub enum CadreError {
    /// Invalid user-provided document data (e.g. a zero-sized canvas).
    #[error("validation error: {0}")]
    Validation(String),

    /// A pixel surface could not be allocated (zero or overflowing dimensions,
    /// or exhaustion reported by the allocator).
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Invalid data fed to a raster operation (e.g. a mode conversion with an
    /// unusable palette).
    #[error("raster error: {0}")]
    Raster(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CadreError {
    /// Build a [`CadreError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CadreError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`CadreError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }
}
