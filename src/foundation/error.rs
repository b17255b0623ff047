use std::path::PathBuf;

/// Convenience result type used across mediaseed.
pub type MediaResult<T> = Result<T, MediaError>;

/// Top-level error taxonomy used by synthesis APIs.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// Raster dimensions were zero or do not fit the bitmap container.
    #[error("invalid dimensions: {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u64,
        /// Requested height in pixels.
        height: u64,
        /// Which constraint was violated.
        reason: String,
    },

    /// A color component or color literal could not be represented as RGB8.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Voice duration missing or not a positive whole number of seconds.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Two catalog entries resolve to the same output file.
    #[error("duplicate request id '{0}'")]
    DuplicateRequestId(String),

    /// Creating a directory or writing an output file failed.
    #[error("io failure at '{}': {source}", path.display())]
    IoFailure {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid user-provided catalog, palette or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rich renderer could not produce an image.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    /// Build a [`MediaError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: u64, height: u64, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Build a [`MediaError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`MediaError::InvalidDuration`] value.
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    /// Build a [`MediaError::IoFailure`] value.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Build a [`MediaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MediaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MediaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short machine-friendly name of the error kind, used in run summaries.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "InvalidDimensions",
            Self::InvalidColor(_) => "InvalidColor",
            Self::InvalidDuration(_) => "InvalidDuration",
            Self::DuplicateRequestId(_) => "DuplicateRequestId",
            Self::IoFailure { .. } => "IoFailure",
            Self::Validation(_) => "Validation",
            Self::Render(_) => "Render",
            Self::Serde(_) => "Serde",
            Self::Other(_) => "Other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
