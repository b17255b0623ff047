//! In-memory images.

/// Owned RGB pixel buffers.
pub mod artifact;
