//! Voice placeholder synthesis.

/// Faded sine tone synthesis.
pub mod tone;
