//! Core types shared by every module.

/// Shared value types.
pub mod core;
/// Crate error type.
pub mod error;
