//! Catalog-driven generation.

/// Request scheduling, skip-if-exists and run summaries.
pub mod orchestrator;
/// Temp-file plus no-replace publication.
pub mod publish;
