//! Category palettes and icon glyphs.

/// Palette table and hex parsing.
pub mod registry;
