//! Optional rich image rendering.

/// Renderer capability trait and detection.
pub mod backend;
/// SVG scene composition rasterized with resvg.
#[cfg(feature = "rich")]
pub mod svg;
/// Description wrapping and text measurement.
pub mod text;
