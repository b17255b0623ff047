//! Dependency-free container encoders.
//!
//! Both encoders write little-endian headers by hand so the fallback tier never depends on the
//! optional rendering stack.

/// 24-bit uncompressed Windows bitmap.
pub mod bmp;
/// 16-bit PCM mono RIFF/WAVE.
pub mod wav;
