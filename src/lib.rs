//! Mediaseed synthesizes placeholder images and voice notes for demo chat catalogs.
//!
//! A [`Catalog`] lists media requests grouped by chat. The [`Orchestrator`] walks it in order and
//! writes one file per request:
//!
//! - images as 24-bit BMP, composed by an optional [`RichRenderer`] or filled with a palette color
//! - voice notes as 16-bit PCM WAV holding a faded 440 Hz tone
//!
//! Existing files are never touched, so re-running over the same output directory is a no-op.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod audio;
pub mod catalog;
pub mod codec;
/// Synthesis configuration and `MEDIASEED_*` overrides.
pub mod config;
pub mod foundation;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod render;

pub use crate::audio::tone::{AudioArtifact, ToneParams, encode_tone, synthesize_tone};
pub use crate::catalog::model::{Catalog, ChatMedia, MediaRequest};
pub use crate::codec::bmp::{encode_bmp, encode_bmp_solid};
pub use crate::codec::wav::encode_wav_pcm16_mono;
pub use crate::config::{RunOpts, SynthConfig};
pub use crate::foundation::core::{MediaKind, Rgb8, Size2};
pub use crate::foundation::error::{MediaError, MediaResult};
pub use crate::palette::registry::{ColorPalette, PaletteRegistry};
pub use crate::pipeline::orchestrator::{
    GenerationResult, KindCounts, Orchestrator, OutputLayout, RequestOutcome, RunSummary, Tier,
};
pub use crate::raster::artifact::ImageArtifact;
pub use crate::render::backend::{RenderInput, RendererChoice, RichRenderer, detect_renderer};
#[cfg(feature = "rich")]
pub use crate::render::svg::SvgRenderer;
