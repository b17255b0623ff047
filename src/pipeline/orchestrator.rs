use std::path::{Path, PathBuf};

use rand::{SeedableRng as _, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    audio::tone::encode_tone,
    catalog::model::{Catalog, MediaRequest},
    codec::bmp::{encode_bmp, encode_bmp_solid},
    config::SynthConfig,
    foundation::core::{MediaKind, Rgb8},
    foundation::error::{MediaError, MediaResult},
    palette::registry::{ColorPalette, PaletteRegistry},
    pipeline::publish::{PublishOutcome, STALE_TEMP_AGE, publish_new, sweep_stale_temps},
    render::backend::{RenderInput, RichRenderer, detect_renderer},
};

/// Where each kind of asset lands under the output root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    images_dir: PathBuf,
    voice_dir: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root` using the directory names from `config`.
    pub fn new(root: impl Into<PathBuf>, config: &SynthConfig) -> Self {
        let root = root.into();
        Self {
            images_dir: root.join(&config.images_dir),
            voice_dir: root.join(&config.voice_dir),
            root,
        }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding assets of `kind`.
    pub fn dir_for(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Image => &self.images_dir,
            MediaKind::Voice => &self.voice_dir,
        }
    }

    /// `<dir>/<id>.<ext>` for a request.
    pub fn path_for(&self, kind: MediaKind, id: &str) -> PathBuf {
        self.dir_for(kind).join(format!("{id}.{}", kind.extension()))
    }

    fn ensure_dirs(&self) -> MediaResult<()> {
        for dir in [&self.images_dir, &self.voice_dir] {
            std::fs::create_dir_all(dir).map_err(|e| MediaError::io(dir.as_path(), e))?;
            sweep_stale_temps(dir, STALE_TEMP_AGE)?;
        }
        Ok(())
    }
}

/// Which encoder produced a created asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// Composed by the rich renderer.
    Rich,
    /// Solid-color bitmap fallback.
    RawBitmap,
    /// Synthesized tone.
    Tone,
}

/// Terminal state of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationResult {
    /// A new file was written.
    Created {
        /// Encoder used.
        tier: Tier,
    },
    /// A file already occupied the output path and was left untouched.
    Skipped,
    /// Synthesis or the write failed; nothing was published.
    Failed {
        /// Error kind, as reported by [`MediaError::kind_name`].
        kind: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

impl GenerationResult {
    fn failed(err: &MediaError) -> Self {
        Self::Failed {
            kind: err.kind_name(),
            reason: err.to_string(),
        }
    }

    /// Whether this is [`GenerationResult::Created`].
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Whether this is [`GenerationResult::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one request, in catalog order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Chat the request belongs to.
    pub chat_id: String,
    /// Request id.
    pub id: String,
    /// Requested container.
    pub kind: MediaKind,
    /// Output path.
    pub path: PathBuf,
    /// What happened.
    pub result: GenerationResult,
}

/// Created / skipped / failed counts for one kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    /// New files written.
    pub created: usize,
    /// Existing files left alone.
    pub skipped: usize,
    /// Requests that produced nothing.
    pub failed: usize,
}

impl KindCounts {
    /// Sum of all three states.
    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }

    fn record(&mut self, result: &GenerationResult) {
        match result {
            GenerationResult::Created { .. } => self.created += 1,
            GenerationResult::Skipped => self.skipped += 1,
            GenerationResult::Failed { .. } => self.failed += 1,
        }
    }
}

/// Aggregate report for one [`Orchestrator::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Image counts.
    pub images: KindCounts,
    /// Voice counts.
    pub voice: KindCounts,
    /// Per-request outcomes in catalog order.
    pub outcomes: Vec<RequestOutcome>,
}

impl RunSummary {
    fn from_outcomes(outcomes: Vec<RequestOutcome>) -> Self {
        let mut images = KindCounts::default();
        let mut voice = KindCounts::default();
        for o in &outcomes {
            match o.kind {
                MediaKind::Image => images.record(&o.result),
                MediaKind::Voice => voice.record(&o.result),
            }
        }
        Self {
            images,
            voice,
            outcomes,
        }
    }

    /// Counts for `kind`.
    pub fn counts(&self, kind: MediaKind) -> KindCounts {
        match kind {
            MediaKind::Image => self.images,
            MediaKind::Voice => self.voice,
        }
    }

    /// Number of requests processed; equals the catalog size.
    pub fn total(&self) -> usize {
        self.images.total() + self.voice.total()
    }

    /// Whether any request ended in `Failed`.
    pub fn has_failures(&self) -> bool {
        self.images.failed + self.voice.failed > 0
    }

    /// Failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = &RequestOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_failed())
    }
}

/// Drives a catalog through the renderers and encoders into the output layout.
pub struct Orchestrator {
    config: SynthConfig,
    palettes: PaletteRegistry,
    renderer: Option<Box<dyn RichRenderer>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("renderer", &self.renderer.as_ref().map(|r| r.name()))
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Orchestrator without a rich renderer; images use the raw bitmap tier.
    pub fn new(config: SynthConfig, palettes: PaletteRegistry) -> Self {
        Self {
            config,
            palettes,
            renderer: None,
        }
    }

    /// Orchestrator with the rich renderer resolved from `config.renderer`.
    pub fn with_detected_renderer(config: SynthConfig, palettes: PaletteRegistry) -> Self {
        let renderer = detect_renderer(config.renderer, config.rich_size);
        Self::new(config, palettes).with_renderer(renderer)
    }

    /// Replace the rich renderer capability.
    pub fn with_renderer(mut self, renderer: Option<Box<dyn RichRenderer>>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Name of the rich renderer, if one is present.
    pub fn renderer_name(&self) -> Option<&'static str> {
        self.renderer.as_ref().map(|r| r.name())
    }

    /// Synthesize every request of `catalog` under `out_root`.
    ///
    /// Structural problems (invalid config, unsafe or duplicate ids, unusable output directories)
    /// are returned as errors before any asset is written. Per-request failures are recorded in
    /// the summary and never stop the run.
    #[tracing::instrument(skip_all, fields(requests = catalog.len(), out = %out_root.display()))]
    pub fn run(&self, catalog: &Catalog, out_root: &Path) -> MediaResult<RunSummary> {
        self.config.validate()?;
        catalog.validate()?;

        let layout = OutputLayout::new(out_root, &self.config);
        layout.ensure_dirs()?;

        let requests: Vec<(&str, &MediaRequest)> = catalog.requests().collect();
        let outcomes = if self.config.run.parallel {
            let pool = build_thread_pool(self.config.run.threads)?;
            pool.install(|| {
                requests
                    .par_iter()
                    .map(|(chat_id, req)| self.process(&layout, chat_id, req))
                    .collect::<Vec<_>>()
            })
        } else {
            requests
                .iter()
                .map(|(chat_id, req)| self.process(&layout, chat_id, req))
                .collect()
        };

        let summary = RunSummary::from_outcomes(outcomes);
        tracing::info!(
            images_created = summary.images.created,
            images_skipped = summary.images.skipped,
            images_failed = summary.images.failed,
            voice_created = summary.voice.created,
            voice_skipped = summary.voice.skipped,
            voice_failed = summary.voice.failed,
            "run complete"
        );
        Ok(summary)
    }

    fn process(&self, layout: &OutputLayout, chat_id: &str, req: &MediaRequest) -> RequestOutcome {
        let path = layout.path_for(req.kind, &req.id);
        let result = if path.exists() {
            GenerationResult::Skipped
        } else {
            match self.synthesize(req) {
                Ok((bytes, tier)) => match publish_new(&path, &bytes) {
                    Ok(PublishOutcome::Created) => GenerationResult::Created { tier },
                    Ok(PublishOutcome::AlreadyExists) => GenerationResult::Skipped,
                    Err(err) => GenerationResult::failed(&err),
                },
                Err(err) => GenerationResult::failed(&err),
            }
        };

        match &result {
            GenerationResult::Failed { reason, .. } => {
                tracing::warn!(id = %req.id, chat = chat_id, %reason, "request failed");
            }
            other => {
                tracing::debug!(id = %req.id, chat = chat_id, result = ?other, "request done");
            }
        }

        RequestOutcome {
            chat_id: chat_id.to_string(),
            id: req.id.clone(),
            kind: req.kind,
            path,
            result,
        }
    }

    fn synthesize(&self, req: &MediaRequest) -> MediaResult<(Vec<u8>, Tier)> {
        match req.kind {
            MediaKind::Image => self.synthesize_image(req),
            MediaKind::Voice => {
                let secs = req.duration_seconds.ok_or_else(|| {
                    MediaError::invalid_duration(format!(
                        "voice request '{}' has no duration",
                        req.id
                    ))
                })?;
                Ok((encode_tone(secs, &self.config.tone)?, Tier::Tone))
            }
        }
    }

    fn synthesize_image(&self, req: &MediaRequest) -> MediaResult<(Vec<u8>, Tier)> {
        let palette = self.palettes.lookup(&req.category);
        let color = self.pick_color(&req.id, palette);

        if let Some(renderer) = &self.renderer {
            let input = RenderInput {
                request: req,
                palette,
                background: color,
                icon: self.palettes.icon(&req.category),
            };
            if let Some(img) = renderer.try_render(&input) {
                return Ok((encode_bmp(&img)?, Tier::Rich));
            }
        }

        let size = self.config.fallback_size;
        Ok((encode_bmp_solid(size.width, size.height, color)?, Tier::RawBitmap))
    }

    fn pick_color(&self, id: &str, palette: &ColorPalette) -> Rgb8 {
        match self.config.seed {
            Some(seed) => {
                let id_hash = xxhash_rust::xxh3::xxh3_64(id.as_bytes());
                palette.pick(&mut StdRng::seed_from_u64(seed ^ id_hash))
            }
            None => palette.pick(&mut rand::rng()),
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> MediaResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(MediaError::validation("run.threads must be > 0 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(pool_build_error)
}

fn pool_build_error<E>(err: E) -> MediaError
where
    E: std::error::Error + Send + Sync + 'static,
{
    MediaError::from(anyhow::Error::new(err).context("failed to build rayon thread pool"))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
