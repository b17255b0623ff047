use std::path::{Component, Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    audio::tone::ToneParams,
    foundation::core::Size2,
    foundation::error::{MediaError, MediaResult},
    render::backend::RendererChoice,
};

/// Scheduling options for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOpts {
    /// Process requests on a rayon pool instead of one sequential pass.
    pub parallel: bool,
    /// Worker thread override (parallel mode only).
    pub threads: Option<usize>,
}

/// Synthesis settings. Every field has a default matching the demo placeholders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Canvas produced by the rich renderer.
    pub rich_size: Size2,
    /// Canvas produced by the raw bitmap fallback.
    pub fallback_size: Size2,
    /// Voice placeholder tone.
    pub tone: ToneParams,
    /// Image subdirectory under the output root.
    pub images_dir: String,
    /// Voice subdirectory under the output root.
    pub voice_dir: String,
    /// Seed for palette color choice; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Rich renderer selection.
    pub renderer: RendererChoice,
    /// Scheduling.
    pub run: RunOpts,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            rich_size: Size2::new(400, 400),
            fallback_size: Size2::new(100, 100),
            tone: ToneParams::default(),
            images_dir: "images".to_string(),
            voice_dir: "voice".to_string(),
            seed: None,
            renderer: RendererChoice::Auto,
            run: RunOpts::default(),
        }
    }
}

impl SynthConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> MediaResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| MediaError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> MediaResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Defaults with `MEDIASEED_*` environment overrides applied.
    pub fn from_env() -> MediaResult<Self> {
        Self::default().with_env_overrides(|k| std::env::var(k).ok())
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// Recognized keys: `MEDIASEED_SEED`, `MEDIASEED_THREADS`, `MEDIASEED_PARALLEL`,
    /// `MEDIASEED_NO_RICH`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> MediaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MEDIASEED_SEED") {
            let seed = v.trim().parse::<u64>().map_err(|_| {
                MediaError::validation(format!(
                    "MEDIASEED_SEED must be an unsigned integer, got '{v}'"
                ))
            })?;
            self.seed = Some(seed);
        }
        if let Some(v) = lookup("MEDIASEED_THREADS") {
            let threads = v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    MediaError::validation(format!("MEDIASEED_THREADS must be > 0, got '{v}'"))
                })?;
            self.run.threads = Some(threads);
        }
        if let Some(v) = lookup("MEDIASEED_PARALLEL") {
            self.run.parallel = parse_flag("MEDIASEED_PARALLEL", &v)?;
        }
        if let Some(v) = lookup("MEDIASEED_NO_RICH")
            && parse_flag("MEDIASEED_NO_RICH", &v)?
        {
            self.renderer = RendererChoice::Disabled;
        }
        self.validate()?;
        Ok(self)
    }

    /// Range checks for sizes, tone parameters, directories and thread count.
    pub fn validate(&self) -> MediaResult<()> {
        for (name, size) in [
            ("rich_size", self.rich_size),
            ("fallback_size", self.fallback_size),
        ] {
            if size.width == 0 || size.height == 0 {
                return Err(MediaError::invalid_dimensions(
                    u64::from(size.width),
                    u64::from(size.height),
                    format!("{name} must be non-empty"),
                ));
            }
        }
        self.tone.validate()?;
        validate_subdir("images_dir", &self.images_dir)?;
        validate_subdir("voice_dir", &self.voice_dir)?;
        if self.images_dir == self.voice_dir {
            return Err(MediaError::validation(
                "images_dir and voice_dir must differ",
            ));
        }
        if self.run.threads == Some(0) {
            return Err(MediaError::validation("run.threads must be > 0"));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, v: &str) -> MediaResult<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(MediaError::validation(format!(
            "{key} must be a boolean flag, got '{v}'"
        ))),
    }
}

fn validate_subdir(name: &str, dir: &str) -> MediaResult<()> {
    let path = Path::new(dir);
    if dir.is_empty() || path.is_absolute() {
        return Err(MediaError::validation(format!(
            "{name} must be a non-empty relative path"
        )));
    }
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(MediaError::validation(format!(
            "{name} must stay inside the output root"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
