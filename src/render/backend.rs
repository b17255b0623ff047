use crate::{
    catalog::model::MediaRequest,
    foundation::core::{Rgb8, Size2},
    foundation::error::MediaResult,
    palette::registry::ColorPalette,
    raster::artifact::ImageArtifact,
};

/// Everything a rich renderer needs to compose one placeholder image.
#[derive(Clone, Copy, Debug)]
pub struct RenderInput<'a> {
    /// The request being rendered.
    pub request: &'a MediaRequest,
    /// Palette resolved for `request.category`.
    pub palette: &'a ColorPalette,
    /// Background color, already drawn from `palette`.
    pub background: Rgb8,
    /// Category icon glyph.
    pub icon: &'a str,
}

/// Optional higher-fidelity image composer.
///
/// The orchestrator holds an `Option<Box<dyn RichRenderer>>`; `None` means the capability is not
/// available and images go straight to the raw BMP tier.
pub trait RichRenderer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Canvas size produced by [`RichRenderer::render`].
    fn canvas_size(&self) -> Size2;

    /// Compose a placeholder image.
    fn render(&self, input: &RenderInput<'_>) -> MediaResult<ImageArtifact>;

    /// Like [`RichRenderer::render`], but reports failure as "not available".
    fn try_render(&self, input: &RenderInput<'_>) -> Option<ImageArtifact> {
        match self.render(input) {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(
                    renderer = self.name(),
                    id = %input.request.id,
                    error = %err,
                    "rich render failed; falling back to raw bitmap"
                );
                None
            }
        }
    }
}

/// Which rich renderer to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererChoice {
    /// Use the SVG renderer when compiled in and fonts are found.
    #[default]
    Auto,
    /// Never use a rich renderer.
    Disabled,
}

/// Resolve the rich renderer capability for this process.
///
/// Returns `None` when disabled, when the `rich` feature is off, or when no usable font is
/// installed.
pub fn detect_renderer(choice: RendererChoice, size: Size2) -> Option<Box<dyn RichRenderer>> {
    match choice {
        RendererChoice::Disabled => None,
        RendererChoice::Auto => detect_svg(size),
    }
}

#[cfg(feature = "rich")]
fn detect_svg(size: Size2) -> Option<Box<dyn RichRenderer>> {
    let renderer = crate::render::svg::SvgRenderer::detect(size)?;
    tracing::debug!(family = renderer.family(), "svg renderer available");
    Some(Box::new(renderer))
}

#[cfg(not(feature = "rich"))]
fn detect_svg(_size: Size2) -> Option<Box<dyn RichRenderer>> {
    tracing::debug!("built without the `rich` feature; raw bitmaps only");
    None
}
