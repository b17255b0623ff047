//! Rich placeholder renderer: builds a small SVG scene and rasterizes it with `resvg`.
//!
//! Layout follows the demo placeholders: palette background, a translucent band across the
//! vertical middle, a 24 px centered label, up to two 14 px description lines wrapped to the
//! canvas width minus 40 px, and the category icon in the top-left corner.

use std::{fmt::Write as _, sync::Arc};

use crate::{
    foundation::core::{Rgb8, Size2},
    foundation::error::{MediaError, MediaResult},
    raster::artifact::ImageArtifact,
    render::backend::{RenderInput, RichRenderer},
    render::text::{TextMeasurer, wrap_greedy},
};

const LABEL_PX: f32 = 24.0;
const DESC_PX: f32 = 14.0;
const ICON_PX: f32 = 28.0;
const DESC_LINE_ADVANCE: f32 = 18.0;
const DESC_MAX_LINES: usize = 2;
const WRAP_MARGIN: f32 = 40.0;
const BAND_HALF_HEIGHT: f32 = 50.0;
const BAND_ALPHA: f32 = 80.0 / 255.0;
// Approximate ascent so SVG baselines line up with top-anchored text boxes.
const ASCENT: f32 = 0.8;

const LIGHT_TEXT: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);
const DARK_TEXT: Rgb8 = Rgb8::new(0x33, 0x33, 0x33);

/// SVG-based [`RichRenderer`] backed by the system font database.
pub struct SvgRenderer {
    size: Size2,
    fontdb: Arc<usvg::fontdb::Database>,
    family: String,
    font: parley::fontique::Blob<u8>,
    emoji_family: Option<String>,
}

impl std::fmt::Debug for SvgRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("size", &self.size)
            .field("family", &self.family)
            .field("font_len", &self.font.len())
            .field("emoji_family", &self.emoji_family)
            .finish()
    }
}

impl SvgRenderer {
    /// Load system fonts; `None` when no usable face is installed.
    pub fn detect(size: Size2) -> Option<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        match Self::with_fontdb(size, db) {
            Ok(r) => Some(r),
            Err(err) => {
                tracing::debug!(error = %err, "svg renderer unavailable");
                None
            }
        }
    }

    /// Build a renderer over an explicit font database.
    pub fn with_fontdb(size: Size2, db: usvg::fontdb::Database) -> MediaResult<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(MediaError::invalid_dimensions(
                u64::from(size.width),
                u64::from(size.height),
                "rich canvas must be non-empty",
            ));
        }

        let families = [
            usvg::fontdb::Family::SansSerif,
            usvg::fontdb::Family::Serif,
            usvg::fontdb::Family::Monospace,
        ];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| MediaError::render("no fonts installed"))?;

        let family = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| MediaError::render("selected font face has no family name"))?;
        let font_bytes = db
            .with_face_data(id, |data, _index| data.to_vec())
            .ok_or_else(|| MediaError::render(format!("font data for '{family}' unreadable")))?;

        let emoji_family = db.faces().find_map(|f| {
            f.families
                .iter()
                .map(|(name, _)| name)
                .find(|name| name.contains("Emoji"))
                .cloned()
        });

        Ok(Self {
            size,
            fontdb: Arc::new(db),
            family,
            font: parley::fontique::Blob::from(font_bytes),
            emoji_family,
        })
    }

    /// Primary text family.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Wrap `description` the way [`RichRenderer::render`] will draw it.
    pub fn wrap_description(&self, description: &str) -> MediaResult<Vec<String>> {
        let mut measurer = TextMeasurer::new(self.font.clone(), Some(&self.family))?;
        let max_width = self.size.width as f32 - WRAP_MARGIN;
        Ok(wrap_greedy(description, max_width, DESC_MAX_LINES, |s| {
            measurer.measure(s, DESC_PX)
        }))
    }

    fn scene_svg(&self, input: &RenderInput<'_>, desc_lines: &[String]) -> String {
        let w = self.size.width as f32;
        let h = self.size.height as f32;
        let mid = h / 2.0;
        let text_color = contrast_text(input.background);
        let family = xml_escape(&self.family);

        let mut svg = String::with_capacity(1024);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(
            svg,
            r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
            input.background.to_hex()
        );
        let _ = write!(
            svg,
            r##"<rect x="0" y="{}" width="{w}" height="{}" fill="#000000" fill-opacity="{BAND_ALPHA}"/>"##,
            mid - BAND_HALF_HEIGHT,
            BAND_HALF_HEIGHT * 2.0
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="{family}" font-size="{LABEL_PX}" fill="{}" text-anchor="middle">{}</text>"#,
            w / 2.0,
            mid - 30.0 + LABEL_PX * ASCENT,
            text_color.to_hex(),
            xml_escape(&input.request.label)
        );

        let mut y = mid + 5.0;
        for line in desc_lines {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-family="{family}" font-size="{DESC_PX}" fill="{}" text-anchor="middle">{}</text>"#,
                w / 2.0,
                y + DESC_PX * ASCENT,
                text_color.to_hex(),
                xml_escape(line)
            );
            y += DESC_LINE_ADVANCE;
        }

        if let Some(emoji) = &self.emoji_family
            && !input.icon.is_empty()
        {
            let _ = write!(
                svg,
                r#"<text x="20" y="{}" font-family="{}" font-size="{ICON_PX}">{}</text>"#,
                20.0 + ICON_PX * ASCENT,
                xml_escape(emoji),
                xml_escape(input.icon)
            );
        }

        svg.push_str("</svg>");
        svg
    }

    fn rasterize(&self, svg: &str) -> MediaResult<ImageArtifact> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: first_face_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts)
            .map_err(|e| MediaError::render(format!("parse placeholder svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.size.width, self.size.height)
            .ok_or_else(|| MediaError::render("failed to allocate placeholder pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        ImageArtifact::from_opaque_rgba_bytes(self.size, pixmap.data())
    }
}

impl RichRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn canvas_size(&self) -> Size2 {
        self.size
    }

    fn render(&self, input: &RenderInput<'_>) -> MediaResult<ImageArtifact> {
        let desc_lines = self.wrap_description(&input.request.description)?;
        let svg = self.scene_svg(input, &desc_lines);
        self.rasterize(&svg)
    }
}

/// White text on dark backgrounds, dark grey on light ones.
pub fn contrast_text(background: Rgb8) -> Rgb8 {
    if background.channel_sum() < 400 {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn first_face_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                if let usvg::FontFamily::Named(name) = family {
                    families.push(usvg::fontdb::Family::Name(name));
                }
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
