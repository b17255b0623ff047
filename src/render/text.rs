//! Caption measurement and greedy word wrapping.

/// Greedy line fill: words are appended while the measured line stays within `max_width`.
///
/// A single word wider than `max_width` is kept on its own line. At most `max_lines` lines are
/// returned; the rest are dropped.
pub fn wrap_greedy<F>(text: &str, max_width: f32, max_lines: usize, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::<String>::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.truncate(max_lines);
    lines
}

#[cfg(feature = "rich")]
pub use measurer::TextMeasurer;

#[cfg(feature = "rich")]
mod measurer {
    use crate::foundation::error::{MediaError, MediaResult};

    /// Measures single-line advance widths with Parley, using one registered font.
    pub struct TextMeasurer {
        font_ctx: parley::FontContext,
        layout_ctx: parley::LayoutContext<()>,
        family: String,
    }

    impl TextMeasurer {
        /// Register `font` and measure with its family named `family`, or its first family
        /// when no registered name matches.
        pub fn new(font: parley::fontique::Blob<u8>, family: Option<&str>) -> MediaResult<Self> {
            let mut font_ctx = parley::FontContext::default();
            let families = font_ctx.collection.register_fonts(font, None);

            let mut names = Vec::with_capacity(families.len());
            for (id, _) in &families {
                if let Some(name) = font_ctx.collection.family_name(*id) {
                    names.push(name.to_string());
                }
            }
            let family = family
                .and_then(|wanted| names.iter().find(|n| n.eq_ignore_ascii_case(wanted)).cloned())
                .or_else(|| names.into_iter().next())
                .ok_or_else(|| MediaError::render("no named font families in font data"))?;

            Ok(Self {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
                family,
            })
        }

        /// Family name Parley resolved from the font bytes.
        pub fn family(&self) -> &str {
            &self.family
        }

        /// Unwrapped advance width of `text` at `size_px`.
        pub fn measure(&mut self, text: &str, size_px: f32) -> f32 {
            let mut builder = self
                .layout_ctx
                .ranged_builder(&mut self.font_ctx, text, 1.0, true);
            builder.push_default(parley::style::StyleProperty::FontStack(
                parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
            ));
            builder.push_default(parley::style::StyleProperty::FontSize(size_px));

            let mut layout: parley::Layout<()> = builder.build(text);
            layout.break_all_lines(None);
            layout.width()
        }
    }
}
