use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;
use rand::{Rng, seq::IndexedRandom as _};
use serde::Deserialize;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{MediaError, MediaResult};

/// Ordered, non-empty list of colors associated with one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<Rgb8>,
}

impl ColorPalette {
    /// Build a palette; an empty color list is rejected.
    pub fn new(colors: Vec<Rgb8>) -> MediaResult<Self> {
        if colors.is_empty() {
            return Err(MediaError::validation("palette must contain at least one color"));
        }
        Ok(Self { colors })
    }

    /// Parse a palette from `#RRGGBB` literals.
    pub fn from_hex<S: AsRef<str>>(literals: &[S]) -> MediaResult<Self> {
        let colors = literals
            .iter()
            .map(|s| parse_hex_rgb(s.as_ref()))
            .collect::<MediaResult<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Colors in declaration order.
    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// First declared color.
    pub fn primary(&self) -> Rgb8 {
        self.colors[0]
    }

    /// Whether `color` is one of this palette's entries.
    pub fn contains(&self, color: Rgb8) -> bool {
        self.colors.contains(&color)
    }

    /// Pick one entry uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb8 {
        self.colors
            .choose(rng)
            .copied()
            .unwrap_or_else(|| self.primary())
    }
}

/// Immutable category → palette / icon table.
///
/// Lookups never fail: unknown categories resolve to the default grey palette and the default
/// camera icon.
#[derive(Clone, Debug)]
pub struct PaletteRegistry {
    palettes: BTreeMap<String, ColorPalette>,
    icons: BTreeMap<String, String>,
    default_palette: ColorPalette,
    default_icon: String,
}

/// Grey tones used for categories without a configured palette.
pub const DEFAULT_PALETTE_HEX: [&str; 3] = ["#666666", "#888888", "#AAAAAA"];

const DEFAULT_ICON: &str = "\u{1F4F7}";

const BUILTIN_PALETTES: &[(&str, [&str; 3])] = &[
    ("house", ["#8B7355", "#D2B48C", "#F5DEB3"]),
    ("selfie", ["#DDA0DD", "#FFB6C1", "#FFC0CB"]),
    ("business", ["#4682B4", "#5F9EA0", "#708090"]),
    ("food", ["#CD853F", "#DEB887", "#F5DEB3"]),
    ("family", ["#9370DB", "#BA55D3", "#E6E6FA"]),
    ("activity", ["#228B22", "#32CD32", "#90EE90"]),
    ("travel", ["#4169E1", "#6495ED", "#87CEEB"]),
    ("pet", ["#D2691E", "#CD853F", "#F4A460"]),
    ("document", ["#808080", "#A9A9A9", "#D3D3D3"]),
    ("medical", ["#20B2AA", "#66CDAA", "#E0FFFF"]),
    ("gym", ["#FF6347", "#FF7F50", "#FFA07A"]),
    ("cleaning", ["#87CEEB", "#ADD8E6", "#E0FFFF"]),
];

const BUILTIN_ICONS: &[(&str, &str)] = &[
    ("house", "\u{1F3E0}"),
    ("selfie", "\u{1F4F8}"),
    ("business", "\u{1F4BC}"),
    ("food", "\u{1F37D}\u{FE0F}"),
    (
        "family",
        "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}",
    ),
    ("activity", "\u{1F3C3}"),
    ("travel", "\u{2708}\u{FE0F}"),
    ("pet", "\u{1F43E}"),
    ("document", "\u{1F4C4}"),
    ("medical", "\u{2695}\u{FE0F}"),
    ("gym", "\u{1F4AA}"),
    ("cleaning", "\u{2728}"),
];

impl Default for PaletteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    #[serde(default)]
    palettes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    icons: BTreeMap<String, String>,
    #[serde(default)]
    default: Option<Vec<String>>,
    #[serde(default)]
    default_icon: Option<String>,
}

impl PaletteRegistry {
    /// Registry with the twelve demo categories and their icons.
    pub fn builtin() -> Self {
        let palettes = BUILTIN_PALETTES
            .iter()
            .map(|(name, hex)| {
                let colors = hex.iter().map(|h| hex_const(h)).collect();
                ((*name).to_string(), ColorPalette { colors })
            })
            .collect();
        let icons = BUILTIN_ICONS
            .iter()
            .map(|(name, icon)| ((*name).to_string(), (*icon).to_string()))
            .collect();
        Self {
            palettes,
            icons,
            default_palette: ColorPalette {
                colors: DEFAULT_PALETTE_HEX.iter().map(|h| hex_const(h)).collect(),
            },
            default_icon: DEFAULT_ICON.to_string(),
        }
    }

    /// Registry with no configured categories: every lookup yields the default palette.
    pub fn empty() -> Self {
        Self {
            palettes: BTreeMap::new(),
            icons: BTreeMap::new(),
            ..Self::builtin()
        }
    }

    /// Return a copy with `category` mapped to `palette`.
    pub fn with_palette(mut self, category: impl Into<String>, palette: ColorPalette) -> Self {
        self.palettes.insert(category.into(), palette);
        self
    }

    /// Return a copy with `category` mapped to `icon`.
    pub fn with_icon(mut self, category: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(category.into(), icon.into());
        self
    }

    /// Parse a palette file. Entries extend (and override) the built-in table.
    ///
    /// ```json
    /// { "palettes": { "boat": ["#1E90FF", "#00BFFF"] }, "icons": { "boat": "⛵" } }
    /// ```
    pub fn from_json_str(s: &str) -> MediaResult<Self> {
        let file: PaletteFile =
            serde_json::from_str(s).map_err(|e| MediaError::serde(format!("palette file: {e}")))?;

        let mut out = Self::builtin();
        for (category, literals) in file.palettes {
            let palette = ColorPalette::from_hex(&literals).map_err(|e| {
                MediaError::validation(format!("palette for category '{category}': {e}"))
            })?;
            out.palettes.insert(category, palette);
        }
        out.icons.extend(file.icons);
        if let Some(literals) = file.default {
            out.default_palette = ColorPalette::from_hex(&literals)
                .map_err(|e| MediaError::validation(format!("default palette: {e}")))?;
        }
        if let Some(icon) = file.default_icon {
            out.default_icon = icon;
        }
        Ok(out)
    }

    /// Read and parse a palette file from disk.
    pub fn from_path(path: &Path) -> MediaResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read palette file '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Palette for `category`, or the default grey palette.
    pub fn lookup(&self, category: &str) -> &ColorPalette {
        self.palettes
            .get(category)
            .unwrap_or(&self.default_palette)
    }

    /// Whether `category` has an explicitly configured palette.
    pub fn is_configured(&self, category: &str) -> bool {
        self.palettes.contains_key(category)
    }

    /// The palette used for unrecognized categories.
    pub fn default_palette(&self) -> &ColorPalette {
        &self.default_palette
    }

    /// Icon glyph for `category`, or the default camera glyph.
    pub fn icon(&self, category: &str) -> &str {
        self.icons
            .get(category)
            .map(String::as_str)
            .unwrap_or(self.default_icon.as_str())
    }

    /// Configured category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.palettes.keys().map(String::as_str)
    }
}

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
pub fn parse_hex_rgb(s: &str) -> MediaResult<Rgb8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> MediaResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| MediaError::invalid_color(format!("invalid hex byte \"{pair}\"")))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err(MediaError::invalid_color(format!(
            "hex color must be #RRGGBB, got \"#{s}\""
        )));
    }
    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

fn hex_const(s: &str) -> Rgb8 {
    // Built-in tables are fixed literals checked by the unit tests.
    parse_hex_rgb(s).unwrap_or(Rgb8::new(0x88, 0x88, 0x88))
}

#[cfg(test)]
#[path = "../../tests/unit/palette/registry.rs"]
mod tests;
