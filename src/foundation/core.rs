use crate::foundation::error::{MediaError, MediaResult};

/// Straight (non-premultiplied) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels already known to be in range.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wide integer components, rejecting anything outside `0..=255`.
    pub fn from_components(r: i64, g: i64, b: i64) -> MediaResult<Self> {
        fn channel(name: &str, v: i64) -> MediaResult<u8> {
            u8::try_from(v).map_err(|_| {
                MediaError::invalid_color(format!("{name} component {v} is outside 0..=255"))
            })
        }

        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
        })
    }

    /// Sum of the three channels; the demo uses it as a cheap luminance proxy.
    pub fn channel_sum(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }

    /// `#rrggbb` lowercase hex form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Which container a request produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image, written as a 24-bit BMP.
    Image,
    /// Voice note, written as 16-bit mono PCM WAV.
    Voice,
}

impl MediaKind {
    /// File extension matching the encoded container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Image => "bmp",
            Self::Voice => "wav",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Voice => f.write_str("voice"),
        }
    }
}

/// Raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size2 {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size2 {
    /// Build a size without validation; encoders validate at the boundary.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
