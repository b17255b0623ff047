use crate::{
    foundation::core::{Rgb8, Size2},
    foundation::error::{MediaError, MediaResult},
};

/// In-memory RGB8 raster produced by a renderer, serialized once and dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageArtifact {
    pixels: image::RgbImage,
}

impl ImageArtifact {
    /// A `size` canvas filled with `color`.
    pub fn filled(size: Size2, color: Rgb8) -> MediaResult<Self> {
        check_size(size)?;
        Ok(Self {
            pixels: image::RgbImage::from_pixel(
                size.width,
                size.height,
                image::Rgb([color.r, color.g, color.b]),
            ),
        })
    }

    /// Wrap tightly packed row-major RGB8 bytes.
    pub fn from_rgb_bytes(size: Size2, bytes: Vec<u8>) -> MediaResult<Self> {
        check_size(size)?;
        let pixels = image::RgbImage::from_raw(size.width, size.height, bytes).ok_or_else(|| {
            MediaError::invalid_dimensions(
                u64::from(size.width),
                u64::from(size.height),
                "pixel buffer length does not match dimensions",
            )
        })?;
        Ok(Self { pixels })
    }

    /// Drop alpha from straight or premultiplied RGBA8 over an opaque canvas.
    pub fn from_opaque_rgba_bytes(size: Size2, rgba: &[u8]) -> MediaResult<Self> {
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        Self::from_rgb_bytes(size, rgb)
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Canvas size.
    pub fn size(&self) -> Size2 {
        let (width, height) = self.dimensions();
        Size2::new(width, height)
    }

    /// Color at `(x, y)`, top-left origin.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        let image::Rgb([r, g, b]) = *self.pixels.get_pixel(x, y);
        Some(Rgb8::new(r, g, b))
    }

    /// Row-major RGB8 bytes, top row first.
    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Borrow the underlying `image` buffer.
    pub fn as_image(&self) -> &image::RgbImage {
        &self.pixels
    }
}

fn check_size(size: Size2) -> MediaResult<()> {
    if size.width == 0 || size.height == 0 {
        return Err(MediaError::invalid_dimensions(
            u64::from(size.width),
            u64::from(size.height),
            "width and height must be > 0",
        ));
    }
    Ok(())
}
