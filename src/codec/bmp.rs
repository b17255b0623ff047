//! 24-bit uncompressed BMP writer.
//!
//! Layout: 14-byte `BITMAPFILEHEADER`, 40-byte `BITMAPINFOHEADER`, then pixel rows stored
//! bottom-to-top in BGR order, each row zero-padded to a multiple of four bytes.

use crate::{
    foundation::core::Rgb8,
    foundation::error::{MediaError, MediaResult},
    raster::artifact::ImageArtifact,
};

/// Size of the file header plus the info header; also the pixel array offset.
pub const BMP_HEADER_BYTES: usize = 14 + 40;

/// Resolution written into both axes (72 DPI).
pub const BMP_PIXELS_PER_METER: i32 = 2835;

/// Stored byte length of one pixel row, padded to a 4-byte boundary.
pub fn bmp_padded_row_bytes(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}

/// Encode a `width`×`height` image filled with `color`.
pub fn encode_bmp_solid(width: u32, height: u32, color: Rgb8) -> MediaResult<Vec<u8>> {
    let (row_bytes, pixel_bytes) = validate_dims(width, height)?;
    let mut out = Vec::with_capacity(BMP_HEADER_BYTES + pixel_bytes);
    write_headers(&mut out, width, height, pixel_bytes);

    let mut row = Vec::with_capacity(row_bytes);
    for _ in 0..width {
        row.extend_from_slice(&[color.b, color.g, color.r]);
    }
    row.resize(row_bytes, 0);
    for _ in 0..height {
        out.extend_from_slice(&row);
    }
    Ok(out)
}

/// Encode an arbitrary RGB raster.
pub fn encode_bmp(artifact: &ImageArtifact) -> MediaResult<Vec<u8>> {
    let (width, height) = artifact.dimensions();
    let (row_bytes, pixel_bytes) = validate_dims(width, height)?;
    let mut out = Vec::with_capacity(BMP_HEADER_BYTES + pixel_bytes);
    write_headers(&mut out, width, height, pixel_bytes);

    let pad = row_bytes - width as usize * 3;
    let rgb = artifact.as_rgb_bytes();
    let stride = width as usize * 3;
    for y in (0..height as usize).rev() {
        let src = &rgb[y * stride..(y + 1) * stride];
        for px in src.chunks_exact(3) {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        out.extend(std::iter::repeat_n(0u8, pad));
    }
    Ok(out)
}

fn validate_dims(width: u32, height: u32) -> MediaResult<(usize, usize)> {
    if width == 0 || height == 0 {
        return Err(MediaError::invalid_dimensions(
            u64::from(width),
            u64::from(height),
            "width and height must be > 0",
        ));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(MediaError::invalid_dimensions(
            u64::from(width),
            u64::from(height),
            "width and height must fit a signed 32-bit integer",
        ));
    }

    let row_bytes = bmp_padded_row_bytes(width);
    let file_bytes = (row_bytes as u64) * u64::from(height) + BMP_HEADER_BYTES as u64;
    if file_bytes > u64::from(u32::MAX) {
        return Err(MediaError::invalid_dimensions(
            u64::from(width),
            u64::from(height),
            "encoded file would exceed 4 GiB",
        ));
    }
    Ok((row_bytes, row_bytes * height as usize))
}

fn write_headers(out: &mut Vec<u8>, width: u32, height: u32, pixel_bytes: usize) {
    // Sizes were range-checked in `validate_dims`.
    let file_size = (BMP_HEADER_BYTES + pixel_bytes) as u32;

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(BMP_HEADER_BYTES as u32).to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
    out.extend_from_slice(&BMP_PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&BMP_PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/codec/bmp.rs"]
mod tests;
