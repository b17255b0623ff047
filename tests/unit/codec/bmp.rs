use super::*;
use crate::foundation::core::Size2;

fn u16_at(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}

fn u32_at(b: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
}

fn i32_at(b: &[u8], off: usize) -> i32 {
    i32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
}

#[test]
fn padded_row_bytes_round_up_to_four() {
    assert_eq!(bmp_padded_row_bytes(1), 4);
    assert_eq!(bmp_padded_row_bytes(2), 8);
    assert_eq!(bmp_padded_row_bytes(3), 12);
    assert_eq!(bmp_padded_row_bytes(4), 12);
    assert_eq!(bmp_padded_row_bytes(100), 300);
    assert_eq!(bmp_padded_row_bytes(101), 304);
}

#[test]
fn headers_are_byte_exact_for_fallback_size() {
    let bytes = encode_bmp_solid(100, 100, Rgb8::new(0x8b, 0x73, 0x55)).unwrap();
    assert_eq!(bytes.len(), 54 + 300 * 100);

    assert_eq!(&bytes[0..2], b"BM");
    assert_eq!(u32_at(&bytes, 2) as usize, bytes.len());
    assert_eq!(u16_at(&bytes, 6), 0);
    assert_eq!(u16_at(&bytes, 8), 0);
    assert_eq!(u32_at(&bytes, 10), 54);

    assert_eq!(u32_at(&bytes, 14), 40);
    assert_eq!(i32_at(&bytes, 18), 100);
    assert_eq!(i32_at(&bytes, 22), 100);
    assert_eq!(u16_at(&bytes, 26), 1);
    assert_eq!(u16_at(&bytes, 28), 24);
    assert_eq!(u32_at(&bytes, 30), 0);
    assert_eq!(u32_at(&bytes, 34), 300 * 100);
    assert_eq!(i32_at(&bytes, 38), 2835);
    assert_eq!(i32_at(&bytes, 42), 2835);
    assert_eq!(u32_at(&bytes, 46), 0);
    assert_eq!(u32_at(&bytes, 50), 0);

    assert_eq!(&bytes[54..57], &[0x55, 0x73, 0x8b]);
}

#[test]
fn odd_width_rows_are_zero_padded() {
    let bytes = encode_bmp_solid(5, 2, Rgb8::new(1, 2, 3)).unwrap();
    // 5 * 3 = 15 -> 16 bytes per row.
    assert_eq!(bytes.len(), 54 + 16 * 2);
    let row0 = &bytes[54..70];
    assert_eq!(&row0[..3], &[3, 2, 1]);
    assert_eq!(&row0[12..15], &[3, 2, 1]);
    assert_eq!(row0[15], 0);
}

#[test]
fn zero_dimensions_are_rejected() {
    for (w, h) in [(0, 10), (10, 0), (0, 0)] {
        let err = encode_bmp_solid(w, h, Rgb8::new(0, 0, 0)).unwrap_err();
        assert!(matches!(err, MediaError::InvalidDimensions { .. }));
    }
}

#[test]
fn dimensions_beyond_i32_are_rejected() {
    let err = encode_bmp_solid(u32::MAX, 1, Rgb8::new(0, 0, 0)).unwrap_err();
    assert!(err.to_string().contains("signed 32-bit"));
}

#[test]
fn image_crate_decodes_solid_fill() {
    let color = Rgb8::new(0xcd, 0x85, 0x3f);
    let bytes = encode_bmp_solid(7, 3, color).unwrap();
    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (7, 3));
    assert!(decoded.pixels().all(|p| p.0 == [color.r, color.g, color.b]));
}

#[test]
fn artifact_rows_are_stored_bottom_up() {
    // Top row red, bottom row blue.
    let rgb = vec![255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255];
    let artifact = ImageArtifact::from_rgb_bytes(Size2::new(2, 2), rgb).unwrap();
    let bytes = encode_bmp(&artifact).unwrap();
    assert_eq!(bytes.len(), 54 + 8 * 2);
    // First stored row is the bottom (blue) row in BGR order.
    assert_eq!(&bytes[54..57], &[255, 0, 0]);
    assert_eq!(&bytes[62..65], &[0, 0, 255]);

    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 255]);
}

#[test]
fn solid_and_artifact_paths_agree() {
    let color = Rgb8::new(40, 50, 60);
    let solid = encode_bmp_solid(9, 4, color).unwrap();
    let artifact = ImageArtifact::filled(Size2::new(9, 4), color).unwrap();
    assert_eq!(encode_bmp(&artifact).unwrap(), solid);
}
