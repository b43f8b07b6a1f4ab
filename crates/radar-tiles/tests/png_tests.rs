//! Tests for PNG encoding of restored tiles.
//!
//! Every encoded image is decoded back with the `image` crate, so these tests
//! check that the hand-written chunks are readable by a standard decoder.

use radar_common::Palette;
use radar_tiles::png::{create_png, create_png_auto, create_png_indexed, Channels};

// ============================================================================
// Helper functions
// ============================================================================

/// Generate tile-like RGBA data: bands of meteorad colours, background
/// transparent and everything else at the overlay alpha.
fn generate_tile_pixels(width: usize, height: usize) -> Vec<u8> {
    let palette = Palette::meteorad();
    let colors: Vec<_> = palette.iter().collect();
    let mut pixels = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        for x in 0..width {
            let idx = ((x as f32 / width as f32 * 0.4 + y as f32 / height as f32 * 0.6)
                * (colors.len() - 1) as f32) as usize;
            let category = colors[idx.min(colors.len() - 1)];
            let [r, g, b] = category.color.channels();
            let alpha = if palette.is_background(&category.name) { 0 } else { 150 };
            pixels.extend_from_slice(&[r, g, b, alpha]);
        }
    }
    pixels
}

fn color_type(png: &[u8]) -> u8 {
    // Signature (8) + length (4) + "IHDR" (4) + width (4) + height (4) + bit depth (1)
    png[25]
}

// ============================================================================
// Basic PNG creation tests
// ============================================================================

#[test]
fn test_create_png_rgba_decodes() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 150, // green, overlay alpha
        0, 0, 255, 255, // blue
        208, 208, 208, 0, // transparent background
    ];
    let png = create_png(&pixels, 2, 2, Channels::Rgba).unwrap();

    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(color_type(&png), 6);

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 2));
    assert_eq!(decoded.as_raw().as_slice(), &pixels);
}

#[test]
fn test_create_png_rgb_decodes() {
    let pixels = [10, 20, 30, 40, 50, 60, 70, 80, 90];
    let png = create_png(&pixels, 3, 1, Channels::Rgb).unwrap();

    assert_eq!(color_type(&png), 2);
    let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(decoded.as_raw().as_slice(), &pixels);
}

#[test]
fn test_create_png_rejects_short_buffer() {
    let result = create_png(&[0; 11], 2, 2, Channels::Rgb);
    assert!(result.is_err());
}

#[test]
fn test_indexed_png_with_transparency() {
    let palette = [[208, 208, 208, 0], [0, 152, 0, 150]];
    let indices = [0, 1, 1, 0];
    let png = create_png_indexed(2, 2, &palette, &indices).unwrap();

    assert_eq!(color_type(&png), 3);
    assert!(png.windows(4).any(|w| w == b"tRNS"));

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [208, 208, 208, 0]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 152, 0, 150]);
}

#[test]
fn test_indexed_png_without_transparency_has_no_trns() {
    let palette = [[1, 2, 3, 255], [4, 5, 6, 255]];
    let png = create_png_indexed(2, 1, &palette, &[0, 1]).unwrap();
    assert!(!png.windows(4).any(|w| w == b"tRNS"));
}

#[test]
fn test_indexed_png_rejects_wrong_index_count() {
    let palette = [[0, 0, 0, 255]];
    assert!(create_png_indexed(2, 2, &palette, &[0, 0, 0]).is_err());
}

// ============================================================================
// Auto format selection
// ============================================================================

#[test]
fn test_auto_uses_indexed_for_tiles() {
    let (width, height) = (301, 203);
    let pixels = generate_tile_pixels(width, height);

    let auto = create_png_auto(&pixels, width, height, Channels::Rgba).unwrap();
    let truecolor = create_png(&pixels, width, height, Channels::Rgba).unwrap();

    assert_eq!(color_type(&auto), 3);
    assert!(
        auto.len() < truecolor.len(),
        "indexed {} bytes, truecolor {} bytes",
        auto.len(),
        truecolor.len()
    );

    // Large enough for the parallel palette path; the output must match
    let decoded = image::load_from_memory(&auto).unwrap().to_rgba8();
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn test_auto_falls_back_to_truecolor() {
    // 300 distinct colours do not fit a palette
    let (width, height) = (300, 1);
    let pixels: Vec<u8> = (0..width)
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7])
        .collect();

    let png = create_png_auto(&pixels, width, height, Channels::Rgb).unwrap();

    assert_eq!(color_type(&png), 2);
    let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(decoded.as_raw(), &pixels);
}
