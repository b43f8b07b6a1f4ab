//! End-to-end behaviour of the restoration pipeline.
//!
//! Covers:
//! - Exact-colour splitting
//! - Coverage shaping
//! - Gap filling (majority, ties, missing candidates)
//! - Compositing in both modes
//! - Writing a tile from a capture on disk

use image::{Rgb, Rgba};
use radar_common::{PipelineConfig, RadarError, RegionOfInterest};
use radar_tiles::compose::{join_split, CompositeMode};
use radar_tiles::coverage::{coverage_disk, expand_background};
use radar_tiles::gap_fill::{guess_unknown, unknown_mask};
use radar_tiles::{make_tile, restore, split_colors};
use test_utils::{
    assert_claimed_by, capture_with_margins, colors, radar_disk, rain_legend, rain_palette,
    raster_from_rows, temp_test_dir, two_category_legend, two_category_palette,
};

// ============================================================================
// Mask splitting
// ============================================================================

#[test]
fn test_split_masks_are_disjoint() {
    let raster = raster_from_rows(
        &[
            "..llhh", //
            ".?lxhh",
            "..l?h.",
        ],
        &rain_legend(),
    );
    let split = split_colors(&raster, &rain_palette());

    for y in 0..3 {
        for x in 0..6 {
            assert!(split.claims(x, y) <= 1, "pixel ({}, {}) claimed twice", x, y);
        }
    }
    // '?' twice and 'x' once are unclassified
    assert_eq!(split.union().count(), 18 - 3);
    assert_claimed_by!(split, (3, 1), []);
    assert_claimed_by!(split, (4, 0), ["heavy_rain"]);
}

// ============================================================================
// Coverage shaping
// ============================================================================

#[test]
fn test_background_covers_everything_outside_disk() {
    let raster = raster_from_rows(
        &[
            "llllllllll", //
            "llllllllll",
            "llll..llll",
            "llllllllll",
        ],
        &rain_legend(),
    );
    let mut split = split_colors(&raster, &rain_palette());
    let before = split.get("background").unwrap().clone();

    expand_background(split.get_mut("background").unwrap());

    let background = split.get("background").unwrap();
    let disk = coverage_disk(10, 4);
    for y in 0..4 {
        for x in 0..10 {
            if !disk.get(x, y) {
                assert!(background.get(x, y), "outside pixel ({}, {}) not background", x, y);
            }
            if before.get(x, y) {
                assert!(background.get(x, y));
            }
        }
    }
    assert!(background.get(0, 0));
}

// ============================================================================
// Gap filling
// ============================================================================

#[test]
fn test_unknown_pixel_joins_dominant_neighbour() {
    let raster = raster_from_rows(
        &[
            "abbbb", //
            "bbbbb",
            "bb?bb",
            "bbbbb",
            "bbbba",
        ],
        &two_category_legend(),
    );
    let split = split_colors(&raster, &two_category_palette());
    assert_eq!(unknown_mask(&split).count(), 1);

    let completed = guess_unknown(&split, 2).unwrap();

    assert_claimed_by!(completed, (2, 2), ["b"]);
    assert!(completed.union().all());
}

#[test]
fn test_tie_is_claimed_by_both_categories() {
    let raster = raster_from_rows(&["aa?bb"], &two_category_legend());
    let split = split_colors(&raster, &two_category_palette());

    let completed = guess_unknown(&split, 2).unwrap();

    assert_claimed_by!(completed, (2, 0), ["a", "b"]);
    assert_claimed_by!(completed, (0, 0), ["a"]);
    assert_claimed_by!(completed, (4, 0), ["b"]);
}

#[test]
fn test_tie_resolved_by_palette_order_when_composited() {
    let raster = raster_from_rows(&["aa?bb"], &two_category_legend());
    let palette = two_category_palette();
    let completed = guess_unknown(&split_colors(&raster, &palette), 2).unwrap();

    let image = join_split(&completed, &palette, CompositeMode::Opaque, 150)
        .unwrap()
        .into_rgb()
        .unwrap();
    // 'b' is declared after 'a', so it paints over the shared pixel
    assert_eq!(image.get_pixel(2, 0).0, colors::HEAVY_RAIN.channels());
}

#[test]
fn test_isolated_unknown_region_is_fatal() {
    let mut rows = vec!["?".repeat(25); 25];
    rows[0].replace_range(0..1, "a");
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let raster = raster_from_rows(&rows, &two_category_legend());
    let split = split_colors(&raster, &two_category_palette());

    let err = guess_unknown(&split, 9).unwrap_err();

    assert!(err.is_fatal());
    // First pixel in row-major order whose 19x19 window misses (0, 0)
    assert!(matches!(err, RadarError::NoCandidateCategory { x: 10, y: 0 }));
}

#[test]
fn test_completed_masks_cover_grid() {
    let raster = raster_from_rows(
        &[
            "....lll", //
            "..?llxh",
            ".?llhhh",
            "..x?hhh",
        ],
        &rain_legend(),
    );
    let split = split_colors(&raster, &rain_palette());
    let completed = guess_unknown(&split, 1).unwrap();

    assert!(completed.union().all());
    for (name, mask) in split.iter() {
        let filled = completed.get(name).unwrap();
        for (x, y) in mask.iter_set() {
            assert!(filled.get(x, y), "{} lost pixel ({}, {})", name, x, y);
        }
    }
}

// ============================================================================
// Compositing
// ============================================================================

#[test]
fn test_composite_colors_and_alpha() {
    let raster = raster_from_rows(
        &[
            ".lh", //
            "hl.",
        ],
        &rain_legend(),
    );
    let palette = rain_palette();
    let split = split_colors(&raster, &palette);

    let opaque = join_split(&split, &palette, CompositeMode::Opaque, 150)
        .unwrap()
        .into_rgb()
        .unwrap();
    assert_eq!(opaque, raster);

    let overlay = join_split(&split, &palette, CompositeMode::Overlay, 150)
        .unwrap()
        .into_rgba()
        .unwrap();
    for (x, y, pixel) in overlay.enumerate_pixels() {
        let background = split.get("background").unwrap().get(x, y);
        assert_eq!(pixel[3], if background { 0 } else { 150 });
        assert_eq!(&pixel.0[..3], &raster.get_pixel(x, y).0);
    }
}

// ============================================================================
// Full pipeline
// ============================================================================

fn disk_capture() -> (image::RgbImage, RegionOfInterest) {
    let mut inner = radar_disk(
        21,
        10,
        colors::BACKGROUND,
        colors::LIGHT_RAIN,
        colors::HEAVY_RAIN,
    );
    // Unknown inside the disk, surrounded by light rain
    inner.put_pixel(5, 10, Rgb(colors::UNKNOWN.channels()));
    // Unknown outside the disk: background by coverage
    inner.put_pixel(0, 0, Rgb(colors::UNKNOWN.channels()));

    let roi = RegionOfInterest {
        top: 3,
        bottom: 2,
        left: 5,
        right: 7,
        source_size: Some((33, 26)),
    };
    (capture_with_margins(&inner, &roi, colors::UNKNOWN), roi)
}

fn disk_config(roi: RegionOfInterest) -> PipelineConfig {
    PipelineConfig {
        roi,
        radius: 2,
        ..PipelineConfig::with_palette(rain_palette())
    }
}

#[test]
fn test_restore_disk_capture() {
    let (capture, roi) = disk_capture();
    let config = disk_config(roi);

    let restoration = restore(&capture, &config).unwrap();

    assert_eq!(restoration.dimensions(), (21, 21));
    assert_eq!(restoration.unknown.iter_set().collect::<Vec<_>>(), vec![(5, 10)]);
    assert_claimed_by!(restoration.split, (0, 0), ["background"]);
    assert_claimed_by!(restoration.completed, (5, 10), ["light_rain"]);
    assert!(restoration.completed.union().all());
}

#[test]
fn test_make_tile_writes_overlay_png() {
    let dir = temp_test_dir();
    let input = dir.path().join("2015-07-31T19:00:23.506671.png");
    let output = dir.path().join("tiles").join("2015-07-31T19:00:23.506671.png");
    let (capture, roi) = disk_capture();
    capture.save(&input).unwrap();

    let summary = make_tile(&input, &output, &disk_config(roi)).unwrap();

    assert_eq!((summary.width, summary.height), (21, 21));
    assert_eq!(summary.unknown_pixels, 1);

    let tile = image::open(&output).unwrap().to_rgba8();
    assert_eq!(tile.dimensions(), (21, 21));
    assert_eq!(tile.get_pixel(0, 0), &Rgba([208, 208, 208, 0]));
    assert_eq!(tile.get_pixel(5, 10), &Rgba([70, 255, 147, 150]));
    assert_eq!(tile.get_pixel(10, 10), &Rgba([0, 152, 0, 150]));
}

#[test]
fn test_make_tile_rejects_wrong_capture_size() {
    let dir = temp_test_dir();
    let input = dir.path().join("capture.png");
    let output = dir.path().join("tile.png");
    let (capture, roi) = disk_capture();
    capture.save(&input).unwrap();

    let config = disk_config(RegionOfInterest {
        source_size: Some((900, 700)),
        ..roi
    });
    let result = make_tile(&input, &output, &config);

    assert!(matches!(result, Err(RadarError::ShapeMismatch { .. })));
    assert!(!output.exists());
}
