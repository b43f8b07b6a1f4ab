//! Common test fixtures for radar tile tests.
//!
//! Small palettes keep synthetic rasters readable while exercising the same
//! code paths as the full meteorad legend.

use radar_common::{Category, Palette, Rgb, BACKGROUND};

/// Colours shared by the fixture palettes.
pub mod colors {
    use radar_common::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(208, 208, 208);
    pub const LIGHT_RAIN: Rgb = Rgb::new(70, 255, 147);
    pub const HEAVY_RAIN: Rgb = Rgb::new(0, 152, 0);
    pub const HAIL: Rgb = Rgb::new(205, 101, 0);

    /// A colour in none of the fixture palettes (map underlay grey-blue).
    pub const UNKNOWN: Rgb = Rgb::new(17, 34, 51);
}

/// Background plus two rain classes.
pub fn rain_palette() -> Palette {
    Palette::new(
        vec![
            Category::new(BACKGROUND, colors::BACKGROUND),
            Category::new("light_rain", colors::LIGHT_RAIN),
            Category::new("heavy_rain", colors::HEAVY_RAIN),
        ],
        BACKGROUND,
    )
    .expect("fixture palette is valid")
}

/// Two categories, `a` (the background) and `b`.
pub fn two_category_palette() -> Palette {
    Palette::new(
        vec![
            Category::new("a", colors::LIGHT_RAIN),
            Category::new("b", colors::HEAVY_RAIN),
        ],
        "a",
    )
    .expect("fixture palette is valid")
}

/// Legend used by [`crate::raster_from_rows`] for the rain palette.
///
/// `.` background, `l` light rain, `h` heavy rain, `x` hail (not in the
/// palette), `?` unknown.
pub fn rain_legend() -> Vec<(char, Rgb)> {
    vec![
        ('.', colors::BACKGROUND),
        ('l', colors::LIGHT_RAIN),
        ('h', colors::HEAVY_RAIN),
        ('x', colors::HAIL),
        ('?', colors::UNKNOWN),
    ]
}

/// Legend for [`two_category_palette`]: `a`, `b`, `?` unknown.
pub fn two_category_legend() -> Vec<(char, Rgb)> {
    vec![
        ('a', colors::LIGHT_RAIN),
        ('b', colors::HEAVY_RAIN),
        ('?', colors::UNKNOWN),
    ]
}
