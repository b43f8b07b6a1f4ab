//! Radar echo palette.
//!
//! The meteorad captures render every echo class as a flat, unantialiased fill
//! of one exact colour. A [`Palette`] is the ordered list of those classes plus
//! the background class. Order is the declared order and is used wherever layers
//! are iterated, so compositing of overlapping masks is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{RadarError, RadarResult};

/// Name of the background category in the default palette.
pub const BACKGROUND: &str = "background";

/// An exact RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel array, as stored in an `image::Rgb` pixel.
    pub const fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.channels()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One semantic radar echo class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: Rgb,
}

impl Category {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Serialized form, validated into a [`Palette`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaletteSpec {
    #[serde(default = "default_background")]
    background: String,
    categories: Vec<Category>,
}

fn default_background() -> String {
    BACKGROUND.to_string()
}

/// Immutable ordered list of categories with distinct names and colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteSpec", into = "PaletteSpec")]
pub struct Palette {
    categories: Vec<Category>,
    background: usize,
}

impl Palette {
    /// Build a palette, checking that names and colours are unique and that
    /// `background` names one of the categories.
    pub fn new(categories: Vec<Category>, background: &str) -> RadarResult<Self> {
        if categories.is_empty() {
            return Err(RadarError::InvalidPalette("palette is empty".to_string()));
        }

        let mut names = HashSet::with_capacity(categories.len());
        let mut colors = HashSet::with_capacity(categories.len());
        for category in &categories {
            if !names.insert(category.name.as_str()) {
                return Err(RadarError::InvalidPalette(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            if !colors.insert(category.color) {
                return Err(RadarError::InvalidPalette(format!(
                    "category '{}' reuses colour {}",
                    category.name, category.color
                )));
            }
        }

        let background = categories
            .iter()
            .position(|c| c.name == background)
            .ok_or_else(|| {
                RadarError::InvalidPalette(format!("background category '{}' missing", background))
            })?;

        Ok(Self {
            categories,
            background,
        })
    }

    /// The meteorad.ru legend.
    pub fn meteorad() -> Self {
        let categories = [
            (BACKGROUND, (208, 208, 208)),
            ("clouds", (156, 170, 177)),
            ("stratus_clouds", (162, 198, 255)),
            ("light_rain", (70, 255, 147)),
            ("medium_rain", (0, 194, 90)),
            ("heavy_rain", (0, 152, 0)),
            ("cumulus", (255, 255, 128)),
            ("light_shower", (62, 136, 255)),
            ("medium_shower", (1, 56, 255)),
            ("heavy_shower", (0, 0, 116)),
            ("thunder1", (255, 170, 127)),
            ("thunder2", (255, 85, 127)),
            ("thunder3", (255, 0, 0)),
            ("light_hail", (205, 101, 0)),
            ("medium_hail", (136, 68, 0)),
            ("heavy_hail", (94, 1, 0)),
            ("light_gust", (255, 174, 255)),
            ("medium_gust", (255, 85, 255)),
            ("heavy_gust", (199, 0, 199)),
            ("tornado", (62, 62, 94)),
        ]
        .into_iter()
        .map(|(name, (r, g, b))| Category::new(name, Rgb::new(r, g, b)))
        .collect();

        Self {
            categories,
            background: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn background(&self) -> &Category {
        &self.categories[self.background]
    }

    pub fn is_background(&self, name: &str) -> bool {
        self.background().name == name
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::meteorad()
    }
}

impl TryFrom<PaletteSpec> for Palette {
    type Error = RadarError;

    fn try_from(spec: PaletteSpec) -> Result<Self, Self::Error> {
        Palette::new(spec.categories, &spec.background)
    }
}

impl From<Palette> for PaletteSpec {
    fn from(palette: Palette) -> Self {
        let background = palette.background().name.clone();
        PaletteSpec {
            background,
            categories: palette.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meteorad_palette_is_valid() {
        let palette = Palette::meteorad();
        let rebuilt = Palette::new(palette.iter().cloned().collect(), BACKGROUND).unwrap();
        assert_eq!(rebuilt, palette);
        assert_eq!(palette.len(), 20);
        assert_eq!(palette.background().color, Rgb::new(208, 208, 208));
        assert_eq!(palette.iter().last().unwrap().name, "tornado");
    }

    #[test]
    fn test_duplicate_color_rejected() {
        let result = Palette::new(
            vec![
                Category::new("background", Rgb::new(0, 0, 0)),
                Category::new("rain", Rgb::new(0, 0, 0)),
            ],
            "background",
        );
        assert!(matches!(result, Err(RadarError::InvalidPalette(_))));
    }

    #[test]
    fn test_missing_background_rejected() {
        let result = Palette::new(vec![Category::new("rain", Rgb::new(0, 0, 255))], "sky");
        assert!(matches!(result, Err(RadarError::InvalidPalette(_))));
    }

    #[test]
    fn test_palette_from_yaml() {
        let yaml = r#"
background: sky
categories:
  - name: sky
    color: [255, 255, 255]
  - name: rain
    color: [0, 0, 255]
"#;
        let palette: Palette = serde_yaml::from_str(yaml).unwrap();
        assert!(palette.is_background("sky"));
        assert_eq!(palette.get("rain").unwrap().color, Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_palette_yaml_rejects_duplicates() {
        let yaml = r#"
categories:
  - name: background
    color: [1, 2, 3]
  - name: background
    color: [4, 5, 6]
"#;
        assert!(serde_yaml::from_str::<Palette>(yaml).is_err());
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(255, 0, 127).to_string(), "#ff007f");
    }
}
