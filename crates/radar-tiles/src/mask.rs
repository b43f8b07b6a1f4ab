//! Per-category boolean masks and exact-colour splitting.

use std::collections::HashMap;

use image::RgbImage;
use radar_common::{Palette, RadarError, RadarResult};
use tracing::debug;

/// Row-major boolean grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// All-false mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, false)
    }

    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Row-major cell values.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Number of `true` pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn all(&self) -> bool {
        self.data.iter().all(|&v| v)
    }

    /// Coordinates of `true` pixels in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }

    /// In-place union with another mask of the same size.
    pub fn union_with(&mut self, other: &Mask) -> RadarResult<()> {
        self.check_same_size(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a |= b;
        }
        Ok(())
    }

    pub fn inverted(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| !v).collect(),
        }
    }

    fn check_same_size(&self, other: &Mask) -> RadarResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(RadarError::shape_mismatch(
                format!("{}x{}", self.width, self.height),
                format!("{}x{}", other.width, other.height),
            ));
        }
        Ok(())
    }
}

/// Ordered mapping from category name to mask, all of one size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSet {
    width: u32,
    height: u32,
    layers: Vec<(String, Mask)>,
}

impl MaskSet {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Append a layer. Replaces an existing layer of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, mask: Mask) -> RadarResult<()> {
        if mask.dimensions() != self.dimensions() {
            return Err(RadarError::shape_mismatch(
                format!("{}x{}", self.width, self.height),
                format!("{}x{}", mask.width, mask.height),
            ));
        }
        let name = name.into();
        match self.layers.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = mask,
            None => self.layers.push((name, mask)),
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, name: &str) -> RadarResult<&Mask> {
        self.layers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
            .ok_or_else(|| RadarError::UnknownCategory(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> RadarResult<&mut Mask> {
        self.layers
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
            .ok_or_else(|| RadarError::UnknownCategory(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mask)> {
        self.layers.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    /// Pixels claimed by at least one layer.
    pub fn union(&self) -> Mask {
        let mut covered = Mask::new(self.width, self.height);
        for (_, mask) in &self.layers {
            for (a, &b) in covered.data.iter_mut().zip(&mask.data) {
                *a |= b;
            }
        }
        covered
    }

    /// Number of layers that claim pixel `(x, y)`.
    pub fn claims(&self, x: u32, y: u32) -> usize {
        self.layers.iter().filter(|(_, m)| m.get(x, y)).count()
    }
}

/// Split a raster into one mask per palette category by exact colour match.
///
/// Colours in a palette are pairwise distinct, so no pixel lands in two
/// masks. Pixels whose colour is not in the palette land in none.
pub fn split_colors(raster: &RgbImage, palette: &Palette) -> MaskSet {
    let (width, height) = raster.dimensions();
    let lookup: HashMap<[u8; 3], usize> = palette
        .iter()
        .enumerate()
        .map(|(i, c)| (c.color.channels(), i))
        .collect();

    let mut masks: Vec<Mask> = (0..palette.len()).map(|_| Mask::new(width, height)).collect();
    for (x, y, pixel) in raster.enumerate_pixels() {
        if let Some(&i) = lookup.get(&pixel.0) {
            masks[i].set(x, y, true);
        }
    }

    let layers: Vec<(String, Mask)> = palette
        .iter()
        .zip(masks)
        .map(|(category, mask)| (category.name.clone(), mask))
        .collect();

    debug!(
        width,
        height,
        classified = layers.iter().map(|(_, m)| m.count()).sum::<usize>(),
        "Split raster into category masks"
    );

    MaskSet {
        width,
        height,
        layers,
    }
}
