//! Gap filling for pixels that match no palette colour.
//!
//! Anti-aliased edges, labels and the map underlay leave pixels whose colour
//! is in no category. Each of them is handed to the category that is densest
//! around it: every category mask is box-summed over a `(2r + 1)` square
//! window, and an unknown pixel joins every category whose windowed count
//! equals the per-pixel maximum.
//!
//! Ties are not broken. Two categories with the same count both claim the
//! pixel and the completed masks overlap there; the compositor's write order
//! then decides the visible colour. Historical tiles were produced this way.

use rayon::prelude::*;
use tracing::{debug, instrument};

use radar_common::{RadarError, RadarResult};

use crate::mask::{Mask, MaskSet};

/// Windowed count of one category's pixels.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    width: u32,
    height: u32,
    counts: Vec<u32>,
}

impl DensityGrid {
    /// Box sum of `mask` over a square window of side `2 * radius + 1`.
    ///
    /// The window is clipped at the raster edges; only in-image pixels count.
    pub fn from_mask(mask: &Mask, radius: u32) -> Self {
        let (width, height) = mask.dimensions();
        let w = width as usize;
        let h = height as usize;
        let r = radius as usize;

        // Summed-area table with a zero first row and column.
        let stride = w + 1;
        let mut table = vec![0u32; stride * (h + 1)];
        let cells = mask.as_slice();
        for y in 0..h {
            let mut row_sum = 0u32;
            for x in 0..w {
                row_sum += cells[y * w + x] as u32;
                table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
            }
        }

        let mut counts = Vec::with_capacity(w * h);
        for y in 0..h {
            let top = y.saturating_sub(r);
            let bottom = (y + r).min(h - 1) + 1;
            for x in 0..w {
                let left = x.saturating_sub(r);
                let right = (x + r).min(w - 1) + 1;
                let sum = (table[bottom * stride + right] + table[top * stride + left])
                    - (table[top * stride + right] + table[bottom * stride + left]);
                counts.push(sum);
            }
        }

        Self {
            width,
            height,
            counts,
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.counts[y as usize * self.width as usize + x as usize]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Pixels claimed by no category.
pub fn unknown_mask(masks: &MaskSet) -> Mask {
    masks.union().inverted()
}

/// Whether a category with windowed count `density` claims an unknown pixel
/// whose maximum count over all categories is `peak`.
///
/// Every category that reaches the peak claims the pixel.
#[inline]
pub fn tie_claims(density: u32, peak: u32) -> bool {
    density == peak
}

/// Assign every unknown pixel to the locally densest categories.
///
/// Returns a new mask set in which every pixel belongs to at least one
/// category. Fails with [`RadarError::NoCandidateCategory`] when some pixel
/// has no pixel of any category inside its window.
#[instrument(skip(masks), fields(layers = masks.len()))]
pub fn guess_unknown(masks: &MaskSet, radius: u32) -> RadarResult<MaskSet> {
    let (width, height) = masks.dimensions();

    let layers: Vec<(&str, &Mask)> = masks.iter().collect();
    let densities: Vec<DensityGrid> = layers
        .par_iter()
        .map(|(_, mask)| DensityGrid::from_mask(mask, radius))
        .collect();

    let pixels = width as usize * height as usize;
    let mut peaks = vec![0u32; pixels];
    for grid in &densities {
        for (peak, &count) in peaks.iter_mut().zip(&grid.counts) {
            *peak = (*peak).max(count);
        }
    }

    if let Some(i) = peaks.iter().position(|&p| p == 0) {
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        return Err(RadarError::NoCandidateCategory { x, y });
    }

    let unknown = unknown_mask(masks);
    let mut completed = MaskSet::new(width, height);
    for ((name, mask), grid) in layers.iter().zip(&densities) {
        let guess = Mask::from_fn(width, height, |x, y| {
            mask.get(x, y)
                || (unknown.get(x, y)
                    && tie_claims(grid.get(x, y), peaks[y as usize * width as usize + x as usize]))
        });
        completed.insert(*name, guess)?;
    }

    debug!(
        width,
        height,
        unknown = unknown.count(),
        "Filled unknown pixels"
    );

    Ok(completed)
}
