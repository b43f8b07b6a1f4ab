//! PNG encoding for tiles.
//!
//! Restored tiles only hold palette colours (plus their alpha variants), so
//! they are written as indexed PNG (colour type 3) with a `tRNS` chunk when
//! any entry is translucent. Rasters with more than 256 distinct colours fall
//! back to truecolour: RGB (type 2) or RGBA (type 6) to match the input.
//!
//! Use [`create_png_auto`] unless the output type must be forced.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use rayon::prelude::*;

use radar_common::{RadarError, RadarResult};

/// Entries in a PNG8 palette.
const MAX_PALETTE_SIZE: usize = 256;

/// Rows handed to one rayon task while indexing.
const ROWS_PER_TASK: usize = 16;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// One RGBA palette entry.
pub type PaletteEntry = [u8; 4];

/// Interleaved pixel layout of the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    pub const fn bytes(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    const fn color_type(self) -> u8 {
        match self {
            Channels::Rgb => 2,
            Channels::Rgba => 6,
        }
    }

    #[inline]
    fn entry(self, pixel: &[u8]) -> PaletteEntry {
        match self {
            Channels::Rgb => [pixel[0], pixel[1], pixel[2], 255],
            Channels::Rgba => [pixel[0], pixel[1], pixel[2], pixel[3]],
        }
    }
}

/// A raster as palette plus one index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    /// Sorted, so the encoding does not depend on thread scheduling.
    pub palette: Vec<PaletteEntry>,
    pub indices: Vec<u8>,
}

impl IndexedRaster {
    /// Index a raster, or `None` when it has more than 256 colours.
    pub fn quantize(pixels: &[u8], width: usize, channels: Channels) -> Option<Self> {
        let row_bytes = (width * channels.bytes()).max(1);

        let palette = distinct_colors(pixels, row_bytes, channels)?;
        let lookup: HashMap<PaletteEntry, u8> = palette
            .iter()
            .enumerate()
            .map(|(i, &entry)| (entry, i as u8))
            .collect();

        let mut indices = vec![0u8; pixels.len() / channels.bytes()];
        indices
            .par_chunks_mut((width * ROWS_PER_TASK).max(1))
            .zip(pixels.par_chunks(row_bytes * ROWS_PER_TASK))
            .for_each(|(out, rows)| {
                for (index, pixel) in out.iter_mut().zip(rows.chunks_exact(channels.bytes())) {
                    // Every colour was collected above
                    *index = lookup.get(&channels.entry(pixel)).copied().unwrap_or(0);
                }
            });

        Some(Self { palette, indices })
    }

    fn has_transparency(&self) -> bool {
        self.palette.iter().any(|entry| entry[3] < 255)
    }
}

/// Distinct colours of a raster, sorted; `None` past the palette limit.
fn distinct_colors(
    pixels: &[u8],
    row_bytes: usize,
    channels: Channels,
) -> Option<Vec<PaletteEntry>> {
    let row_sets: Vec<HashSet<PaletteEntry>> = pixels
        .par_chunks(row_bytes * ROWS_PER_TASK)
        .map(|rows| {
            let mut seen = HashSet::new();
            for pixel in rows.chunks_exact(channels.bytes()) {
                seen.insert(channels.entry(pixel));
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen
        })
        .collect();

    let mut colors = HashSet::with_capacity(MAX_PALETTE_SIZE);
    for set in row_sets {
        colors.extend(set);
        if colors.len() > MAX_PALETTE_SIZE {
            return None;
        }
    }

    let mut palette: Vec<PaletteEntry> = colors.into_iter().collect();
    palette.sort_unstable();
    Some(palette)
}

/// Encode a raster, choosing indexed output when the colours fit a palette.
pub fn create_png_auto(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: Channels,
) -> RadarResult<Vec<u8>> {
    check_len(pixels, width, height, channels)?;

    match IndexedRaster::quantize(pixels, width, channels) {
        Some(indexed) => create_png_indexed(width, height, &indexed.palette, &indexed.indices),
        None => create_png(pixels, width, height, channels),
    }
}

/// Encode an indexed PNG (colour type 3).
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[PaletteEntry],
    indices: &[u8],
) -> RadarResult<Vec<u8>> {
    if indices.len() != width * height {
        return Err(RadarError::EncodeError(format!(
            "{} palette indices for a {}x{} image",
            indices.len(),
            width,
            height
        )));
    }
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RadarError::EncodeError(format!(
            "palette of {} entries",
            palette.len()
        )));
    }

    let indexed = IndexedRaster {
        palette: palette.to_vec(),
        indices: indices.to_vec(),
    };

    let mut png = ChunkWriter::new();
    png.chunk(b"IHDR", &ihdr(width, height, 3));
    let plte: Vec<u8> = palette.iter().flat_map(|e| [e[0], e[1], e[2]]).collect();
    png.chunk(b"PLTE", &plte);
    if indexed.has_transparency() {
        let trns: Vec<u8> = palette.iter().map(|e| e[3]).collect();
        png.chunk(b"tRNS", &trns);
    }
    png.chunk(b"IDAT", &deflate_scanlines(indices, width, height)?);
    Ok(png.finish())
}

/// Encode a truecolour PNG (colour type 2 or 6).
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: Channels,
) -> RadarResult<Vec<u8>> {
    check_len(pixels, width, height, channels)?;

    let mut png = ChunkWriter::new();
    png.chunk(b"IHDR", &ihdr(width, height, channels.color_type()));
    png.chunk(
        b"IDAT",
        &deflate_scanlines(pixels, width * channels.bytes(), height)?,
    );
    Ok(png.finish())
}

fn check_len(pixels: &[u8], width: usize, height: usize, channels: Channels) -> RadarResult<()> {
    let expected = width * height * channels.bytes();
    if pixels.len() != expected {
        return Err(RadarError::EncodeError(format!(
            "pixel buffer has {} bytes, expected {} for {}x{} {:?}",
            pixels.len(),
            expected,
            width,
            height,
            channels
        )));
    }
    Ok(())
}

/// Accumulates length-prefixed, CRC-suffixed chunks after the signature.
struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    fn new() -> Self {
        Self {
            buf: SIGNATURE.to_vec(),
        }
    }

    fn chunk(&mut self, tag: &[u8; 4], data: &[u8]) {
        self.buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(tag);
        self.buf.extend_from_slice(data);

        let mut crc = crc32fast::Hasher::new();
        crc.update(tag);
        crc.update(data);
        self.buf.extend_from_slice(&crc.finalize().to_be_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        self.chunk(b"IEND", &[]);
        self.buf
    }
}

/// 8-bit depth, no interlace.
fn ihdr(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    data[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    data[8] = 8;
    data[9] = color_type;
    data
}

/// Zlib-compress scanlines of `row_bytes` bytes, each behind filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RadarResult<Vec<u8>> {
    let encode_err =
        |e: std::io::Error| RadarError::EncodeError(format!("IDAT compression failed: {}", e));

    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(height * (row_bytes + 1) / 2),
        Compression::fast(),
    );
    for y in 0..height {
        encoder.write_all(&[0]).map_err(encode_err)?;
        encoder
            .write_all(&data[y * row_bytes..(y + 1) * row_bytes])
            .map_err(encode_err)?;
    }
    encoder.finish().map_err(encode_err)
}
