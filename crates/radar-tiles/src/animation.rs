//! Fade-in GIF animations.
//!
//! Frames are rendered by a caller-supplied closure from an `alpha` that rises
//! linearly from 0 on the first frame to 1 on the last one.

use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use radar_common::{RadarError, RadarResult};
use tracing::info;

use crate::io::write_atomic;

/// Clip timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    /// Clip length in seconds.
    pub duration: f32,
    pub fps: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: 3.0,
            fps: 5,
        }
    }
}

impl AnimationSettings {
    fn validate(&self) -> RadarResult<()> {
        if self.fps == 0 {
            return Err(RadarError::InvalidParameter {
                param: "fps".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.duration.is_nan() || self.duration <= 1.0 / self.fps as f32 {
            return Err(RadarError::InvalidParameter {
                param: "duration".to_string(),
                message: format!("{}s is shorter than two frames", self.duration),
            });
        }
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        (self.duration * self.fps as f32).round() as usize
    }

    /// Alpha for each frame: `t / (duration - 1 / fps)`, capped at 1.
    pub fn frame_alphas(&self) -> Vec<f32> {
        let fps = self.fps as f32;
        let span = self.duration - 1.0 / fps;
        (0..self.frame_count())
            .map(|i| (i as f32 / fps / span).min(1.0))
            .collect()
    }
}

/// Render every frame with `render(alpha)` and write a looping GIF.
pub fn build_animation<F>(mut render: F, settings: AnimationSettings, path: &Path) -> RadarResult<()>
where
    F: FnMut(f32) -> RadarResult<RgbImage>,
{
    settings.validate()?;

    let delay = Delay::from_numer_denom_ms(1000, settings.fps);
    let frames = settings
        .frame_alphas()
        .into_iter()
        .map(|alpha| {
            let image = render(alpha)?;
            let rgba = DynamicImage::ImageRgb8(image).into_rgba8();
            Ok(Frame::from_parts(rgba, 0, 0, delay))
        })
        .collect::<RadarResult<Vec<Frame>>>()?;

    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| RadarError::EncodeError(e.to_string()))?;
        encoder
            .encode_frames(frames)
            .map_err(|e| RadarError::EncodeError(e.to_string()))?;
    }

    write_atomic(path, &buffer)?;
    info!(
        path = %path.display(),
        frames = settings.frame_count(),
        fps = settings.fps,
        "Wrote animation"
    );
    Ok(())
}
