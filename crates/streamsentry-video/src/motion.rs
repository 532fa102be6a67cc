// crates/streamsentry-video/src/motion.rs
//
// Cheap per-frame motion estimate: downscale to 160x90 grayscale, threshold
// the inter-frame difference, and smooth the resulting ratio with an EMA.
// This is what gates the expensive detector call in worker.rs.

use crate::frame::VideoFrame;

const DOWNSCALE_W: usize = 160;
const DOWNSCALE_H: usize = 90;
const DIFF_THRESHOLD: i16 = 20;
const EMA_ALPHA: f32 = 0.3;

/// Nearest-neighbor downscale to `DOWNSCALE_W`x`DOWNSCALE_H` grayscale,
/// averaging the RGB triplet into a single luma byte per pixel.
fn downscale_gray(frame: &VideoFrame) -> Vec<u8> {
    let (w, h) = (frame.width as usize, frame.height as usize);
    let mut out = vec![0u8; DOWNSCALE_W * DOWNSCALE_H];
    for dy in 0..DOWNSCALE_H {
        let sy = (dy * h) / DOWNSCALE_H;
        for dx in 0..DOWNSCALE_W {
            let sx = (dx * w) / DOWNSCALE_W;
            let idx = (sy * w + sx) * 3;
            let (r, g, b) = (
                frame.data[idx] as u32,
                frame.data[idx + 1] as u32,
                frame.data[idx + 2] as u32,
            );
            out[dy * DOWNSCALE_W + dx] = ((r + g + b) / 3) as u8;
        }
    }
    out
}

/// Tracks the previous downscaled frame and the smoothed motion ratio.
pub struct MotionEstimator {
    previous: Option<Vec<u8>>,
    pub ema: f32,
}

impl MotionEstimator {
    pub fn new() -> Self {
        Self {
            previous: None,
            ema: 0.0,
        }
    }

    /// Returns the raw `motion_ratio` for this frame and updates the EMA and
    /// cached reference frame as a side effect. The first call always
    /// returns 1.0 — there is nothing to diff against yet, so the first
    /// frame always forces detection.
    pub fn observe(&mut self, frame: &VideoFrame) -> f32 {
        let current = downscale_gray(frame);

        let motion_ratio = match &self.previous {
            None => 1.0,
            Some(prev) => {
                let above = current
                    .iter()
                    .zip(prev.iter())
                    .filter(|(&c, &p)| (c as i16 - p as i16).abs() > DIFF_THRESHOLD)
                    .count();
                above as f32 / (DOWNSCALE_W * DOWNSCALE_H) as f32
            }
        };

        self.previous = Some(current);
        self.ema = EMA_ALPHA * motion_ratio + (1.0 - EMA_ALPHA) * self.ema;
        motion_ratio
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rational;

    fn solid_frame(w: u32, h: u32, value: u8) -> VideoFrame {
        VideoFrame::new(
            w,
            h,
            vec![value; 3 * w as usize * h as usize],
            0,
            Rational::new(1, 30),
        )
    }

    #[test]
    fn first_frame_forces_full_motion() {
        let mut est = MotionEstimator::new();
        let ratio = est.observe(&solid_frame(320, 180, 50));
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn identical_frames_report_zero_motion() {
        let mut est = MotionEstimator::new();
        est.observe(&solid_frame(320, 180, 50));
        let ratio = est.observe(&solid_frame(320, 180, 50));
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn large_intensity_change_reports_full_motion() {
        let mut est = MotionEstimator::new();
        est.observe(&solid_frame(320, 180, 0));
        let ratio = est.observe(&solid_frame(320, 180, 255));
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn ema_smooths_toward_observed_ratio() {
        let mut est = MotionEstimator::new();
        est.observe(&solid_frame(320, 180, 0)); // ratio 1.0, ema -> 0.3
        assert!((est.ema - 0.3).abs() < 1e-6);
        est.observe(&solid_frame(320, 180, 0)); // identical, ratio 0.0, ema -> 0.21
        assert!((est.ema - 0.21).abs() < 1e-6);
    }
}
