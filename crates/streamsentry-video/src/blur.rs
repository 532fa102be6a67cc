// crates/streamsentry-video/src/blur.rs
//
// Region redaction: box blur over each surviving detection's bbox, plus
// the sampling cache that amortizes the cost across static frames, plus
// the final resize to the fixed egress resolution.

use streamsentry_core::geometry::BBox;

use crate::detect::RawDetection;

pub const KERNEL_SIZE: u32 = 35;
pub const BLUR_SAMPLE_STATIC_N: u32 = 5;
pub const EGRESS_WIDTH: u32 = 1280;
pub const EGRESS_HEIGHT: u32 = 720;

fn odd(k: u32) -> u32 {
    if k % 2 == 0 {
        k + 1
    } else {
        k
    }
}

/// Box (mean) blur of `rgb` (packed 8-bit RGB, `width`x`height`) in place,
/// restricted to `region`. Chosen over Gaussian for cost; redaction doesn't
/// need a perceptually nicer falloff.
pub fn box_blur_region(rgb: &mut [u8], width: u32, height: u32, region: BBox) {
    let Some(region) = region.clamp_to(width as i32, height as i32) else {
        return;
    };
    let k = odd(KERNEL_SIZE) as i32;
    let radius = k / 2;
    let w = width as i32;

    let src = rgb.to_vec();
    let sample = |x: i32, y: i32, ch: usize| -> u32 {
        let xc = x.clamp(region.x1, region.x2 - 1);
        let yc = y.clamp(region.y1, region.y2 - 1);
        src[((yc * w + xc) * 3 + ch as i32) as usize] as u32
    };

    for y in region.y1..region.y2 {
        for x in region.x1..region.x2 {
            for ch in 0..3usize {
                let mut sum: u32 = 0;
                let mut count: u32 = 0;
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        sum += sample(x + dx, y + dy, ch);
                        count += 1;
                    }
                }
                let idx = ((y * w + x) * 3 + ch as i32) as usize;
                rgb[idx] = (sum / count) as u8;
            }
        }
    }
}

/// Nearest-neighbor resize of a packed RGB buffer. Matches the downscale
/// approach used elsewhere in the pipeline (motion estimation) rather than
/// pulling in a general-purpose image resampling dependency for a redaction
/// pass that already throws away detail.
pub fn resize_rgb(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let mut out = vec![0u8; 3 * dst_w as usize * dst_h as usize];
    for dy in 0..dst_h as usize {
        let sy = (dy * src_h as usize) / dst_h as usize;
        for dx in 0..dst_w as usize {
            let sx = (dx * src_w as usize) / dst_w as usize;
            let src_idx = (sy * src_w as usize + sx) * 3;
            let dst_idx = (dy * dst_w as usize + dx) * 3;
            out[dst_idx..dst_idx + 3].copy_from_slice(&src[src_idx..src_idx + 3]);
        }
    }
    out
}

/// Applies box blur to every surviving detection's region, in place.
pub fn blur_detections(rgb: &mut [u8], width: u32, height: u32, detections: &[RawDetection]) {
    for det in detections {
        box_blur_region(rgb, width, height, det.bbox);
    }
}

/// Tracks the sampling cache described below: a fresh blur is only
/// rendered when motion is active or the static sampling interval elapses;
/// otherwise the cached blurred frame is reused.
pub struct BlurSampler {
    frames_since_blur: u32,
    cached: Option<Vec<u8>>,
}

impl BlurSampler {
    pub fn new() -> Self {
        Self {
            frames_since_blur: 0,
            cached: None,
        }
    }

    /// Decides whether to render a fresh blur this frame, given whether
    /// motion is currently triggering and whether there are any detections
    /// to redact at all. `render` is called lazily only when a fresh
    /// render is actually needed.
    ///
    /// The sampling counter only advances during static (non-motion)
    /// frames — while motion is active every frame is rendered fresh and
    /// the counter is left untouched, so it resumes where it left off once
    /// motion settles back down.
    pub fn frame(
        &mut self,
        motion_trigger: bool,
        has_detections: bool,
        mut render: impl FnMut() -> Vec<u8>,
    ) -> Option<Vec<u8>> {
        if !has_detections {
            return None;
        }

        if motion_trigger || self.cached.is_none() {
            let rendered = render();
            self.cached = Some(rendered.clone());
            return Some(rendered);
        }

        self.frames_since_blur += 1;
        if self.frames_since_blur >= BLUR_SAMPLE_STATIC_N {
            let rendered = render();
            self.cached = Some(rendered.clone());
            self.frames_since_blur = 0;
            Some(rendered)
        } else {
            self.cached.clone()
        }
    }
}

impl Default for BlurSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_preserves_dimensions() {
        let src = vec![1u8; 3 * 4 * 4];
        let out = resize_rgb(&src, 4, 4, 2, 2);
        assert_eq!(out.len(), 3 * 2 * 2);
    }

    #[test]
    fn box_blur_flattens_a_checkerboard_region() {
        let w = 4u32;
        let h = 4u32;
        let mut rgb = vec![0u8; 3 * (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                let idx = ((y * w + x) * 3) as usize;
                rgb[idx] = v as u8;
                rgb[idx + 1] = v as u8;
                rgb[idx + 2] = v as u8;
            }
        }
        box_blur_region(&mut rgb, w, h, BBox::new(0, 0, 4, 4));
        // After a full-region box blur the checkerboard should average out
        // toward mid-gray rather than staying pure black/white.
        assert!(rgb.iter().all(|&v| v > 0 && v < 255));
    }

    #[test]
    fn sampler_renders_once_when_no_detections() {
        let mut sampler = BlurSampler::new();
        let result = sampler.frame(false, false, || vec![9]);
        assert!(result.is_none());
    }

    #[test]
    fn sampler_caches_during_static_interval() {
        let mut sampler = BlurSampler::new();
        let mut render_calls = 0;
        for _ in 0..BLUR_SAMPLE_STATIC_N {
            sampler.frame(false, true, || {
                render_calls += 1;
                vec![render_calls as u8]
            });
        }
        // First call seeds the cache; the sampling interval forces exactly
        // one more fresh render by the Nth frame.
        assert!(render_calls >= 1 && render_calls <= 2);
    }

    #[test]
    fn sampler_always_renders_fresh_under_motion() {
        let mut sampler = BlurSampler::new();
        let mut render_calls = 0;
        for _ in 0..3 {
            sampler.frame(true, true, || {
                render_calls += 1;
                vec![render_calls as u8]
            });
        }
        assert_eq!(render_calls, 3);
    }
}
