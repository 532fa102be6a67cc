// crates/streamsentry-video/src/stride.rs
//
// Adaptive detection cadence: how often C2 actually calls the detector,
// versus how often it just reuses the last result. Driven by the motion
// EMA with hysteresis so stride doesn't chatter frame to frame.

const STRIDE_MIN: u32 = 1;
const STRIDE_MAX: u32 = 10;
const STRIDE_INITIAL: u32 = 3;
const COOLDOWN_FRAMES: u32 = 5;
const EMA_HIGH: f32 = 0.05;
const EMA_LOW: f32 = 0.01;
const MOTION_TRIGGER_THRESHOLD: f32 = 0.02;
const BURST_FRAMES: u32 = 3;

pub struct StrideController {
    pub stride: u32,
    pub max_skip: u32,
    frames_since_stride_change: u32,
    since_det: u32,
    burst_remaining: u32,
    prev_motion_trigger: bool,
}

/// What the worker should do this frame, and the updated gating state.
pub struct GateDecision {
    pub run_detection: bool,
    pub motion_trigger: bool,
}

impl StrideController {
    pub fn new() -> Self {
        let stride = STRIDE_INITIAL;
        Self {
            stride,
            max_skip: recompute_max_skip(stride),
            frames_since_stride_change: COOLDOWN_FRAMES,
            // since_det starts equal to stride so the very first frame is
            // eligible for detection (window_ok holds immediately).
            since_det: stride,
            burst_remaining: 0,
            prev_motion_trigger: false,
        }
    }

    /// Feed this frame's raw motion ratio and EMA; returns whether the
    /// detector should run and what the motion trigger state was.
    pub fn step(&mut self, motion_ratio: f32, ema: f32) -> GateDecision {
        self.adjust_stride(ema);

        let motion_trigger = motion_ratio >= MOTION_TRIGGER_THRESHOLD;
        if motion_trigger && !self.prev_motion_trigger {
            self.burst_remaining = BURST_FRAMES;
        }
        self.prev_motion_trigger = motion_trigger;

        let in_burst = self.burst_remaining > 0;
        let window_ok = self.since_det >= if motion_trigger { 1 } else { self.stride };
        let safety_due = self.since_det >= self.max_skip;

        let run_detection = (motion_trigger && window_ok) || in_burst || safety_due;

        if run_detection {
            if in_burst {
                self.burst_remaining -= 1;
            }
            self.since_det = 0;
        } else {
            self.since_det += 1;
        }

        GateDecision {
            run_detection,
            motion_trigger,
        }
    }

    fn adjust_stride(&mut self, ema: f32) {
        if self.frames_since_stride_change < COOLDOWN_FRAMES {
            self.frames_since_stride_change += 1;
            return;
        }

        let changed = if ema >= EMA_HIGH {
            let before = self.stride;
            self.stride = (self.stride.saturating_sub(1)).max(STRIDE_MIN);
            self.stride != before
        } else if ema <= EMA_LOW {
            let before = self.stride;
            self.stride = (self.stride + 1).min(STRIDE_MAX);
            self.stride != before
        } else {
            false
        };

        if changed {
            self.max_skip = recompute_max_skip(self.stride);
            self.frames_since_stride_change = 0;
        } else {
            self.frames_since_stride_change += 1;
        }
    }
}

impl Default for StrideController {
    fn default() -> Self {
        Self::new()
    }
}

fn recompute_max_skip(stride: u32) -> u32 {
    (stride * 2).max((stride * 5).min(STRIDE_MAX * 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_stays_in_bounds() {
        let mut ctrl = StrideController::new();
        for _ in 0..500 {
            ctrl.step(0.0, 0.0);
            assert!(ctrl.stride >= STRIDE_MIN && ctrl.stride <= STRIDE_MAX);
        }
    }

    #[test]
    fn first_frame_is_eligible_for_detection() {
        let mut ctrl = StrideController::new();
        let decision = ctrl.step(1.0, 0.3);
        assert!(decision.run_detection);
    }

    #[test]
    fn motion_onset_arms_a_burst() {
        let mut ctrl = StrideController::new();
        // Quiet first, to clear since_det without triggering on frame 1.
        ctrl.step(0.0, 0.0);
        // Onset of motion: burst should force detection for several frames.
        let mut detections = 0;
        for _ in 0..3 {
            let d = ctrl.step(1.0, 0.3);
            if d.run_detection {
                detections += 1;
            }
        }
        assert!(detections >= 3);
    }

    #[test]
    fn stride_changes_are_separated_by_cooldown() {
        let mut ctrl = StrideController::new();
        let mut last_change_frame = 0i64;
        let mut frame = 0i64;
        let mut last_stride = ctrl.stride;
        for _ in 0..100 {
            ctrl.step(0.0, 0.0); // low ema -> stride tends to increase
            if ctrl.stride != last_stride {
                assert!(frame - last_change_frame >= COOLDOWN_FRAMES as i64);
                last_change_frame = frame;
                last_stride = ctrl.stride;
            }
            frame += 1;
        }
    }
}
