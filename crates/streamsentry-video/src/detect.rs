// crates/streamsentry-video/src/detect.rs
//
// The detector capability (C3). Modeled as a trait with a tagged null
// implementation rather than an Option<Detector> — "model missing" is a
// first-class value a session can hold, not an error threaded through
// every call site.

use streamsentry_core::geometry::BBox;

use crate::frame::VideoFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub bbox: BBox,
    pub confidence: f32,
    pub class_id: i64,
    /// Populated by the tracker, not the raw detector call.
    pub track_id: Option<i64>,
}

impl RawDetection {
    pub fn center(&self) -> (i32, i32) {
        self.bbox.center()
    }
}

/// Given an image, return detections with bounding boxes and class ids.
/// Track-id assignment is layered on top by `tracker::Tracker`, not by the
/// detector itself — a real backend only needs to answer "what, and where".
pub trait Detector: Send {
    fn detect(&mut self, frame: &VideoFrame) -> Vec<RawDetection>;
}

/// The "model missing" backend: always returns no detections. Used when
/// the configured model path is absent or fails to load, and in tests.
#[derive(Debug, Default)]
pub struct NullDetector;

impl Detector for NullDetector {
    fn detect(&mut self, _frame: &VideoFrame) -> Vec<RawDetection> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_detector_returns_nothing() {
        let mut d = NullDetector;
        let frame = crate::frame::VideoFrame::new(
            4,
            4,
            vec![0; 48],
            0,
            crate::frame::Rational::new(1, 30),
        );
        assert!(d.detect(&frame).is_empty());
    }
}
