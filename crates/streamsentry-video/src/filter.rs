// crates/streamsentry-video/src/filter.rs
//
// Per-frame detection filter: class gate from policy, plus
// independent confidence/area bounds. The bounds default wide open so a
// session only ever narrows behavior through the category gate; they exist
// as general-purpose filter state, exercised directly in tests.

use std::collections::HashSet;

use crate::detect::RawDetection;

pub struct DetectionFilter {
    pub enabled_classes: HashSet<i64>,
    pub use_class_filter: bool,
    pub min_confidence: f32,
    pub max_confidence: f32,
    pub min_area: i64,
    pub max_area: i64,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            enabled_classes: HashSet::new(),
            use_class_filter: true,
            min_confidence: 0.0,
            max_confidence: 1.0,
            min_area: 0,
            max_area: i64::MAX,
        }
    }
}

impl DetectionFilter {
    pub fn set_class_filter(&mut self, class_ids: impl IntoIterator<Item = i64>) {
        self.enabled_classes = class_ids.into_iter().collect();
    }

    pub fn set_confidence_range(&mut self, min: f32, max: f32) {
        self.min_confidence = min.max(0.0);
        self.max_confidence = max.min(1.0);
    }

    pub fn set_area_range(&mut self, min: i64, max: i64) {
        self.min_area = min.max(0);
        self.max_area = max;
    }

    /// Returns the detections that pass. If the class filter is enabled and
    /// the allowed set is empty, nothing passes — a deliberate fail-closed
    /// default on session start before any category has been set.
    pub fn apply(&self, detections: &[RawDetection]) -> Vec<RawDetection> {
        if self.use_class_filter && self.enabled_classes.is_empty() {
            return Vec::new();
        }

        detections
            .iter()
            .filter(|d| {
                if self.use_class_filter && !self.enabled_classes.contains(&d.class_id) {
                    return false;
                }
                if d.confidence < self.min_confidence || d.confidence > self.max_confidence {
                    return false;
                }
                let area = d.bbox.area();
                area >= self.min_area && area <= self.max_area
            })
            .cloned()
            .collect()
    }
}
