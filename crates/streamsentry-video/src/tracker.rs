// crates/streamsentry-video/src/tracker.rs
//
// Minimal multi-object tracker: matches this frame's raw detections against
// last frame's tracks by IoU and class id, assigning a new monotonic
// track_id to anything unmatched. Track IDs are stable across calls within
// a session and never reused (wrap-around is explicitly out of scope).

use crate::detect::RawDetection;

const MIN_MATCH_IOU: f32 = 0.3;

struct Track {
    class_id: i64,
    bbox: streamsentry_core::geometry::BBox,
    track_id: i64,
}

pub struct Tracker {
    tracks: Vec<Track>,
    next_id: i64,
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
        }
    }

    /// Assigns a `track_id` to each detection, mutating them in place.
    /// Unmatched detections get a fresh id; tracks with no match this frame
    /// are simply dropped (no occlusion memory — good enough for the
    /// dedup use case events are built on).
    pub fn update(&mut self, detections: &mut [RawDetection]) {
        let mut matched_track_indices = vec![false; self.tracks.len()];
        let mut new_tracks = Vec::with_capacity(detections.len());

        for det in detections.iter_mut() {
            let mut best: Option<(usize, f32)> = None;
            for (i, track) in self.tracks.iter().enumerate() {
                if matched_track_indices[i] || track.class_id != det.class_id {
                    continue;
                }
                let iou = track.bbox.iou(&det.bbox);
                if iou >= MIN_MATCH_IOU && best.map(|(_, b)| iou > b).unwrap_or(true) {
                    best = Some((i, iou));
                }
            }

            let track_id = match best {
                Some((i, _)) => {
                    matched_track_indices[i] = true;
                    self.tracks[i].track_id
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    id
                }
            };

            det.track_id = Some(track_id);
            new_tracks.push(Track {
                class_id: det.class_id,
                bbox: det.bbox,
                track_id,
            });
        }

        self.tracks = new_tracks;
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamsentry_core::geometry::BBox;

    fn det(class_id: i64, bbox: BBox) -> RawDetection {
        RawDetection {
            bbox,
            confidence: 0.9,
            class_id,
            track_id: None,
        }
    }

    #[test]
    fn first_sighting_gets_a_fresh_id() {
        let mut tracker = Tracker::new();
        let mut dets = vec![det(3, BBox::new(0, 0, 10, 10))];
        tracker.update(&mut dets);
        assert_eq!(dets[0].track_id, Some(0));
    }

    #[test]
    fn overlapping_box_next_frame_keeps_same_id() {
        let mut tracker = Tracker::new();
        let mut first = vec![det(3, BBox::new(0, 0, 10, 10))];
        tracker.update(&mut first);
        let id = first[0].track_id;

        let mut second = vec![det(3, BBox::new(1, 1, 11, 11))];
        tracker.update(&mut second);
        assert_eq!(second[0].track_id, id);
    }

    #[test]
    fn disjoint_box_gets_a_new_id() {
        let mut tracker = Tracker::new();
        let mut first = vec![det(3, BBox::new(0, 0, 10, 10))];
        tracker.update(&mut first);

        let mut second = vec![det(3, BBox::new(500, 500, 510, 510))];
        tracker.update(&mut second);
        assert_ne!(second[0].track_id, first[0].track_id);
    }

    #[test]
    fn different_class_never_matches() {
        let mut tracker = Tracker::new();
        let mut first = vec![det(3, BBox::new(0, 0, 10, 10))];
        tracker.update(&mut first);

        let mut second = vec![det(5, BBox::new(0, 0, 10, 10))];
        tracker.update(&mut second);
        assert_ne!(second[0].track_id, first[0].track_id);
    }
}
