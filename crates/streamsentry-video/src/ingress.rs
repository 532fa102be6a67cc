// crates/streamsentry-video/src/ingress.rs
//
// C1: hands decoded frames from the source track to the analysis worker
// without ever blocking the source longer than one bounded enqueue.
// Newest-wins on overflow, same policy as a scrub-frame latest-wins slot,
// but as an actual bounded FIFO rather than a single cell — C2
// still wants to see every frame it has time for, not just the newest one.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::frame::VideoFrame;

pub const INGRESS_CAPACITY: usize = 10;

pub struct FrameIngress {
    tx: Sender<VideoFrame>,
    pub rx: Receiver<VideoFrame>,
    pub dropped: std::sync::atomic::AtomicU64,
}

impl FrameIngress {
    pub fn new() -> Self {
        let (tx, rx) = bounded(INGRESS_CAPACITY);
        Self {
            tx,
            rx,
            dropped: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Pushes a frame, dropping the oldest queued frame if full. Never
    /// blocks beyond the cost of one bounded send.
    pub fn push(&self, frame: VideoFrame) {
        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    // Drop the oldest entry and retry with the newest frame.
                    let _ = self.rx.try_recv();
                    self.dropped
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    tracing::debug!("frame ingress full, dropping oldest");
                    frame = returned;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl Default for FrameIngress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rational;

    fn frame(pts: i64) -> VideoFrame {
        VideoFrame::new(1, 1, vec![0; 3], pts, Rational::new(1, 30))
    }

    #[test]
    fn push_under_capacity_keeps_everything() {
        let ingress = FrameIngress::new();
        for i in 0..5 {
            ingress.push(frame(i));
        }
        assert_eq!(ingress.rx.len(), 5);
    }

    #[test]
    fn overflow_drops_oldest_and_keeps_newest() {
        let ingress = FrameIngress::new();
        for i in 0..(INGRESS_CAPACITY as i64 + 3) {
            ingress.push(frame(i));
        }
        assert_eq!(ingress.rx.len(), INGRESS_CAPACITY);
        // The oldest surviving frame should not be pts=0 — it was evicted.
        let first = ingress.rx.recv().unwrap();
        assert!(first.pts > 0);
        assert_eq!(
            ingress.dropped.load(std::sync::atomic::Ordering::Relaxed),
            3
        );
    }
}
