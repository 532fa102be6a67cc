// crates/streamsentry-video/src/egress.rs
//
// C4: pulls processed frames out on the original presentation timeline.
// `now` is passed in rather than read from the system clock so the pacing
// state machine can be driven deterministically in tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::frame::{Rational, VideoFrame};

pub const EGRESS_CAPACITY: usize = 120;
const RATE_CAP: Duration = Duration::from_nanos(1_000_000_000 / 30);
const EARLY_TOLERANCE: Duration = Duration::from_micros(500);

pub struct EgressBuffer {
    tx: Sender<VideoFrame>,
    rx: Receiver<VideoFrame>,
    pub dropped: std::sync::atomic::AtomicU64,
}

impl EgressBuffer {
    pub fn new() -> Self {
        let (tx, rx) = bounded(EGRESS_CAPACITY);
        Self {
            tx,
            rx,
            dropped: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Newest-wins enqueue, same overflow policy as ingress.
    pub fn push(&self, frame: VideoFrame) {
        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    let _ = self.rx.try_recv();
                    self.dropped
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    tracing::debug!("egress buffer full, dropping oldest");
                    frame = returned;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl Default for EgressBuffer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EgressPacer {
    buffer: Arc<EgressBuffer>,
    playout_start_pts: Option<i64>,
    playout_start_time: Option<Instant>,
    pending: Option<VideoFrame>,
    last_released: Option<VideoFrame>,
    last_release_at: Option<Instant>,
}

impl EgressPacer {
    /// Takes a shared handle rather than owning the buffer outright — the
    /// video analysis worker pushes onto the same buffer from its own
    /// thread while the pacer pulls from whatever thread drives egress.
    pub fn new(buffer: Arc<EgressBuffer>) -> Self {
        Self {
            buffer,
            playout_start_pts: None,
            playout_start_time: None,
            pending: None,
            last_released: None,
            last_release_at: None,
        }
    }

    pub fn enqueue(&self, frame: VideoFrame) {
        self.buffer.push(frame);
    }

    /// Returns the next frame to forward downstream, or `None` if nothing
    /// has ever been released (no processed frame has arrived yet).
    ///
    /// `source_hint` is the most recent `(pts, time_base)` seen at ingress,
    /// used only for the starvation fallback so the downstream clock
    /// advances even while the egress buffer is empty.
    pub fn pull(&mut self, now: Instant, source_hint: Option<(i64, Rational)>) -> Option<VideoFrame> {
        if let Some(last_at) = self.last_release_at {
            if now.duration_since(last_at) < RATE_CAP {
                return self.last_released.clone();
            }
        }

        let candidate = self.pending.take().or_else(|| self.buffer.rx.try_recv().ok());

        let frame = match candidate {
            Some(frame) => frame,
            None => return self.starvation_fallback(source_hint),
        };

        if self.playout_start_pts.is_none() {
            self.playout_start_pts = Some(frame.pts);
            self.playout_start_time = Some(now);
        }

        let start_pts = self.playout_start_pts.unwrap();
        let start_time = self.playout_start_time.unwrap();
        let offset_secs = (frame.pts - start_pts) as f64 * frame.time_base.as_secs_per_tick();
        let target = start_time + Duration::from_secs_f64(offset_secs.max(0.0));

        if now + EARLY_TOLERANCE < target {
            self.pending = Some(frame);
            self.last_release_at = Some(now);
            self.last_released.clone()
        } else {
            self.last_release_at = Some(now);
            self.last_released = Some(frame.clone());
            Some(frame)
        }
    }

    fn starvation_fallback(&mut self, source_hint: Option<(i64, Rational)>) -> Option<VideoFrame> {
        let last = self.last_released.as_ref()?;
        let cloned = match source_hint {
            Some((pts, tb)) => last.retimed(pts, tb),
            None => last.clone(),
        };
        Some(cloned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pts: i64) -> VideoFrame {
        VideoFrame::new(1, 1, vec![0, 0, 0], pts, Rational::new(1, 90_000))
    }

    #[test]
    fn first_pull_initializes_playout_origin_and_releases() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        let now = Instant::now();
        pacer.enqueue(frame(0));
        let out = pacer.pull(now, None).unwrap();
        assert_eq!(out.pts, 0);
    }

    #[test]
    fn rate_cap_returns_last_released_within_window() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        let now = Instant::now();
        pacer.enqueue(frame(0));
        pacer.pull(now, None);
        pacer.enqueue(frame(100));
        // Immediately pulling again, well within 1/30s, must not advance.
        let out = pacer.pull(now + Duration::from_micros(10), None).unwrap();
        assert_eq!(out.pts, 0);
    }

    #[test]
    fn early_frame_is_stashed_and_prior_frame_repeats() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        let now = Instant::now();
        pacer.enqueue(frame(0));
        pacer.pull(now, None);

        // A frame far in the future (well beyond rate cap) is not yet due.
        pacer.enqueue(frame(90_000 * 10)); // +10s of pts
        let out = pacer
            .pull(now + Duration::from_millis(40), None)
            .unwrap();
        assert_eq!(out.pts, 0, "future frame should stash, not release early");
    }

    #[test]
    fn starvation_returns_last_released_frame() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        let now = Instant::now();
        pacer.enqueue(frame(0));
        pacer.pull(now, None);

        let out = pacer
            .pull(now + Duration::from_millis(100), None)
            .unwrap();
        assert_eq!(out.pts, 0);
    }

    #[test]
    fn starvation_with_hint_retimes_the_clone() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        let now = Instant::now();
        pacer.enqueue(frame(0));
        pacer.pull(now, None);

        let out = pacer
            .pull(
                now + Duration::from_millis(100),
                Some((42, Rational::new(1, 90_000))),
            )
            .unwrap();
        assert_eq!(out.pts, 42);
    }

    #[test]
    fn pull_before_any_frame_returns_none() {
        let mut pacer = EgressPacer::new(Arc::new(EgressBuffer::new()));
        assert!(pacer.pull(Instant::now(), None).is_none());
    }
}
