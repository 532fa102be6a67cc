// crates/streamsentry-audio/src/queue.rs
//
// Bounded handoff from the windowing side of C5 to the transcription
// worker. Same newest-wins overflow policy as streamsentry-video's
// FrameIngress, sized for the slower cadence of 3.0s windows rather than
// per-frame traffic.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::window::AudioWindow;

pub const WINDOW_QUEUE_CAPACITY: usize = 30;

pub struct WindowQueue {
    tx: Sender<AudioWindow>,
    pub rx: Receiver<AudioWindow>,
    pub dropped: std::sync::atomic::AtomicU64,
}

impl WindowQueue {
    pub fn new() -> Self {
        let (tx, rx) = bounded(WINDOW_QUEUE_CAPACITY);
        Self {
            tx,
            rx,
            dropped: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Pushes a completed window, dropping the oldest queued window if
    /// full. Never blocks beyond the cost of one bounded send.
    pub fn push(&self, window: AudioWindow) {
        let mut window = window;
        loop {
            match self.tx.try_send(window) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    let _ = self.rx.try_recv();
                    self.dropped
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    tracing::debug!("audio window queue full, dropping oldest");
                    window = returned;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl Default for WindowQueue {
    fn default() -> Self {
        Self::new()
    }
}
