// crates/streamsentry-audio/src/window.rs
//
// C5 windowing: accumulate PCM into fixed, non-overlapping 3.0s windows
// aligned to exact multiples of the window duration from the first sample.

use std::time::{Duration, Instant};

pub const WINDOW_DURATION: Duration = Duration::from_millis(3_000);

#[derive(Debug, Clone)]
pub struct AudioWindow {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub start_wallclock: Instant,
}

pub struct WindowAccumulator {
    buffer: Vec<i16>,
    sample_rate: Option<u32>,
    window_start: Option<Instant>,
}

impl WindowAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            sample_rate: None,
            window_start: None,
        }
    }

    /// Feeds a chunk of PCM samples, already possibly multi-channel.
    /// `channels` forces mono by averaging when `> 1`, matching the
    /// reference processor's stereo→mono step. Returns a completed window
    /// if enough wallclock time has elapsed since the window began.
    pub fn push(&mut self, samples: &[i16], channels: u16, sample_rate: u32, now: Instant) -> Option<AudioWindow> {
        let mono: Vec<i16> = if channels > 1 {
            samples
                .chunks(channels as usize)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        } else {
            samples.to_vec()
        };

        if self.window_start.is_none() {
            self.window_start = Some(now);
            self.sample_rate = Some(sample_rate);
        }

        self.buffer.extend_from_slice(&mono);

        let start = self.window_start.unwrap();
        if now.duration_since(start) >= WINDOW_DURATION {
            let sr = self.sample_rate.unwrap();
            let window_len = (sr as f64 * WINDOW_DURATION.as_secs_f64()) as usize;
            let taken = window_len.min(self.buffer.len());
            let samples = self.buffer[..taken].to_vec();
            // No overlap: everything else in the buffer is discarded, not
            // carried forward — the next window starts empty.
            self.buffer.clear();
            self.window_start = Some(start + WINDOW_DURATION);

            Some(AudioWindow {
                samples,
                sample_rate: sr,
                start_wallclock: start,
            })
        } else {
            None
        }
    }
}

impl Default for WindowAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
