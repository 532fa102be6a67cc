// crates/streamsentry-audio/src/worker.rs
//
// AudioAnalysisWorker: windowing happens inline on the caller's thread
// (samples arrive and get accumulated the same way frames get pushed into
// FrameIngress); a single dedicated OS thread dequeues completed windows,
// normalizes/resamples, transcribes, and scans the result against the
// session's lexicon and policy. Same block-with-timeout shape as
// streamsentry-video's worker, so shutdown is prompt without polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use streamsentry_core::event::{Event, EventSink};
use streamsentry_core::policy::PolicySnapshot;

use crate::lexicon::Lexicon;
use crate::normalize::{normalize_peak, resample, to_float32};
use crate::queue::WindowQueue;
use crate::transcribe::Transcriber;
use crate::window::WindowAccumulator;

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared, swappable policy handle — same atomic no-torn-read shape as
/// streamsentry-video's `PolicyHandle`, defined again here rather than
/// shared across crates so each crate's worker stays self-contained.
pub type PolicyHandle = Arc<Mutex<Arc<PolicySnapshot>>>;

pub fn new_policy_handle(initial: PolicySnapshot) -> PolicyHandle {
    Arc::new(Mutex::new(Arc::new(initial)))
}

pub struct AudioAnalysisWorker {
    queue: Arc<WindowQueue>,
    accumulator: Mutex<WindowAccumulator>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AudioAnalysisWorker {
    pub fn spawn(
        policy: PolicyHandle,
        transcriber: Box<dyn Transcriber>,
        lexicon: Arc<Lexicon>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let queue = Arc::new(WindowQueue::new());
        let worker_queue = Arc::clone(&queue);
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            run(worker_queue, policy, transcriber, lexicon, sink, worker_shutdown);
        });

        Self {
            queue,
            accumulator: Mutex::new(WindowAccumulator::new()),
            shutdown,
            handle: Some(handle),
        }
    }

    /// Feeds a chunk of PCM samples into the windowing accumulator. Called
    /// from whatever executor owns the source audio track — mirrors
    /// `FrameIngress::push` in not requiring its own thread.
    pub fn push_samples(&self, samples: &[i16], channels: u16, sample_rate: u32, now: Instant) {
        let mut acc = self.accumulator.lock().unwrap();
        if let Some(window) = acc.push(samples, channels, sample_rate, now) {
            self.queue.push(window);
        }
    }

    /// Signals the worker to stop and waits (up to 2s) for it to join.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    queue: Arc<WindowQueue>,
    policy: PolicyHandle,
    mut transcriber: Box<dyn Transcriber>,
    lexicon: Arc<Lexicon>,
    sink: Arc<dyn EventSink>,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let window = match queue.rx.recv_timeout(RECV_TIMEOUT) {
            Ok(w) => w,
            Err(_) => continue, // timeout or disconnect: re-check shutdown
        };

        let snapshot = { Arc::clone(&*policy.lock().unwrap()) };

        let normalized = normalize_peak(&window.samples);
        let resampled = resample(&normalized, window.sample_rate);
        let floats = to_float32(&resampled);

        let transcript = transcriber.transcribe(&floats, crate::normalize::TARGET_SAMPLE_RATE);
        if transcript.is_empty() {
            continue;
        }

        if let Some((category, detail)) = lexicon.scan(
            &transcript,
            snapshot.audio_profanity_level,
            &snapshot.banned_words,
        ) {
            tracing::info!(category = %category, "voice moderation event");
            sink.emit(Event::voice(category, detail));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use streamsentry_core::event::CollectingSink;

    struct ScriptedTranscriber {
        script: Vec<String>,
    }

    impl Transcriber for ScriptedTranscriber {
        fn transcribe(&mut self, _samples: &[f32], _sample_rate: u32) -> String {
            if self.script.is_empty() {
                String::new()
            } else {
                self.script.remove(0)
            }
        }
    }

    fn lexicon_with(high: &[&str]) -> Lexicon {
        Lexicon::from_buckets(HashMap::from([(
            "high",
            high.iter().map(|s| s.to_string()).collect(),
        )]))
    }

    #[test]
    fn matched_transcript_emits_one_voice_event() {
        let policy = new_policy_handle(PolicySnapshot::empty());
        let sink = Arc::new(CollectingSink::new());
        let lexicon = Arc::new(lexicon_with(&["나쁜말"]));
        let transcriber = Box::new(ScriptedTranscriber {
            script: vec!["이건 나쁜말 입니다".to_string()],
        });

        let worker = AudioAnalysisWorker::spawn(policy, transcriber, lexicon, sink.clone());
        let now = Instant::now();
        worker.push_samples(&vec![0i16; 16_000 * 3], 1, 16_000, now);
        worker.push_samples(&[], 1, 16_000, now + Duration::from_millis(3_000));
        thread::sleep(Duration::from_millis(100));
        worker.stop();

        let events = sink.events();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn empty_transcript_emits_nothing() {
        let policy = new_policy_handle(PolicySnapshot::empty());
        let sink = Arc::new(CollectingSink::new());
        let lexicon = Arc::new(lexicon_with(&["나쁜말"]));
        let transcriber = Box::new(ScriptedTranscriber { script: vec![] });

        let worker = AudioAnalysisWorker::spawn(policy, transcriber, lexicon, sink.clone());
        let now = Instant::now();
        worker.push_samples(&vec![0i16; 16_000 * 3], 1, 16_000, now);
        worker.push_samples(&[], 1, 16_000, now + Duration::from_millis(3_000));
        thread::sleep(Duration::from_millis(100));
        worker.stop();

        assert!(sink.events().is_empty());
    }
}
