// crates/streamsentry-relay/src/session.rs
//
// Session: wires C1 (ingress) + C2 (video worker) + C4 (egress pacer) +
// C5 (audio worker) together behind the control API a session registry
// drives (bind/update_policy/unbind). The session owns its workers and
// queues; the side channel is held only as a shared capability (EventSink),
// never a back-reference into the session itself.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use streamsentry_core::event::EventSink;
use streamsentry_core::policy::PolicySnapshot;
use streamsentry_core::stats::ProcessingStats;
use streamsentry_video::{
    new_policy_handle, Detector, EgressBuffer, EgressPacer, FrameIngress, PolicyHandle, Rational,
    VideoAnalysisWorker, VideoFrame,
};

use streamsentry_audio::worker::AudioAnalysisWorker;
use streamsentry_audio::{Lexicon, Transcriber};

/// A bound session: one per live broadcaster connection. Dropping this
/// without calling `unbind` leaks the worker threads (they block on a
/// 1-second recv timeout forever) — always route teardown through
/// `unbind`.
pub struct Session {
    id: String,
    ingress: Arc<FrameIngress>,
    pacer: Mutex<EgressPacer>,
    policy: PolicyHandle,
    stats: Arc<Mutex<ProcessingStats>>,
    video_worker: Option<VideoAnalysisWorker>,
    audio_worker: Option<AudioAnalysisWorker>,
}

impl Session {
    /// `bind(session_id)`: initializes policy to an empty snapshot
    /// (categories all false; blur off; profanity unset; banned empty)
    /// and spawns the per-session workers.
    pub fn bind(
        id: impl Into<String>,
        detector: Box<dyn Detector>,
        transcriber: Box<dyn Transcriber>,
        lexicon: Arc<Lexicon>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let id = id.into();
        let _span = tracing::info_span!("session", session_id = %id).entered();
        tracing::info!("session bound");

        let ingress = Arc::new(FrameIngress::new());
        let egress_buffer = Arc::new(EgressBuffer::new());
        let policy = new_policy_handle(PolicySnapshot::empty());
        let stats = Arc::new(Mutex::new(ProcessingStats::default()));

        let video_worker = VideoAnalysisWorker::spawn(
            Arc::clone(&ingress),
            Arc::clone(&egress_buffer),
            Arc::clone(&policy),
            detector,
            Arc::clone(&sink),
            Arc::clone(&stats),
        );

        let audio_worker =
            AudioAnalysisWorker::spawn(Arc::clone(&policy), transcriber, lexicon, sink);

        Self {
            id,
            ingress,
            pacer: Mutex::new(EgressPacer::new(egress_buffer)),
            policy,
            stats,
            video_worker: Some(video_worker),
            audio_worker: Some(audio_worker),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `update_policy(session_id, snapshot)`: may be called at any time,
    /// takes effect on the next frame/window. Atomically replaces the
    /// shared `Arc` so in-flight readers never see a torn snapshot.
    pub fn update_policy(&self, snapshot: PolicySnapshot) {
        *self.policy.lock().unwrap() = Arc::new(snapshot.with_updated_at_now());
    }

    pub fn push_video_frame(&self, frame: VideoFrame) {
        self.ingress.push(frame);
    }

    pub fn push_audio_samples(&self, samples: &[i16], channels: u16, sample_rate: u32, now: Instant) {
        if let Some(worker) = &self.audio_worker {
            worker.push_samples(samples, channels, sample_rate, now);
        }
    }

    pub fn pull_video_frame(
        &self,
        now: Instant,
        source_hint: Option<(i64, Rational)>,
    ) -> Option<VideoFrame> {
        self.pacer.lock().unwrap().pull(now, source_hint)
    }

    pub fn stats(&self) -> ProcessingStats {
        self.stats.lock().unwrap().clone()
    }

    /// `unbind(session_id)`: tears everything down. Workers must join
    /// within 2s of being signaled — each `stop()` below blocks on
    /// exactly that join.
    pub fn unbind(mut self) {
        let _span = tracing::info_span!("session", session_id = %self.id).entered();
        if let Some(worker) = self.video_worker.take() {
            worker.stop();
        }
        if let Some(worker) = self.audio_worker.take() {
            worker.stop();
        }
        tracing::info!("session unbound");
    }
}
