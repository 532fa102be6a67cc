// crates/streamsentry-video/src/worker.rs
//
// VideoAnalysisWorker: owns the OS thread that runs motion estimation,
// gates detector calls, tracks objects, filters/blurs, and pushes onto the
// egress buffer. One instance per session — block on the queue with a timeout so
// shutdown is prompt, never block the producer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use streamsentry_core::classes::{category_name, class_display_name, enabled_class_ids};
use streamsentry_core::event::{Event, EventSink};
use streamsentry_core::policy::PolicySnapshot;
use streamsentry_core::seen_ids::SeenIdsTable;
use streamsentry_core::stats::ProcessingStats;

use crate::blur::{blur_detections, resize_rgb, BlurSampler, EGRESS_HEIGHT, EGRESS_WIDTH};
use crate::detect::Detector;
use crate::egress::EgressBuffer;
use crate::filter::DetectionFilter;
use crate::frame::VideoFrame;
use crate::ingress::FrameIngress;
use crate::motion::MotionEstimator;
use crate::stride::StrideController;
use crate::tracker::Tracker;

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared, swappable policy handle. A `Mutex<Arc<PolicySnapshot>>` gives
/// atomic no-torn-read replacement: readers clone the `Arc` under a short
/// critical section, writers swap the whole `Arc` under the same lock.
pub type PolicyHandle = Arc<Mutex<Arc<PolicySnapshot>>>;

pub fn new_policy_handle(initial: PolicySnapshot) -> PolicyHandle {
    Arc::new(Mutex::new(Arc::new(initial)))
}

pub struct VideoAnalysisWorker {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl VideoAnalysisWorker {
    pub fn spawn(
        ingress: Arc<FrameIngress>,
        egress: Arc<EgressBuffer>,
        policy: PolicyHandle,
        detector: Box<dyn Detector>,
        sink: Arc<dyn EventSink>,
        stats: Arc<Mutex<ProcessingStats>>,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            run(ingress, egress, policy, detector, sink, stats, worker_shutdown);
        });

        Self {
            shutdown,
            handle: Some(handle),
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
    ingress: Arc<FrameIngress>,
    egress: Arc<EgressBuffer>,
    policy: PolicyHandle,
    mut detector: Box<dyn Detector>,
    sink: Arc<dyn EventSink>,
    stats: Arc<Mutex<ProcessingStats>>,
    shutdown: Arc<AtomicBool>,
) {
    let mut motion = MotionEstimator::new();
    let mut stride = StrideController::new();
    let mut tracker = Tracker::new();
    let mut blur_sampler = BlurSampler::new();
    let mut seen_ids = SeenIdsTable::new();
    let mut current_detections = Vec::new();

    while !shutdown.load(Ordering::Relaxed) {
        let frame = match ingress.rx.recv_timeout(RECV_TIMEOUT) {
            Ok(f) => f,
            Err(_) => continue, // timeout or disconnect: re-check shutdown
        };

        let snapshot = { Arc::clone(&*policy.lock().unwrap()) };

        let motion_ratio = motion.observe(&frame);
        let decision = stride.step(motion_ratio, motion.ema);

        if decision.run_detection {
            let started = Instant::now();
            let mut raw = detector.detect(&frame);
            tracker.update(&mut raw);

            let mut filter = DetectionFilter::default();
            filter.set_class_filter(enabled_class_ids(&snapshot.video_categories));
            current_detections = filter.apply(&raw);

            let elapsed = started.elapsed();
            stats.lock().unwrap().record(current_detections.len(), elapsed);

            emit_events(&current_detections, &mut seen_ids, &sink);
        }
        // On skip, current_detections is reused unchanged (the filter already chose which ones to keep).

        let mut rgb = frame.data.clone();
        let has_detections = !current_detections.is_empty();

        if snapshot.blur_enabled && has_detections {
            let dets = current_detections.clone();
            let (w, h) = (frame.width, frame.height);
            if let Some(blurred) = blur_sampler.frame(decision.motion_trigger, true, || {
                let mut copy = frame.data.clone();
                blur_detections(&mut copy, w, h, &dets);
                copy
            }) {
                rgb = blurred;
            }
        }

        let resized = resize_rgb(&rgb, frame.width, frame.height, EGRESS_WIDTH, EGRESS_HEIGHT);
        let out = VideoFrame::new(
            EGRESS_WIDTH,
            EGRESS_HEIGHT,
            resized,
            frame.pts,
            frame.time_base,
        );
        egress.push(out);
    }
}

fn emit_events(
    detections: &[crate::detect::RawDetection],
    seen_ids: &mut SeenIdsTable,
    sink: &Arc<dyn EventSink>,
) {
    for det in detections {
        let Some(track_id) = det.track_id else { continue };
        if !seen_ids.record_if_new(det.class_id, track_id) {
            continue;
        }
        let Some(category) = category_name(det.class_id) else { continue };
        let Some(detail) = class_display_name(det.class_id) else { continue };
        sink.emit(Event::video(category, detail));
    }
}
