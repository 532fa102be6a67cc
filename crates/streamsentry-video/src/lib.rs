// crates/streamsentry-video/src/lib.rs
//
// Video side of the moderation pipeline: C1 (ingress), C2 (analysis
// worker: motion gating, tracker, blur), C3 (detector backend contract),
// C4 (egress pacer). Each lives in its own module; worker.rs wires them
// together into the per-session analysis loop.

pub mod blur;
pub mod detect;
pub mod egress;
pub mod filter;
pub mod frame;
pub mod ingress;
pub mod motion;
pub mod stride;
pub mod tracker;
pub mod worker;

pub use detect::{Detector, NullDetector, RawDetection};
pub use egress::{EgressBuffer, EgressPacer};
pub use frame::{Rational, VideoFrame};
pub use ingress::FrameIngress;
pub use worker::{new_policy_handle, PolicyHandle, VideoAnalysisWorker};
