// crates/streamsentry-audio/src/lib.rs
//
// Audio side of the moderation pipeline: C5's windowing/normalization,
// the transcriber contract, profanity/banned-word lexicon matching, and
// the worker thread that drives all of it.

pub mod lexicon;
pub mod normalize;
pub mod queue;
pub mod transcribe;
pub mod window;
pub mod worker;

pub use lexicon::Lexicon;
pub use queue::WindowQueue;
pub use transcribe::{NullTranscriber, Transcriber};
pub use window::{AudioWindow, WindowAccumulator};
pub use worker::AudioAnalysisWorker;
