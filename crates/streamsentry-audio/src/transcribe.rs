// crates/streamsentry-audio/src/transcribe.rs
//
// The transcription capability (C3's audio counterpart). Same shape as
// streamsentry-video's Detector: a trait plus a tagged null implementation,
// not an Option threaded through every call site.

/// Given a 3.0s window of mono float32 PCM already resampled to 16kHz,
/// return the best transcript. A real backend wraps a streaming speech
/// model configured for single-pass decoding (beam_size=1, no VAD
/// pre-filter, no word timestamps, default language Korean) — this
/// pipeline only needs the joined segment text, not timing detail.
pub trait Transcriber: Send {
    fn transcribe(&mut self, samples: &[f32], sample_rate: u32) -> String;
}

/// The "model missing" backend: always returns an empty transcript. Used
/// when the configured model path is absent or fails to load, and in
/// tests.
#[derive(Debug, Default)]
pub struct NullTranscriber;

impl Transcriber for NullTranscriber {
    fn transcribe(&mut self, _samples: &[f32], _sample_rate: u32) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_transcriber_returns_empty_string() {
        let mut t = NullTranscriber;
        assert_eq!(t.transcribe(&[0.0; 48_000], 16_000), "");
    }
}
