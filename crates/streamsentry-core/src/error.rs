// crates/streamsentry-core/src/error.rs
//
// Crate-wide error type. Most pipeline failures (see the error-handling design notes)
// are not represented here at all — they are handled by logging and
// degrading in place, never by propagating a Result. This enum only covers
// the conditions a caller legitimately needs to branch on: startup-time
// loading and detector/transcriber backend construction.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("lexicon file missing or unreadable: {0}")]
    LexiconUnavailable(PathBuf),

    #[error("detector backend unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("transcriber backend unavailable: {0}")]
    TranscriberUnavailable(String),

    #[error("session {0} is not bound")]
    UnknownSession(String),
}
