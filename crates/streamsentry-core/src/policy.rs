// crates/streamsentry-core/src/policy.rs
//
// The session-scoped policy snapshot. A snapshot is an immutable value —
// updating policy means swapping the `Arc` the registry hands out, never
// mutating fields in place. That's what gives workers the no-torn-read
// guarantee without taking a lock on every frame.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VideoCategories {
    pub smoke: bool,
    pub drink: bool,
    #[serde(rename = "sharpObjects")]
    pub sharp_objects: bool,
    pub flammables: bool,
    pub firearms: bool,
    pub exposure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfanityLevel {
    High,
    Mid,
    Low,
}

/// The active severity buckets a given `ProfanityLevel` admits, per the
/// fixed escalation table: each level includes itself and everything more
/// severe. `None` (unset) defaults to the most permissive set so audio
/// moderation is fail-open on detection, not fail-closed — unlike video,
/// which fails closed on an empty category set.
pub fn active_buckets(level: Option<ProfanityLevel>) -> &'static [&'static str] {
    match level {
        Some(ProfanityLevel::High) => &["high", "mid", "low"],
        Some(ProfanityLevel::Mid) => &["high", "mid"],
        Some(ProfanityLevel::Low) => &["high"],
        None => &["high", "mid", "low"],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySnapshot {
    pub video_categories: VideoCategories,
    pub blur_enabled: bool,
    pub audio_profanity_level: Option<ProfanityLevel>,
    pub banned_words: Vec<String>,
    pub updated_at: u64,
}

impl Default for PolicySnapshot {
    fn default() -> Self {
        Self {
            video_categories: VideoCategories::default(),
            blur_enabled: false,
            audio_profanity_level: None,
            banned_words: Vec::new(),
            updated_at: 0,
        }
    }
}

impl PolicySnapshot {
    /// The snapshot a session starts with on `bind`: every category false,
    /// blur off, profanity unset, banned list empty. Fail-closed on video
    /// (nothing passes the class filter), fail-open-by-default on audio
    /// severity (see `active_buckets`).
    pub fn empty() -> Self {
        Self {
            updated_at: now_unix_millis(),
            ..Self::default()
        }
    }

    pub fn with_updated_at_now(mut self) -> Self {
        self.updated_at = now_unix_millis();
        self
    }
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
