// crates/streamsentry-audio/src/lexicon.rs
//
// Profanity severity lexicon, loaded once at startup, and the matching
// logic that turns a transcript plus the session's policy into at most one
// voice event per window.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use streamsentry_core::error::{Error, Result};
use streamsentry_core::policy::{active_buckets, ProfanityLevel};

const BANNED_WORD_CATEGORY: &str = "금지어";

#[derive(Debug, Deserialize)]
struct RawLexicon {
    #[serde(default)]
    high: Vec<String>,
    #[serde(default)]
    mid: Vec<String>,
    #[serde(default)]
    low: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    buckets: HashMap<&'static str, Vec<String>>,
}

impl Lexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::LexiconUnavailable(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let parsed: RawLexicon = serde_json::from_str(&raw).map_err(|e| Error::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut buckets = HashMap::new();
        buckets.insert("high", parsed.high);
        buckets.insert("mid", parsed.mid);
        buckets.insert("low", parsed.low);
        Ok(Self { buckets })
    }

    pub fn empty() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Test/in-process construction from already-parsed buckets, bypassing
    /// file I/O — used by other crate modules' test doubles.
    #[cfg(test)]
    pub(crate) fn from_buckets(buckets: HashMap<&'static str, Vec<String>>) -> Self {
        Self { buckets }
    }

    fn priority(category: &str) -> u8 {
        match category {
            "high" => 3,
            "mid" => 2,
            "low" => 1,
            _ => 0,
        }
    }

    fn korean_category(category: &str) -> &'static str {
        match category {
            "high" => "욕설-수위 높음",
            "mid" => "욕설-수위 중간",
            "low" => "욕설-수위 낮음",
            _ => "알 수 없음",
        }
    }

    /// Runs the two-phase match whitespace-stripped
    /// banned-word short circuit first, then a severity-bucket scan over
    /// the raw transcript. Returns `(category, detail)` for at most one
    /// event.
    pub fn scan(
        &self,
        transcript: &str,
        profanity_level: Option<ProfanityLevel>,
        banned_words: &[String],
    ) -> Option<(String, String)> {
        let compact: String = transcript.chars().filter(|c| !c.is_whitespace()).collect();
        for word in banned_words {
            if !word.is_empty() && compact.contains(word.as_str()) {
                return Some((BANNED_WORD_CATEGORY.to_string(), word.clone()));
            }
        }

        let mut best: Option<(&'static str, &str)> = None;
        for &bucket in active_buckets(profanity_level) {
            let Some(words) = self.buckets.get(bucket) else {
                continue;
            };
            for word in words {
                if !word.is_empty() && transcript.contains(word.as_str()) {
                    let better = best
                        .map(|(b, _)| Self::priority(bucket) > Self::priority(b))
                        .unwrap_or(true);
                    if better {
                        best = Some((bucket, word));
                    }
                }
            }
        }

        best.map(|(bucket, word)| (Self::korean_category(bucket).to_string(), word.to_string()))
    }
}
