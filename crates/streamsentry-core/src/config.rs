// crates/streamsentry-core/src/config.rs
//
// Process-wide configuration: the handful of knobs an operator tunes per
// deployment. Everything that's fixed by the design (queue capacities,
// motion/stride constants, window duration, egress rate cap) lives as a
// constant next to the code that uses it, not here.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector_model_path: PathBuf,
    pub detector_device: String,
    pub detector_confidence_threshold: f32,
    pub object_detection_enabled: bool,
    pub audio_recognition_enabled: bool,
    pub lexicon_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector_model_path: PathBuf::from("best.pt"),
            detector_device: "cpu".into(),
            detector_confidence_threshold: 0.5,
            object_detection_enabled: true,
            audio_recognition_enabled: true,
            lexicon_path: PathBuf::from("lexicon.json"),
        }
    }
}

impl Config {
    /// Loads `path` as JSON if it exists, then applies `STREAMSENTRY_*`
    /// environment overrides on top — the same precedence the reference
    /// configuration module gives `os.getenv(key, default)`. A missing file
    /// is not an error; defaults apply and env vars can still override them.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut cfg = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| Error::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            serde_json::from_str(&raw).map_err(|e| Error::Json {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Config::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("STREAMSENTRY_DETECTOR_MODEL_PATH") {
            self.detector_model_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STREAMSENTRY_DETECTOR_DEVICE") {
            self.detector_device = v;
        }
        if let Ok(v) = env::var("STREAMSENTRY_DETECTOR_CONFIDENCE_THRESHOLD") {
            if let Ok(parsed) = v.parse() {
                self.detector_confidence_threshold = parsed;
            }
        }
        if let Ok(v) = env::var("STREAMSENTRY_OBJECT_DETECTION_ENABLED") {
            self.object_detection_enabled = parse_bool(&v, self.object_detection_enabled);
        }
        if let Ok(v) = env::var("STREAMSENTRY_AUDIO_RECOGNITION_ENABLED") {
            self.audio_recognition_enabled = parse_bool(&v, self.audio_recognition_enabled);
        }
        if let Ok(v) = env::var("STREAMSENTRY_LEXICON_PATH") {
            self.lexicon_path = PathBuf::from(v);
        }
    }
}

fn parse_bool(raw: &str, default: bool) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::from_env_and_file("/nonexistent/path/config.json").unwrap();
        assert_eq!(cfg.detector_confidence_threshold, 0.5);
        assert!(cfg.object_detection_enabled);
    }

    #[test]
    fn parse_bool_handles_common_spellings() {
        assert!(parse_bool("true", false));
        assert!(parse_bool("1", false));
        assert!(!parse_bool("false", true));
        assert!(parse_bool("garbage", true));
    }
}
