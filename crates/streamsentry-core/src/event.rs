// crates/streamsentry-core/src/event.rs
//
// The one thing this whole pipeline produces for the outside world: a
// moderation event. Serializes to exactly the wire schema the side channel
// expects, non-ASCII preserved (serde_json does this by default — there is
// no ensure_ascii knob to fight).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "video")]
    Video {
        category: String,
        detail: String,
        time: String,
    },
    #[serde(rename = "voice")]
    Voice {
        category: String,
        detail: String,
        time: String,
    },
}

impl Event {
    pub fn video(category: impl Into<String>, detail: impl Into<String>) -> Self {
        Event::Video {
            category: category.into(),
            detail: detail.into(),
            time: crate::time::now_hhmmss(),
        }
    }

    pub fn voice(category: impl Into<String>, detail: impl Into<String>) -> Self {
        Event::Voice {
            category: category.into(),
            detail: detail.into(),
            time: crate::time::now_hhmmss(),
        }
    }

    /// Serialize to the UTF-8 JSON wire form written to the side channel.
    pub fn to_json(&self) -> String {
        // serde_json never escapes non-ASCII by default, matching the
        // source's ensure_ascii=false.
        serde_json::to_string(self).expect("Event serialization cannot fail")
    }
}

/// The capability workers hold to emit events, independent of whatever
/// transport sits underneath. The processor only ever holds a weak/shared
/// handle to this — the sink does not hold a reference back into the
/// worker that feeds it.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// In-memory sink used by tests: every emitted event is appended to a
/// shared, lock-protected `Vec`.
#[derive(Default)]
pub struct CollectingSink {
    events: std::sync::Mutex<Vec<Event>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_event_serializes_with_korean_preserved() {
        let ev = Event::Video {
            category: "흡연".into(),
            detail: "담배".into(),
            time: "00:00:01".into(),
        };
        let json = ev.to_json();
        assert!(json.contains("\"type\":\"video\""));
        assert!(json.contains("흡연"));
        assert!(json.contains("담배"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn voice_event_tag_is_voice() {
        let ev = Event::Voice {
            category: "금지어".into(),
            detail: "빨리".into(),
            time: "00:00:03".into(),
        };
        assert!(ev.to_json().starts_with("{\"type\":\"voice\""));
    }
}
