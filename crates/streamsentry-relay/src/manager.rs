// crates/streamsentry-relay/src/manager.rs
//
// SessionManager: the session registry's in-process counterpart. Keyed by
// session id, same HashMap-of-handles shape a per-job cancel-flag table
// would use — no cross-session interference, since each
// entry owns its own queues, policy handle, and seen-IDs table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use streamsentry_core::event::EventSink;
use streamsentry_core::policy::PolicySnapshot;

use streamsentry_audio::{Lexicon, Transcriber};
use streamsentry_video::Detector;

use crate::session::Session;

pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn bind(
        &self,
        id: impl Into<String>,
        detector: Box<dyn Detector>,
        transcriber: Box<dyn Transcriber>,
        lexicon: Arc<Lexicon>,
        sink: Arc<dyn EventSink>,
    ) {
        let id = id.into();
        let session = Session::bind(id.clone(), detector, transcriber, lexicon, sink);
        self.sessions.lock().unwrap().insert(id, session);
    }

    pub fn update_policy(&self, id: &str, snapshot: PolicySnapshot) {
        if let Some(session) = self.sessions.lock().unwrap().get(id) {
            session.update_policy(snapshot);
        }
    }

    pub fn unbind(&self, id: &str) {
        let session = self.sessions.lock().unwrap().remove(id);
        if let Some(session) = session {
            session.unbind();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(id)
    }

    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.sessions.lock().unwrap().get(id).map(f)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use streamsentry_audio::NullTranscriber;
    use streamsentry_core::event::CollectingSink;
    use streamsentry_core::policy::VideoCategories;
    use streamsentry_video::NullDetector;

    fn bind(manager: &SessionManager, id: &str) {
        manager.bind(
            id,
            Box::new(NullDetector),
            Box::new(NullTranscriber),
            Arc::new(Lexicon::empty()),
            Arc::new(CollectingSink::new()),
        );
    }

    #[test]
    fn bind_and_unbind_round_trip() {
        let manager = SessionManager::new();
        bind(&manager, "a");
        assert!(manager.contains("a"));
        manager.unbind("a");
        assert!(!manager.contains("a"));
    }

    #[test]
    fn unknown_session_update_is_a_no_op() {
        let manager = SessionManager::new();
        let mut snap = PolicySnapshot::empty();
        snap.video_categories = VideoCategories {
            smoke: true,
            ..Default::default()
        };
        manager.update_policy("ghost", snap); // must not panic
    }

    #[test]
    fn two_sessions_do_not_interfere() {
        let manager = SessionManager::new();
        bind(&manager, "a");
        bind(&manager, "b");

        let mut snap = PolicySnapshot::empty();
        snap.video_categories = VideoCategories {
            firearms: true,
            ..Default::default()
        };
        manager.update_policy("a", snap);

        manager.with_session("a", |s| {
            let _ = s.pull_video_frame(Instant::now(), None);
        });
        manager.with_session("b", |s| {
            let _ = s.pull_video_frame(Instant::now(), None);
        });

        manager.unbind("a");
        manager.unbind("b");
    }
}
