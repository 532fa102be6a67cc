// crates/streamsentry-relay/src/sink.rs
//
// C6's event channel half: the side-channel transport workers write
// through. A channel that is not yet open or has been closed
// drops events silently (logged) — no retry, no buffering beyond the
// transport's own.

use std::sync::Mutex;

use crossbeam_channel::Sender;

use streamsentry_core::event::{Event, EventSink};

/// Wraps a best-effort outbound channel of serialized JSON event lines.
/// `None` models "not yet open"; a send error on a `Some` channel models
/// "closed" — both are silent-drop-and-log, not propagated errors.
pub struct SideChannelSink {
    session_id: String,
    tx: Mutex<Option<Sender<String>>>,
}

impl SideChannelSink {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            tx: Mutex::new(None),
        }
    }

    pub fn open(session_id: impl Into<String>, tx: Sender<String>) -> Self {
        Self {
            session_id: session_id.into(),
            tx: Mutex::new(Some(tx)),
        }
    }

    /// (Re)attaches the transport, e.g. once the downstream consumer binds.
    pub fn attach(&self, tx: Sender<String>) {
        *self.tx.lock().unwrap() = Some(tx);
    }

    pub fn detach(&self) {
        *self.tx.lock().unwrap() = None;
    }
}

impl EventSink for SideChannelSink {
    fn emit(&self, event: Event) {
        let guard = self.tx.lock().unwrap();
        match guard.as_ref() {
            Some(tx) => {
                if tx.send(event.to_json()).is_err() {
                    tracing::warn!(session_id = %self.session_id, "side channel closed, dropping event");
                }
            }
            None => {
                tracing::warn!(session_id = %self.session_id, "side channel not open, dropping event");
            }
        }
    }
}
