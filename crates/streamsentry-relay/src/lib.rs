// crates/streamsentry-relay/src/lib.rs
//
// C6 and the control surface around it: the session registry
// (bind/update_policy/unbind), the side-channel event transport, and the
// logging bootstrap every real process needs. streamsentry-video and
// streamsentry-audio hold the per-session pipelines this crate wires up.

pub mod logging;
pub mod manager;
pub mod session;
pub mod sink;

pub use manager::SessionManager;
pub use session::Session;
pub use sink::SideChannelSink;
