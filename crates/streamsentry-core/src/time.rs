// crates/streamsentry-core/src/time.rs
//
// Wall-clock formatting for event timestamps. The rest of the pipeline
// reasons in PTS/time_base; this is the one place we touch the system clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as `HH:MM:SS`, the format every emitted event
/// carries in its `time` field.
///
/// ```
/// use streamsentry_core::time::now_hhmmss;
/// let t = now_hhmmss();
/// assert_eq!(t.len(), 8);
/// assert_eq!(t.as_bytes()[2], b':');
/// ```
pub fn now_hhmmss() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_hhmmss(secs)
}

fn format_hhmmss(secs_since_epoch: u64) -> String {
    let day_secs = secs_since_epoch % 86_400;
    let h = day_secs / 3600;
    let m = (day_secs % 3600) / 60;
    let s = day_secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
