use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds elapsed since the Unix epoch, or zero if the clock is set before it.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
