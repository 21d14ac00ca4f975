use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

static WINDOWS: Lazy<Mutex<HashMap<String, (u32, Instant)>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Fixed-window counter per key (client IP). Returns false once `limit`
/// requests have been seen inside the current window.
pub fn check(key: &str, limit: u32, window_secs: u64) -> bool {
    let mut map = WINDOWS.lock().unwrap();
    let entry = map.entry(key.to_string()).or_insert((0, Instant::now()));
    if entry.1.elapsed() > Duration::from_secs(window_secs) {
        *entry = (0, Instant::now());
    }
    if entry.0 >= limit {
        return false;
    }
    entry.0 += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_enforced_within_a_window() {
        // key unique to this test; the window map is process-wide
        let key = "203.0.113.77-limit-test";
        for _ in 0..5 {
            assert!(check(key, 5, 60));
        }
        assert!(!check(key, 5, 60));
    }
}
