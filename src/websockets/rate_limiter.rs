use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Gates how often a connection may submit a command.
pub trait RateLimiter: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// Allows one command per key within each cool-down window.
#[derive(Debug)]
pub struct CooldownRateLimiter {
    window: Duration,
    last_allowed: Mutex<HashMap<String, Instant>>,
}

impl CooldownRateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_allowed: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl RateLimiter for CooldownRateLimiter {
    fn allow(&self, key: &str) -> bool {
        if self.window.is_zero() {
            return true;
        }

        let now = Instant::now();
        let mut last_allowed = self
            .last_allowed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Expired entries carry no information.
        last_allowed.retain(|_, at| now.duration_since(*at) < self.window);

        if last_allowed.contains_key(key) {
            return false;
        }
        last_allowed.insert(key.to_string(), now);
        true
    }
}
