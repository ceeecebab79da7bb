use std::time::{Duration, Instant};

/// Leading-edge call coalescer: the first call runs immediately, further
/// calls inside the delay window are dropped.
pub struct Debounce {
    delay: Duration,
    last_run: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            last_run: None,
        }
    }
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn bounce<F>(&mut self, f: F)
    where
        F: FnOnce(),
    {
        let now = Instant::now();
        if let Some(last_run) = self.last_run {
            if now.duration_since(last_run) < self.delay {
                return;
            }
        }
        self.last_run = Some(now);
        f()
    }
}
