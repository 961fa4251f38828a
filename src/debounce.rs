//! Search-box debounce.
//!
//! Typing only records the text; the applied term changes once the input
//! has been quiet for [`SEARCH_DEBOUNCE`]. A newer keystroke simply moves
//! the deadline.

use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct Debouncer {
    input: String,
    deadline: Option<Instant>,
    delay: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { input: String::new(), deadline: None, delay }
    }

    /// Text currently typed in the box, applied or not.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn set(&mut self, input: impl Into<String>, now: Instant) {
        self.input = input.into();
        self.deadline = Some(now + self.delay);
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.deadline = Some(now + self.delay);
    }

    pub fn pop(&mut self, now: Instant) {
        self.input.pop();
        self.deadline = Some(now + self.delay);
    }

    /// The text to apply if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                Some(self.input.clone())
            }
            _ => None,
        }
    }

    /// Apply right away, skipping the delay.
    pub fn flush(&mut self) -> String {
        self.deadline = None;
        self.input.clone()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_only_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.push('a', t0);
        d.push('d', t0 + Duration::from_millis(300));
        assert_eq!(d.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(800)), Some("ad".to_string()));
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn flush_skips_the_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.set("ops", t0);
        assert!(d.is_pending());
        assert_eq!(d.flush(), "ops");
        assert!(!d.is_pending());
    }
}
