//! Confirmation and notification capability used by the mutation handlers.
//!
//! Handlers never talk to a dialog or toast widget directly; they ask a
//! [`Notifier`]. The terminal app answers from its confirm modal and shows
//! notifications in the status bar, tests answer from a script.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// What a confirmation dialog shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub confirm_label: String,
    pub cancel_label: String,
}

pub trait Notifier {
    /// Ask the user to confirm; true means go ahead.
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;

    /// Fire-and-forget message.
    fn notify(&mut self, message: &str, severity: Severity);
}

/// A notification kept for display.
#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub at: Instant,
}

/// Recent notifications, newest last, bounded in size.
#[derive(Debug, Default)]
pub struct ToastLog {
    entries: VecDeque<Toast>,
}

impl ToastLog {
    const CAPACITY: usize = 32;

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        if self.entries.len() == Self::CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(Toast { message: message.into(), severity, at: Instant::now() });
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.entries.back()
    }

    /// Latest toast if it is younger than `ttl` at `now`.
    pub fn visible(&self, now: Instant, ttl: Duration) -> Option<&Toast> {
        self.latest().filter(|t| now.saturating_duration_since(t.at) < ttl)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Notifier whose confirmation answer is decided before the handler runs.
///
/// The terminal app shows its own Yes/No modal first, then runs the handler
/// with the user's choice recorded here.
#[derive(Debug, Default)]
pub struct PreparedNotifier {
    answer: bool,
    pub toasts: ToastLog,
}

impl PreparedNotifier {
    pub fn answer(&mut self, confirmed: bool) -> &mut Self {
        self.answer = confirmed;
        self
    }
}

impl Notifier for PreparedNotifier {
    fn confirm(&mut self, _request: &ConfirmRequest) -> bool {
        // one answer per prompt
        std::mem::take(&mut self.answer)
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.toasts.push(message, severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConfirmRequest {
        ConfirmRequest {
            title: "Are you sure?".into(),
            message: "gone".into(),
            severity: Severity::Warning,
            confirm_label: "Yes".into(),
            cancel_label: "Cancel".into(),
        }
    }

    #[test]
    fn prepared_answer_is_consumed_once() {
        let mut n = PreparedNotifier::default();
        n.answer(true);
        assert!(n.confirm(&request()));
        assert!(!n.confirm(&request()));
    }

    #[test]
    fn toast_log_is_bounded_and_expires() {
        let mut log = ToastLog::default();
        for i in 0..40 {
            log.push(format!("m{i}"), Severity::Info);
        }
        assert_eq!(log.len(), ToastLog::CAPACITY);
        assert_eq!(log.latest().map(|t| t.message.as_str()), Some("m39"));

        let later = Instant::now() + Duration::from_secs(10);
        assert!(log.visible(later, Duration::from_secs(3)).is_none());
    }
}
