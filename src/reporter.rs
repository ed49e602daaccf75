//! Error reporting capability handed to the store and the CRUD façade.
//!
//! Create one reporter at startup and pass it (as `Arc<dyn ErrorReporter>`)
//! to every component that needs it. Nothing here is global.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use log::{error, warn};

/// Conditions that are recovered internally but worth telling someone about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Persisted recipes could not be parsed and were discarded
    CorruptedState { key: String, reason: String },
    /// Some stored recipes could not be parsed and were dropped; the rest
    /// were kept
    RecordsDropped {
        key: String,
        dropped: usize,
        reason: String,
    },
    /// Deleting a corrupted blob failed; it will be overwritten on next save
    DiscardFailed { key: String, reason: String },
    /// A saved form draft could not be parsed and was discarded
    DraftUnreadable { key: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CorruptedState { key, reason } => write!(
                f,
                "Stored recipes under '{}' were unreadable and have been reset: {}",
                key, reason
            ),
            Notice::RecordsDropped {
                key,
                dropped,
                reason,
            } => write!(
                f,
                "Dropped {} unreadable recipe(s) under '{}': {}",
                dropped, key, reason
            ),
            Notice::DiscardFailed { key, reason } => {
                write!(f, "Failed to discard corrupted data under '{}': {}", key, reason)
            }
            Notice::DraftUnreadable { key, reason } => {
                write!(f, "Saved draft under '{}' was unreadable: {}", key, reason)
            }
        }
    }
}

pub trait ErrorReporter: Send + Sync {
    /// Report a recovered condition
    fn warn(&self, notice: &Notice);

    /// Show an actionable message to the user
    fn user_error(&self, message: &str);
}

/// Reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn warn(&self, notice: &Notice) {
        warn!("{}", notice);
    }

    fn user_error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Keeps every report in memory; useful in tests and for UIs that poll
#[derive(Debug, Default)]
pub struct RecordingReporter {
    warnings: Mutex<Vec<Notice>>,
    user_errors: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<Notice> {
        lock(&self.warnings).clone()
    }

    pub fn user_errors(&self) -> Vec<String> {
        lock(&self.user_errors).clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn warn(&self, notice: &Notice) {
        lock(&self.warnings).push(notice.clone());
    }

    fn user_error(&self, message: &str) {
        lock(&self.user_errors).push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.warn(&Notice::CorruptedState {
            key: "recipes".to_string(),
            reason: "expected value".to_string(),
        });
        reporter.user_error("Storage is full");
        reporter.user_error("Try again");

        assert_eq!(reporter.warnings().len(), 1);
        assert_eq!(reporter.user_errors(), vec!["Storage is full", "Try again"]);
    }

    #[test]
    fn test_notice_display_names_key() {
        let notice = Notice::DraftUnreadable {
            key: "recipe_form_draft".to_string(),
            reason: "EOF".to_string(),
        };
        assert!(notice.to_string().contains("recipe_form_draft"));
    }
}
