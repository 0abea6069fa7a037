//! UI Seams
//!
//! The state machine drives the form, toasts and navigation only through
//! these traits.

use kernel::validation::FieldErrors;
use std::sync::Mutex;

/// The form being submitted
pub trait FormHandle: Send + Sync {
    /// Restore initial values and clear field errors
    fn reset(&self);

    fn set_field_error(&self, field: &str, message: &str);
}

/// Toast notifications
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Client-side navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str);
}

/// Notifier that writes toasts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(message, "Submission succeeded");
    }

    fn error(&self, message: &str) {
        tracing::warn!(message, "Submission failed");
    }
}

/// Headless form state: per-field error messages
#[derive(Debug, Default)]
pub struct FieldErrorStore {
    errors: Mutex<FieldErrors>,
}

impl FieldErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of current field errors
    pub fn errors(&self) -> FieldErrors {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.errors
            .lock()
            .ok()
            .and_then(|errors| errors.get(field).cloned())
    }

    pub fn clear_error(&self, field: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.remove(field);
        }
    }
}

impl FormHandle for FieldErrorStore {
    fn reset(&self) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.clear();
        }
    }

    fn set_field_error(&self, field: &str, message: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.insert(field.to_string(), message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_store() {
        let form = FieldErrorStore::new();
        form.set_field_error("email", "invalid");
        form.set_field_error("name", "required");
        assert_eq!(form.error("email").as_deref(), Some("invalid"));

        form.clear_error("name");
        assert_eq!(form.errors().len(), 1);

        form.reset();
        assert!(form.errors().is_empty());
    }
}
