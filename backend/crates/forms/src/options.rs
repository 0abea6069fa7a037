//! Submission Options

use std::time::Duration;

/// Delay before `is_submitting` returns to false
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delay before a post-success redirect
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const DEFAULT_SUCCESS_MESSAGE: &str = "送信が完了しました";
pub const DEFAULT_ERROR_MESSAGE: &str = "エラーが発生しました";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "送信処理中にエラーが発生しました";

/// How failed submissions are surfaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHandling {
    /// Copy `details.fieldErrors` onto the form's fields
    pub auto_set_field_errors: bool,
    pub show_error_toast: bool,
    /// Replaces the server's message everywhere
    pub custom_error_message: Option<String>,
}

impl Default for ErrorHandling {
    fn default() -> Self {
        Self {
            auto_set_field_errors: true,
            show_error_toast: true,
            custom_error_message: None,
        }
    }
}

/// What happens after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessHandling {
    pub show_success_toast: bool,
    /// Replaces the server's message everywhere
    pub success_message: Option<String>,
    pub reset_form: bool,
    pub redirect_to: Option<String>,
    pub redirect_delay: Duration,
}

impl Default for SuccessHandling {
    fn default() -> Self {
        Self {
            show_success_toast: true,
            success_message: None,
            reset_form: false,
            redirect_to: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

/// Options of a [`FormSubmission`](crate::FormSubmission)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOptions {
    pub error_handling: ErrorHandling,
    pub success_handling: SuccessHandling,
    pub debounce: Duration,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            error_handling: ErrorHandling::default(),
            success_handling: SuccessHandling::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl SubmissionOptions {
    /// No toasts; state and field errors only
    pub fn silent() -> Self {
        let mut options = Self::default();
        options.error_handling.show_error_toast = false;
        options.success_handling.show_success_toast = false;
        options
    }

    /// Reset the form and redirect to `to` after a successful submission
    pub fn redirect_on_success(mut self, to: impl Into<String>) -> Self {
        self.success_handling.reset_form = true;
        self.success_handling.redirect_to = Some(to.into());
        self
    }
}
