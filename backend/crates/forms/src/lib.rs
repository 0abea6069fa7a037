//! Form Submission Client
//!
//! Headless counterpart of a form UI:
//! - `submission` - the submission state machine (`idle → submitting → success | error → idle`)
//! - `transition` - pure mapping from a submission result to state and side effects
//! - `options` - error/success handling options
//! - `ui` - seams to the form, toast and navigation layers
//! - `client` - HTTP client that carries the CSRF token
//!
//! Submission results use the same envelope the server renders
//! (`kernel::response::ApiResponse`), so a decoded response is already a
//! [`SubmissionResult`].

pub mod client;
pub mod error;
pub mod options;
pub mod state;
pub mod submission;
pub mod submitter;
pub mod transition;
pub mod ui;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use options::{ErrorHandling, SubmissionOptions, SuccessHandling};
pub use state::{StatusType, SubmissionState, SubmitStatus};
pub use submission::FormSubmission;
pub use submitter::Submitter;
pub use ui::{FieldErrorStore, FormHandle, Navigator, Notifier, TracingNotifier};

/// Outcome of one submission
pub type SubmissionResult<D> = kernel::response::ApiResponse<D>;
