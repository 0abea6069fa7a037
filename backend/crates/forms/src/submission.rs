//! Form Submission State Machine
//!
//! `idle → submitting → (success | error) → idle`, re-entrant. One instance
//! per form. State changes are published on a watch channel; the result of a
//! submission is mapped by [`transition`](crate::transition::transition) and
//! its side effects run through the [`ui`](crate::ui) seams.

use kernel::validation::{FieldErrors, validate_fields};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use validator::Validate;

use crate::SubmissionResult;
use crate::options::SubmissionOptions;
use crate::state::{SubmissionState, SubmitStatus};
use crate::submitter::Submitter;
use crate::transition::{Effect, SuccessData, Transition, transition, unexpected_error};
use crate::ui::{FormHandle, Navigator, Notifier, TracingNotifier};

type BeforeSubmitHook<T> = Box<dyn Fn(&T) + Send + Sync>;
type AfterSubmitHook<D> = Box<dyn Fn(&SubmissionResult<D>) + Send + Sync>;

/// Submission state machine for one form
pub struct FormSubmission<T, D, S> {
    submitter: S,
    form: Arc<dyn FormHandle>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
    options: SubmissionOptions,
    state: Arc<watch::Sender<SubmissionState>>,
    on_before_submit: Option<BeforeSubmitHook<T>>,
    on_after_submit: Option<AfterSubmitHook<D>>,
}

impl<T, D, S> FormSubmission<T, D, S>
where
    T: Send,
    D: SuccessData,
    S: Submitter<T, D>,
{
    pub fn new(submitter: S, form: Arc<dyn FormHandle>) -> Self {
        let (state, _) = watch::channel(SubmissionState::default());
        Self {
            submitter,
            form,
            notifier: Arc::new(TracingNotifier),
            navigator: None,
            options: SubmissionOptions::default(),
            state: Arc::new(state),
            on_before_submit: None,
            on_after_submit: None,
        }
    }

    pub fn with_options(mut self, options: SubmissionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Called with the data right before the submit function
    pub fn on_before_submit(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_before_submit = Some(Box::new(hook));
        self
    }

    /// Called with the final result of every submission that ran
    pub fn on_after_submit(
        mut self,
        hook: impl Fn(&SubmissionResult<D>) + Send + Sync + 'static,
    ) -> Self {
        self.on_after_submit = Some(Box::new(hook));
        self
    }

    /// Current state snapshot
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Wait until `is_submitting` is false
    pub async fn wait_idle(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| !state.is_submitting).await;
    }

    /// Submit `data`
    ///
    /// Returns `None` without doing anything while a previous submission is
    /// still in progress. Errors from the submit function never escape: they
    /// become an `UNEXPECTED_ERROR` result. `is_submitting` returns to false
    /// one debounce period after this returns.
    pub async fn handle_submit(&self, data: T) -> Option<SubmissionResult<D>> {
        let Some(_submitting) = self.begin() else {
            tracing::debug!("Submission already in progress, skipped");
            return None;
        };

        if let Some(hook) = &self.on_before_submit {
            hook(&data);
        }

        let result = match self.submitter.submit(data).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "Unexpected submission error");
                unexpected_error()
            }
        };

        self.apply(&result);

        if let Some(hook) = &self.on_after_submit {
            hook(&result);
        }

        Some(result)
    }

    /// Validate `input` against its schema, then submit it
    ///
    /// On schema failure the field errors are set on the form and returned;
    /// the submit function is not called.
    pub async fn submit_form(&self, input: T) -> Result<Option<SubmissionResult<D>>, FieldErrors>
    where
        T: Validate,
    {
        if let Err(fields) = validate_fields(&input) {
            tracing::debug!(fields = fields.len(), "Form input failed schema validation");
            for (field, message) in &fields {
                self.form.set_field_error(field, message);
            }
            return Err(fields);
        }

        Ok(self.handle_submit(input).await)
    }

    /// Clear `submit_error`
    pub fn reset_error(&self) {
        self.state.send_if_modified(|state| state.submit_error.take().is_some());
    }

    /// Clear `submit_status`
    pub fn reset_status(&self) {
        self.state.send_if_modified(|state| {
            let changed = state.submit_status != SubmitStatus::default();
            state.submit_status = SubmitStatus::default();
            changed
        });
    }

    fn begin(&self) -> Option<SubmittingGuard> {
        let started = self.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            state.is_submitting = true;
            state.submit_error = None;
            true
        });

        started.then(|| SubmittingGuard {
            state: self.state.clone(),
            debounce: self.options.debounce,
        })
    }

    fn apply(&self, result: &SubmissionResult<D>) {
        let Transition {
            submit_error,
            submit_status,
            effects,
        } = transition(result, &self.options);

        self.state.send_modify(move |state| {
            state.submit_error = submit_error;
            state.submit_status = submit_status;
        });

        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::ResetForm => self.form.reset(),
            Effect::SetFieldError { field, message } => self.form.set_field_error(&field, &message),
            Effect::SuccessToast(message) => self.notifier.success(&message),
            Effect::ErrorToast(message) => self.notifier.error(&message),
            Effect::Redirect { to, after } => self.schedule_redirect(to, after),
        }
    }

    fn schedule_redirect(&self, to: String, after: Duration) {
        let Some(navigator) = self.navigator.clone() else {
            tracing::warn!(to = %to, "No navigator configured, redirect skipped");
            return;
        };

        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            navigator.navigate(&to);
        });
    }
}

/// Clears `is_submitting` one debounce period after it is dropped
///
/// Runs on every exit path of a submission, including a dropped future.
struct SubmittingGuard {
    state: Arc<watch::Sender<SubmissionState>>,
    debounce: Duration,
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        let state = self.state.clone();
        let debounce = self.debounce;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(debounce).await;
                    state.send_modify(|state| state.is_submitting = false);
                });
            }
            Err(_) => state.send_modify(|state| state.is_submitting = false),
        }
    }
}
