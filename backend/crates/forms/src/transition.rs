//! Result Mapping
//!
//! Pure function from a submission result and options to the next state
//! fields and the side effects to run. The same inputs always produce the
//! same transition.

use kernel::error::code::ErrorCode;
use kernel::response::{ApiResponse, ErrorBody};
use std::time::Duration;

use crate::options::{
    DEFAULT_ERROR_MESSAGE, DEFAULT_SUCCESS_MESSAGE, SubmissionOptions, UNEXPECTED_ERROR_MESSAGE,
};
use crate::state::SubmitStatus;

/// Success payloads that may carry a user-facing message
pub trait SuccessData {
    fn message(&self) -> Option<&str> {
        None
    }
}

impl SuccessData for () {}

impl SuccessData for serde_json::Value {
    fn message(&self) -> Option<&str> {
        self.get("message").and_then(serde_json::Value::as_str)
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResetForm,
    SetFieldError { field: String, message: String },
    SuccessToast(String),
    ErrorToast(String),
    Redirect { to: String, after: Duration },
}

/// Result of mapping one submission outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub submit_error: Option<String>,
    pub submit_status: SubmitStatus,
    pub effects: Vec<Effect>,
}

/// The result used when the submit function itself failed
pub fn unexpected_error<D>() -> ApiResponse<D> {
    ApiResponse::failure(
        ErrorBody::new(UNEXPECTED_ERROR_MESSAGE).with_code(ErrorCode::UnexpectedError),
    )
}

/// Map a submission result to the next state and its side effects
pub fn transition<D: SuccessData>(result: &ApiResponse<D>, options: &SubmissionOptions) -> Transition {
    match result {
        ApiResponse::Success { data } => {
            let handling = &options.success_handling;
            let message = handling
                .success_message
                .as_deref()
                .or_else(|| data.as_ref().and_then(SuccessData::message))
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
                .to_string();

            let mut effects = Vec::new();
            if handling.reset_form {
                effects.push(Effect::ResetForm);
            }
            if handling.show_success_toast {
                effects.push(Effect::SuccessToast(message.clone()));
            }
            if let Some(to) = &handling.redirect_to {
                effects.push(Effect::Redirect {
                    to: to.clone(),
                    after: handling.redirect_delay,
                });
            }

            Transition {
                submit_error: None,
                submit_status: SubmitStatus::success(message),
                effects,
            }
        }
        ApiResponse::Failure { error } => {
            let handling = &options.error_handling;
            let message = handling
                .custom_error_message
                .as_deref()
                .or(Some(error.message.as_str()))
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string();

            let mut effects = Vec::new();
            if handling.auto_set_field_errors {
                if let Some(fields) = error.field_errors() {
                    effects.extend(fields.iter().map(|(field, message)| {
                        Effect::SetFieldError {
                            field: field.clone(),
                            message: message.clone(),
                        }
                    }));
                }
            }
            if handling.show_error_toast {
                effects.push(Effect::ErrorToast(message.clone()));
            }

            Transition {
                submit_error: Some(message.clone()),
                submit_status: SubmitStatus::error(message),
                effects,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusType;
    use kernel::validation::FieldErrors;
    use serde_json::{Value, json};

    fn field_error_result() -> ApiResponse<Value> {
        ApiResponse::failure(ErrorBody::new("Bad").with_field_errors(FieldErrors::from([(
            "email".to_string(),
            "invalid".to_string(),
        )])))
    }

    #[test]
    fn test_success_uses_data_message() {
        let result = ApiResponse::success(json!({"message": "OK"}));
        let t = transition(&result, &SubmissionOptions::default());

        assert_eq!(t.submit_error, None);
        assert_eq!(t.submit_status, SubmitStatus::success("OK"));
        assert_eq!(t.effects, vec![Effect::SuccessToast("OK".to_string())]);
    }

    #[test]
    fn test_success_message_precedence() {
        let mut options = SubmissionOptions::default();
        options.success_handling.success_message = Some("送信しました".to_string());

        let t = transition(&ApiResponse::success(json!({"message": "OK"})), &options);
        assert_eq!(t.submit_status.message, "送信しました");

        let t = transition(&ApiResponse::<Value>::empty_success(), &SubmissionOptions::default());
        assert_eq!(t.submit_status.message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_success_effects_order() {
        let options = SubmissionOptions::default().redirect_on_success("/thanks");
        let t = transition(&ApiResponse::<()>::empty_success(), &options);

        assert_eq!(
            t.effects,
            vec![
                Effect::ResetForm,
                Effect::SuccessToast(DEFAULT_SUCCESS_MESSAGE.to_string()),
                Effect::Redirect {
                    to: "/thanks".to_string(),
                    after: Duration::from_millis(1500),
                },
            ]
        );
    }

    #[test]
    fn test_field_errors_mapped() {
        let t = transition(&field_error_result(), &SubmissionOptions::default());

        assert_eq!(t.submit_error.as_deref(), Some("Bad"));
        assert_eq!(t.submit_status.status_type, Some(StatusType::Error));
        assert_eq!(
            t.effects,
            vec![
                Effect::SetFieldError {
                    field: "email".to_string(),
                    message: "invalid".to_string(),
                },
                Effect::ErrorToast("Bad".to_string()),
            ]
        );
    }

    #[test]
    fn test_field_errors_disabled() {
        let mut options = SubmissionOptions::silent();
        options.error_handling.auto_set_field_errors = false;

        let t = transition(&field_error_result(), &options);
        assert!(t.effects.is_empty());
        assert_eq!(t.submit_error.as_deref(), Some("Bad"));
    }

    #[test]
    fn test_error_message_precedence() {
        let mut options = SubmissionOptions::default();
        options.error_handling.custom_error_message = Some("やり直してください".to_string());
        let t = transition(&field_error_result(), &options);
        assert_eq!(t.submit_error.as_deref(), Some("やり直してください"));

        let empty: ApiResponse<Value> = ApiResponse::failure(ErrorBody::new(""));
        let t = transition(&empty, &SubmissionOptions::default());
        assert_eq!(t.submit_error.as_deref(), Some(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn test_unexpected_error_result() {
        let result = unexpected_error::<Value>();
        let error = result.error().unwrap();
        assert_eq!(error.message, UNEXPECTED_ERROR_MESSAGE);
        assert!(error.has_code(ErrorCode::UnexpectedError));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let options = SubmissionOptions::default();
        for result in [
            field_error_result(),
            ApiResponse::success(json!({"message": "OK"})),
            unexpected_error(),
        ] {
            assert_eq!(transition(&result, &options), transition(&result, &options));
        }
    }
}
