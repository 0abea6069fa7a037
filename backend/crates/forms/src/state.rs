//! Submission State

use serde::Serialize;

/// Kind of the latest outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Success,
    Error,
}

/// Latest outcome shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitStatus {
    #[serde(rename = "type")]
    pub status_type: Option<StatusType>,
    pub message: String,
}

impl SubmitStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status_type: Some(StatusType::Success),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status_type: Some(StatusType::Error),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_type == Some(StatusType::Success)
    }

    pub fn is_error(&self) -> bool {
        self.status_type == Some(StatusType::Error)
    }
}

/// State of one form's submissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionState {
    pub is_submitting: bool,
    pub submit_error: Option<String>,
    pub submit_status: SubmitStatus,
}
