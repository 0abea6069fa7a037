//! Response Envelope
//!
//! Every JSON API response uses the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "error": { "message": "...", "code": "...", "details": { "fieldErrors": { ... } } } }
//! ```
//!
//! The client side decodes the same type, so the envelope is also the
//! outcome type of a form submission.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::code::ErrorCode;
use crate::validation::FieldErrors;

/// Outcome of an API call / form submission
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success { data: Option<T> },
    Failure { error: ErrorBody },
}

/// `error` object of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Structured error details
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success { data: Some(data) }
    }

    pub fn empty_success() -> Self {
        ApiResponse::Success { data: None }
    }

    pub fn failure(error: ErrorBody) -> Self {
        ApiResponse::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure { error } => Some(error),
        }
    }
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.as_str().to_string());
        self
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.details.get_or_insert_with(Default::default).field_errors = field_errors;
        self
    }

    /// Whether `code` is the given well-known code
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code.as_deref() == Some(code.as_str())
    }

    /// Field errors, empty when the server sent none
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.details
            .as_ref()
            .map(|d| &d.field_errors)
            .filter(|errors| !errors.is_empty())
    }

    pub fn retry_after(&self) -> Option<u64> {
        self.details.as_ref().and_then(|d| d.retry_after)
    }
}

#[derive(serde::Serialize)]
struct RawResponseRef<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorBody>,
}

#[derive(serde::Deserialize)]
struct RawResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<ErrorBody>,
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = match self {
            ApiResponse::Success { data } => RawResponseRef {
                success: true,
                data: data.as_ref(),
                error: None,
            },
            ApiResponse::Failure { error } => RawResponseRef {
                success: false,
                data: None,
                error: Some(error),
            },
        };
        raw.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawResponse::<T>::deserialize(deserializer)?;
        if raw.success {
            Ok(ApiResponse::Success { data: raw.data })
        } else {
            Ok(ApiResponse::Failure {
                error: raw.error.unwrap_or_else(|| ErrorBody::new("Unknown error")),
            })
        }
    }
}
