//! Error Code - Machine-readable error codes shared by server and client
//!
//! These are the values of `error.code` in the JSON envelope that clients
//! branch on (re-fetch token, wait, show field errors).

use serde::{Deserialize, Serialize};

/// クライアントが分岐に使うエラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// CSRF トークンまたは Origin の検証失敗。トークンを再取得して再送する。
    CsrfValidationFailed,
    /// レート制限超過。`Retry-After` 秒待ってから再送する。
    RateLimited,
    /// スキーマ検証エラー。`details.fieldErrors` にフィールド単位のメッセージ。
    ValidationError,
    /// 想定外のエラー（通信失敗・例外など）
    UnexpectedError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CsrfValidationFailed => "CSRF_VALIDATION_FAILED",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }

    /// Parse a wire code; unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "CSRF_VALIDATION_FAILED" => Some(ErrorCode::CsrfValidationFailed),
            "RATE_LIMITED" => Some(ErrorCode::RateLimited),
            "VALIDATION_ERROR" => Some(ErrorCode::ValidationError),
            "UNEXPECTED_ERROR" => Some(ErrorCode::UnexpectedError),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
