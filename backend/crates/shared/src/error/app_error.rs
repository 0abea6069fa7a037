//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::code::ErrorCode;
use super::kind::ErrorKind;
use crate::response::{ErrorBody, ErrorDetails};
use crate::validation::FieldErrors;

/// アプリケーション統一エラー型
///
/// レスポンスの `{success: false, error: {...}}` エンベロープに変換されます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `code` - クライアントが分岐に使うコード（省略時は `kind` から導出）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `action` - ユーザーが取るべきアクション（オプション）
/// * `details` - フィールドエラーや再試行秒数（オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, code::ErrorCode};
///
/// let err = AppError::forbidden("CSRF token validation failed")
///     .with_code(ErrorCode::CsrfValidationFailed);
/// assert_eq!(err.status_code(), 403);
/// assert_eq!(err.code(), "CSRF_VALIDATION_FAILED");
/// ```
pub struct AppError {
    kind: ErrorKind,
    code: Option<ErrorCode>,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    details: Option<ErrorDetails>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            action: None,
            details: None,
            source: None,
        }
    }

    /// 400 Bad Request エラー
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 403 Forbidden エラー
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 429 Too Many Requests エラー
    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// 503 Service Unavailable エラー
    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// 400 + `VALIDATION_ERROR` + フィールドエラー
    pub fn validation(message: impl Into<Cow<'static, str>>, field_errors: FieldErrors) -> Self {
        Self::bad_request(message)
            .with_code(ErrorCode::ValidationError)
            .with_field_errors(field_errors)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// エラーコードを設定
    #[inline]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// ユーザー向けアクションを設定
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// フィールドエラーを設定
    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.details.get_or_insert_with(Default::default).field_errors = field_errors;
        self
    }

    /// 再試行までの秒数を設定（429 用）
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.details.get_or_insert_with(Default::default).retry_after = Some(secs);
        self
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// ワイヤ上の `error.code`
    pub fn code(&self) -> &'static str {
        match self.code {
            Some(code) => code.as_str(),
            None => self.kind.code(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// エンベロープの `error` オブジェクトに変換
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            message: self.message.to_string(),
            code: Some(self.code().to_string()),
            action: self.action.as_ref().map(|a| a.to_string()),
            details: self.details.clone(),
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("code", &self.code());
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
