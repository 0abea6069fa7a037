//! Error Kind
//!
//! [`ErrorKind`] は「どの HTTP ステータスで返すか」だけを表す分類です。
//! クライアントが分岐に使う細かいコードは [`ErrorCode`](super::code::ErrorCode) 側で持ちます。

use serde::Serialize;

/// ステータス単位のエラー分類
///
/// ガード・問い合わせ・フォームクライアントが実際に返すものだけを並べています。
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
/// assert_eq!(ErrorKind::TooManyRequests.code(), "TOO_MANY_REQUESTS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 壊れた JSON・スキーマ違反
    BadRequest,
    /// CSRF 検証に失敗したリクエスト
    Forbidden,
    /// 固定ウィンドウの上限超過
    TooManyRequests,
    InternalServerError,
    /// 接続失敗など、時間を置けば回復しうるもの
    ServiceUnavailable,
}

impl ErrorKind {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Forbidden => 403,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    /// `ErrorCode` の指定がないときの `error.code`
    ///
    /// serde のシリアライズ結果と同じ綴りです。
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// 5xx ならログは error レベル
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
