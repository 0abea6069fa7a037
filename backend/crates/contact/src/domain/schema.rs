//! Contact Form Schema
//!
//! Field rules and the messages shown next to each field. The same struct is
//! the request body of `POST /api/contact` and the client-side form input.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const NAME_MAX_CHARS: u64 = 50;
pub const EMAIL_MAX_CHARS: u64 = 254;
pub const COMPANY_MAX_CHARS: u64 = 100;
pub const PHONE_MAX_CHARS: u64 = 20;
pub const MESSAGE_MIN_CHARS: u64 = 10;
pub const MESSAGE_MAX_CHARS: u64 = 2000;

/// Contact form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 1, max = 50, message = "お名前は1〜50文字で入力してください"))]
    pub name: String,

    #[validate(
        email(message = "有効なメールアドレスを入力してください"),
        length(max = 254, message = "メールアドレスは254文字以内で入力してください")
    )]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "会社名は100文字以内で入力してください"))]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 20, message = "電話番号は20文字以内で入力してください"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "お問い合わせ内容は10〜2000文字で入力してください"
    ))]
    pub message: String,
}

impl ContactForm {
    /// Trim every field; blank optional fields become `None`
    pub fn normalized(self) -> Self {
        fn optional(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: optional(self.company),
            phone: optional(self.phone),
            message: self.message.trim().to_string(),
        }
    }
}

/// Digits, `+`, `-` and spaces only
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let valid = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("電話番号の形式が正しくありません")))
    }
}
