//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

pub const ACCEPTED_MESSAGE: &str = "お問い合わせを受け付けました";

/// `data` of a successful POST /api/contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub message: String,
    pub inquiry_id: String,
}
