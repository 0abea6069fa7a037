//! Inquiry Entity

use chrono::{DateTime, Utc};
use kernel::id::InquiryId;

use crate::domain::schema::ContactForm;

/// A received contact inquiry
#[derive(Debug, Clone)]
pub struct Inquiry {
    pub inquiry_id: InquiryId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl Inquiry {
    /// Record an already validated form
    pub fn new(form: ContactForm) -> Self {
        Self {
            inquiry_id: InquiryId::new(),
            name: form.name,
            email: form.email,
            company: form.company,
            phone: form.phone,
            message: form.message,
            received_at: Utc::now(),
        }
    }
}
