//! Submit Inquiry Use Case
//!
//! Validates a contact form and records it as an inquiry.

use kernel::id::InquiryId;
use kernel::validation::validate_fields;
use std::sync::Arc;

use crate::domain::entities::Inquiry;
use crate::domain::repository::InquiryRepository;
use crate::domain::schema::ContactForm;
use crate::error::{ContactError, ContactResult};

/// Submit inquiry output
#[derive(Debug, Clone)]
pub struct SubmitInquiryOutput {
    pub inquiry_id: InquiryId,
}

/// Submit inquiry use case
pub struct SubmitInquiryUseCase<R>
where
    R: InquiryRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitInquiryUseCase<R>
where
    R: InquiryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, form: ContactForm) -> ContactResult<SubmitInquiryOutput> {
        let form = form.normalized();
        validate_fields(&form).map_err(ContactError::Validation)?;

        let inquiry = Inquiry::new(form);
        self.repo.create(&inquiry).await?;

        tracing::info!(
            inquiry_id = %inquiry.inquiry_id,
            has_company = inquiry.company.is_some(),
            message_chars = inquiry.message.chars().count(),
            "Inquiry received"
        );

        Ok(SubmitInquiryOutput {
            inquiry_id: inquiry.inquiry_id,
        })
    }
}
