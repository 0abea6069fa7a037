//! In-memory Inquiry Repository

use dashmap::DashMap;
use kernel::id::InquiryId;
use uuid::Uuid;

use crate::domain::entities::Inquiry;
use crate::domain::repository::InquiryRepository;
use crate::error::{ContactError, ContactResult};

/// In-memory inquiry repository
#[derive(Debug, Default)]
pub struct MemoryInquiryRepository {
    inquiries: DashMap<Uuid, Inquiry>,
}

impl MemoryInquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InquiryRepository for MemoryInquiryRepository {
    async fn create(&self, inquiry: &Inquiry) -> ContactResult<()> {
        let key = *inquiry.inquiry_id.as_uuid();
        if self.inquiries.contains_key(&key) {
            return Err(ContactError::Internal(format!(
                "duplicate inquiry id {}",
                inquiry.inquiry_id
            )));
        }
        self.inquiries.insert(key, inquiry.clone());
        Ok(())
    }

    async fn find_by_id(&self, inquiry_id: &InquiryId) -> ContactResult<Option<Inquiry>> {
        Ok(self
            .inquiries
            .get(inquiry_id.as_uuid())
            .map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> ContactResult<usize> {
        Ok(self.inquiries.len())
    }
}
