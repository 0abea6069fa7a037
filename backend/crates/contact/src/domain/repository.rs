//! Repository Traits
//!
//! Interfaces for inquiry persistence. Implementations are in the infra layer.

use kernel::id::InquiryId;

use crate::domain::entities::Inquiry;
use crate::error::ContactResult;

/// Inquiry repository trait
#[trait_variant::make(InquiryRepository: Send)]
pub trait LocalInquiryRepository {
    /// Store a new inquiry
    async fn create(&self, inquiry: &Inquiry) -> ContactResult<()>;

    /// Find inquiry by ID
    async fn find_by_id(&self, inquiry_id: &InquiryId) -> ContactResult<Option<Inquiry>>;

    /// Number of stored inquiries
    async fn count(&self) -> ContactResult<usize>;
}
