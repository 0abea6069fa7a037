//! Application Layer - Use Cases

pub mod submit_inquiry;

pub use submit_inquiry::{SubmitInquiryOutput, SubmitInquiryUseCase};
