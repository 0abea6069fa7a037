//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kernel::response::ApiResponse;
use std::sync::Arc;

use crate::application::SubmitInquiryUseCase;
use crate::domain::repository::InquiryRepository;
use crate::domain::schema::ContactForm;
use crate::error::{ContactError, ContactResult};
use crate::presentation::dto::{ACCEPTED_MESSAGE, ContactResponse};

/// Shared state for contact handlers
pub struct ContactState<R>
where
    R: InquiryRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> ContactState<R>
where
    R: InquiryRepository + Send + Sync + 'static,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

impl<R> Clone for ContactState<R>
where
    R: InquiryRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// POST /api/contact
pub async fn submit_contact<R>(
    State(state): State<ContactState<R>>,
    body: Result<Json<ContactForm>, JsonRejection>,
) -> ContactResult<Json<ApiResponse<ContactResponse>>>
where
    R: InquiryRepository + Send + Sync + 'static,
{
    let Json(form) = body.map_err(|e| ContactError::MalformedBody(e.body_text()))?;

    let output = SubmitInquiryUseCase::new(state.repo.clone())
        .execute(form)
        .await?;

    Ok(Json(ApiResponse::success(ContactResponse {
        message: ACCEPTED_MESSAGE.to_string(),
        inquiry_id: output.inquiry_id.to_string(),
    })))
}
