//! Submit Function Seam
//!
//! Anything that turns form data into a submission result. Errors returned
//! here are unexpected failures (network, decoding); handled failures such as
//! validation errors come back as a failed result instead.

use crate::SubmissionResult;

/// Submit function
#[trait_variant::make(Submitter: Send)]
pub trait LocalSubmitter<T, D> {
    async fn submit(&self, data: T) -> anyhow::Result<SubmissionResult<D>>;
}

impl<T, D, F, Fut> Submitter<T, D> for F
where
    T: Send,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<SubmissionResult<D>>> + Send,
{
    async fn submit(&self, data: T) -> anyhow::Result<SubmissionResult<D>> {
        self(data).await
    }
}
