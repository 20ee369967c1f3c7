//! REST boundary of the case-creation wizard.

pub mod error;
pub mod http;
pub mod models;

use std::path::PathBuf;

use async_trait::async_trait;

pub use error::ApiError;
pub use http::HttpCaseApi;
pub use models::{CaseCreated, CaseDraft, PatientPayload};

/// Server operations the wizard's final step depends on.
#[async_trait]
pub trait CaseApi: Send + Sync {
    async fn create_case(&self, draft: &CaseDraft) -> Result<CaseCreated, ApiError>;

    async fn upload_attachments(&self, case_id: &str, files: &[PathBuf]) -> Result<(), ApiError>;
}
