use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::Deserialize;
use url::Url;

use super::{ApiError, CaseApi, CaseCreated, CaseDraft};
use crate::config::Config;

const UPLOAD_PART: &str = "files";

/// [`CaseApi`] over HTTPS with cookie-based credentials.
#[derive(Debug, Clone)]
pub struct HttpCaseApi {
    client: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: Option<String>,
}

impl HttpCaseApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;
        let base = Url::parse(&config.api_base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl CaseApi for HttpCaseApi {
    async fn create_case(&self, draft: &CaseDraft) -> Result<CaseCreated, ApiError> {
        let url = self.endpoint(&["cases"])?;
        tracing::info!(%url, reference = %draft.client_reference, "creating case");
        let response = self.client.post(url).json(draft).send().await?;
        let response = check_status(response).await?;
        let created = response
            .json::<CaseCreated>()
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
        tracing::info!(case_id = %created.id, "case created");
        Ok(created)
    }

    async fn upload_attachments(&self, case_id: &str, files: &[PathBuf]) -> Result<(), ApiError> {
        if files.is_empty() {
            return Ok(());
        }
        let url = self.endpoint(&["cases", case_id, "files"])?;
        let mut form = Form::new();
        for path in files {
            let bytes = tokio::fs::read(path).await?;
            let part = Part::bytes(bytes)
                .file_name(file_name(path))
                .mime_str(mime_for(path))?;
            form = form.part(UPLOAD_PART, part);
        }
        tracing::info!(%url, count = files.len(), "uploading attachments");
        let response = self.client.post(url).multipart(form).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ServerMessage>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty());
    tracing::warn!(status = status.as_u16(), ?message, "server rejected request");
    Err(ApiError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string()
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "zip" => "application/zip",
        "stl" => "model/stl",
        "obj" => "model/obj",
        "ply" => "application/ply",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
