use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("YouTube rejected the upload ({status}): {detail}")]
    Rejected { status: StatusCode, detail: String },
}

#[derive(Debug, Clone)]
pub struct UploadMeta {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

/// Publishing target for finished videos. Authentication happens once per
/// batch; the returned client is reused for every upload in the run.
pub trait VideoHost {
    type Client;

    async fn authenticate(
        &self,
        client_secrets_file: &Path,
        token_file: &Path,
    ) -> anyhow::Result<Self::Client>;

    async fn upload(
        &self,
        client: &Self::Client,
        video_path: &Path,
        meta: &UploadMeta,
    ) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct ClientSecrets {
    installed: InstalledApp,
}

#[derive(Debug, Deserialize)]
struct InstalledApp {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: Status<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    category_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status<'a> {
    privacy_status: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// YouTube Data API v3 over plain HTTP. The interactive consent flow is out
/// of scope; a refresh token must already be provisioned in the token file.
pub struct YouTube {
    client: reqwest::Client,
}

pub struct YouTubeClient {
    access_token: String,
}

impl YouTube {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl VideoHost for YouTube {
    type Client = YouTubeClient;

    async fn authenticate(
        &self,
        client_secrets_file: &Path,
        token_file: &Path,
    ) -> anyhow::Result<YouTubeClient> {
        let secrets: ClientSecrets = serde_json::from_str(
            &fs::read_to_string(client_secrets_file).map_err(|e| {
                anyhow::anyhow!(
                    "Cannot read client secrets file {}: {}",
                    client_secrets_file.display(),
                    e
                )
            })?,
        )?;
        let stored: StoredToken =
            serde_json::from_str(&fs::read_to_string(token_file).map_err(|e| {
                anyhow::anyhow!(
                    "Cannot read token file {}: {} (provision a refresh token first)",
                    token_file.display(),
                    e
                )
            })?)?;

        debug!("Refreshing YouTube access token");
        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", secrets.installed.client_id.as_str()),
                ("client_secret", secrets.installed.client_secret.as_str()),
                ("refresh_token", stored.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let token: TokenResponse = response.json().await?;

        // persist the refreshed credentials next to the old ones
        if let Some(parent) = token_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let updated = StoredToken {
            refresh_token: stored.refresh_token,
            access_token: Some(token.access_token.clone()),
        };
        fs::write(token_file, serde_json::to_string_pretty(&updated)?)?;

        Ok(YouTubeClient {
            access_token: token.access_token,
        })
    }

    async fn upload(
        &self,
        client: &YouTubeClient,
        video_path: &Path,
        meta: &UploadMeta,
    ) -> anyhow::Result<String> {
        let body = VideoResource {
            snippet: Snippet {
                title: &meta.title,
                description: &meta.description,
                tags: &meta.tags,
                category_id: &meta.category_id,
            },
            status: Status {
                privacy_status: &meta.privacy_status,
            },
        };

        let response = self
            .client
            .post(UPLOAD_ENDPOINT)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(&client.access_token)
            .json(&body)
            .send()
            .await
            .map_err(UploadError::Http)?;
        if !response.status().is_success() {
            return Err(rejection(response).await.into());
        }
        let session_url = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow::anyhow!("YouTube did not return a resumable session URL"))?
            .to_string();

        debug!("Uploading {} to resumable session", video_path.display());
        let bytes = fs::read(video_path)?;
        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&client.access_token)
            .header(CONTENT_TYPE, "video/mp4")
            .body(bytes)
            .send()
            .await
            .map_err(UploadError::Http)?;
        if !response.status().is_success() {
            return Err(rejection(response).await.into());
        }

        let parsed: UploadResponse = response.json().await?;
        info!("Upload complete, video id {}", parsed.id);
        Ok(parsed.id)
    }
}

async fn rejection(response: reqwest::Response) -> UploadError {
    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    UploadError::Rejected { status, detail }
}
