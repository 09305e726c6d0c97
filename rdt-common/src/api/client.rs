//! Analysis API client
//!
//! One method per endpoint, one request per call. Retrying is left to the
//! caller so each tool can apply its own policy.

use super::types::{
    EnableAudioRequest, MediaItem, MediaPage, UploadTarget, UploadTargetRequest,
    UploadTargetResponse,
};
use crate::config::ClientConfig;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("rdt/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key (header names are case-insensitive)
pub const API_KEY_HEADER: &str = "x-api-key";

pub const UPLOAD_TARGET_PATH: &str = "/api/files/aws-presigned";
pub const MEDIA_PATH: &str = "/api/media/users";
pub const ENABLE_AUDIO_PATH: &str = "/api/files/show-audio-result";

/// API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Gateway failures that are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::BAD_GATEWAY.as_u16())
    }
}

/// Analysis API client
pub struct ApiClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask for a signed URL to write `file_name` to
    ///
    /// Anything but 200 is an error; callers decide whether a 502 is retried.
    pub async fn create_upload_target(&self, file_name: &str) -> Result<UploadTarget, ApiError> {
        tracing::debug!(file = %file_name, "Requesting upload target");

        let request = self
            .http_client
            .post(self.config.endpoint(UPLOAD_TARGET_PATH))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&UploadTargetRequest { file_name });
        let response = self.send(request, self.config.request_timeout).await?;

        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }

        let body: UploadTargetResponse = parse_body(response).await?;
        let signed_url = body
            .response
            .and_then(|r| r.signed_url)
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::MissingField("response.signedUrl"))?;
        let request_id = body
            .request_id
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingField("requestId"))?;

        Ok(UploadTarget {
            signed_url,
            request_id,
        })
    }

    /// PUT raw bytes to a signed URL
    ///
    /// The URL is pre-authorized, so no API key is sent. Uses the transfer
    /// timeout instead of the general request timeout.
    pub async fn put_signed(&self, signed_url: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        let timeout = self.config.transfer_timeout;
        let request = self
            .http_client
            .put(signed_url)
            .timeout(timeout)
            .body(bytes);
        let response = self.send(request, timeout).await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    /// Fetch one job by id
    pub async fn media_detail(&self, request_id: &str) -> Result<MediaItem, ApiError> {
        let mut url = Url::parse(&self.config.endpoint(MEDIA_PATH))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.config.base_url.clone()))?
            .push(request_id);

        tracing::debug!(request_id = %request_id, "Fetching media detail");
        let request = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key);
        self.get_json(request).await
    }

    /// Fetch one page of every job visible to the API key
    pub async fn media_page(&self, page_index: u32) -> Result<MediaPage, ApiError> {
        tracing::debug!(page_index, "Fetching media listing page");
        let request = self
            .http_client
            .get(self.config.endpoint(MEDIA_PATH))
            .query(&[("pageIndex", page_index)])
            .header(API_KEY_HEADER, &self.config.api_key);
        self.get_json(request).await
    }

    /// Make the audio result linked to a video job queryable
    pub async fn enable_audio_result(
        &self,
        audio_request_id: &str,
        video_request_id: &str,
    ) -> Result<(), ApiError> {
        tracing::debug!(
            audio_request_id = %audio_request_id,
            video_request_id = %video_request_id,
            "Enabling audio result"
        );
        let request = self
            .http_client
            .post(self.config.endpoint(ENABLE_AUDIO_PATH))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&EnableAudioRequest {
                audio_request_id,
                video_request_id,
            });
        let response = self.send(request, self.config.request_timeout).await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request, self.config.request_timeout).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        parse_body(response).await
    }

    async fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<Response, ApiError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(timeout)
            } else {
                ApiError::Network(e.to_string())
            }
        })
    }
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status { status, body }
}

async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}
