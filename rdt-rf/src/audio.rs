//! Audio results of video jobs
//!
//! A video job may have a linked audio job. Its result only becomes
//! queryable after an explicit enable call:
//! 1. Resolve `audioRequestId` from the video job's detail
//! 2. Enable the audio result for the (audio, video) pair
//! 3. Fetch the audio result like any other job

use crate::fetcher::{distinct_ids, FetchSummary, ResultFetcher};
use rdt_common::api::{ApiClient, ApiError};
use rdt_common::AudioResultRecord;
use thiserror::Error;

/// Audio linking errors; each ends processing of one video id
#[derive(Debug, Error)]
pub enum AudioLinkError {
    #[error("Could not get audio request ID for video request ID {video_request_id}: {source}")]
    Resolve {
        video_request_id: String,
        #[source]
        source: ApiError,
    },

    #[error("No audio request ID linked to video request ID {0}")]
    MissingAudioRequestId(String),

    #[error("Could not enable audio results for audio request ID {audio_request_id}: {source}")]
    Enable {
        audio_request_id: String,
        #[source]
        source: ApiError,
    },

    #[error("Could not fetch audio request ID {audio_request_id}: {source}")]
    Fetch {
        audio_request_id: String,
        #[source]
        source: ApiError,
    },
}

/// Resolves, enables and fetches audio results
pub struct AudioLinker {
    fetcher: ResultFetcher,
}

impl AudioLinker {
    pub fn new(client: ApiClient) -> Self {
        Self {
            fetcher: ResultFetcher::new(client),
        }
    }

    /// Audio job id linked to a video job
    pub async fn resolve_audio_request_id(
        &self,
        video_request_id: &str,
    ) -> Result<String, AudioLinkError> {
        let item = self
            .fetcher
            .client()
            .media_detail(video_request_id)
            .await
            .map_err(|source| AudioLinkError::Resolve {
                video_request_id: video_request_id.to_string(),
                source,
            })?;

        item.audio_request_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AudioLinkError::MissingAudioRequestId(video_request_id.to_string()))
    }

    /// Resolve, enable and fetch the audio result of one video job
    pub async fn fetch_audio_result(
        &self,
        video_request_id: &str,
    ) -> Result<AudioResultRecord, AudioLinkError> {
        let audio_request_id = self.resolve_audio_request_id(video_request_id).await?;

        self.fetcher
            .client()
            .enable_audio_result(&audio_request_id, video_request_id)
            .await
            .map_err(|source| AudioLinkError::Enable {
                audio_request_id: audio_request_id.clone(),
                source,
            })?;

        let result = self
            .fetcher
            .fetch_one(&audio_request_id)
            .await
            .map_err(|source| AudioLinkError::Fetch {
                audio_request_id: audio_request_id.clone(),
                source,
            })?;

        Ok(AudioResultRecord {
            video_request_id: video_request_id.to_string(),
            result,
        })
    }

    /// Process each distinct video id once, in order, skipping blank ids
    pub async fn fetch_audio_many<'a, I>(
        &self,
        video_request_ids: I,
        out: &mut Vec<AudioResultRecord>,
    ) -> FetchSummary
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut summary = FetchSummary::default();

        for video_request_id in distinct_ids(video_request_ids) {
            summary.requested += 1;
            match self.fetch_audio_result(video_request_id).await {
                Ok(record) => {
                    summary.fetched += 1;
                    out.push(record);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!("{}", e);
                }
            }
        }

        summary
    }
}
