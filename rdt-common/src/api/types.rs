//! Response bodies of the analysis API
//!
//! Every field is optional and tolerant: a missing field, `null` or a value
//! of the wrong type deserializes as `None`. Defaults are applied where the
//! value is used, so one malformed field never fails a whole response.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for the upload-target endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargetRequest<'a> {
    pub file_name: &'a str,
}

/// Response of the upload-target endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargetResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub response: Option<SignedUrlBody>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlBody {
    #[serde(default, deserialize_with = "lenient")]
    pub signed_url: Option<String>,
}

/// Write location and job id for one file, both present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub signed_url: String,
    pub request_id: String,
}

/// One analysis job as returned by the media endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_file_name: Option<String>,
    /// Set on video jobs that have a linked audio job
    #[serde(default, deserialize_with = "lenient_id")]
    pub audio_request_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub results_summary: Option<ResultsSummary>,
}

/// Outcome status and scoring metadata of a job
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<SummaryMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    #[serde(default, deserialize_with = "lenient_score")]
    pub final_score: Option<f64>,
}

/// One page of the job listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPage {
    #[serde(alias = "mediaList", default, deserialize_with = "lenient_items")]
    pub data: Option<Vec<MediaItem>>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_pages: Option<u32>,
}

impl MediaPage {
    /// Items on this page; a missing list is an empty page
    pub fn items(&self) -> &[MediaItem] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// Request body for the audio-enable endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableAudioRequest<'a> {
    pub audio_request_id: &'a str,
    pub video_request_id: &'a str,
}

/// Any value of the wrong type is treated as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Job ids may arrive as strings or numbers
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}

/// Numeric score, or a numeric string; placeholders such as "N/A" are absent
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(score) => score.as_f64(),
        Value::String(score) => score.trim().parse().ok().filter(|s: &f64| s.is_finite()),
        _ => None,
    })
}

/// Item list where an entry that is not an object is skipped on its own
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<MediaItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let items = values
        .into_iter()
        .filter_map(|value| match MediaItem::deserialize(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed media item: {}", e);
                None
            }
        })
        .collect();
    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_tolerates_missing_fields() {
        let item: MediaItem = serde_json::from_str("{}").unwrap();
        assert!(item.request_id.is_none());
        assert!(item.results_summary.is_none());

        let item: MediaItem = serde_json::from_str(
            r#"{"requestId":"r1","originalFileName":"a.mp4",
                "resultsSummary":{"status":"FAKE","metadata":{"finalScore":0.9}}}"#,
        )
        .unwrap();
        let summary = item.results_summary.unwrap();
        assert_eq!(summary.status.as_deref(), Some("FAKE"));
        assert_eq!(summary.metadata.unwrap().final_score, Some(0.9));
    }

    #[test]
    fn test_media_item_accepts_null_score() {
        let item: MediaItem = serde_json::from_str(
            r#"{"resultsSummary":{"status":"PROCESSING","metadata":{"finalScore":null}}}"#,
        )
        .unwrap();
        assert_eq!(item.results_summary.unwrap().metadata.unwrap().final_score, None);
    }

    #[test]
    fn test_media_page_accepts_either_list_name() {
        let page: MediaPage =
            serde_json::from_str(r#"{"mediaList":[{"requestId":"a"}],"totalPages":3}"#).unwrap();
        assert_eq!(page.items().len(), 1);
        assert_eq!(page.total_pages, Some(3));

        let page: MediaPage = serde_json::from_str(r#"{"data":[{"requestId":"b"},{"requestId":"c"}]}"#).unwrap();
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.items()[0].request_id.as_deref(), Some("b"));

        let page: MediaPage = serde_json::from_str(r#"{"totalPages":1}"#).unwrap();
        assert!(page.items().is_empty());
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let body = serde_json::to_value(UploadTargetRequest { file_name: "a.mp4" }).unwrap();
        assert_eq!(body, serde_json::json!({"fileName": "a.mp4"}));

        let body = serde_json::to_value(EnableAudioRequest {
            audio_request_id: "a1",
            video_request_id: "v1",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"audioRequestId": "a1", "videoRequestId": "v1"})
        );
    }

    #[test]
    fn test_mistyped_fields_become_absent() {
        let item: MediaItem = serde_json::from_str(
            r#"{"requestId":42,"originalFileName":7,"audioRequestId":null,
                "resultsSummary":{"status":["FAKE"],"metadata":{"finalScore":"N/A"}}}"#,
        )
        .unwrap();
        assert_eq!(item.request_id.as_deref(), Some("42"));
        assert!(item.original_file_name.is_none());
        assert!(item.audio_request_id.is_none());
        let summary = item.results_summary.unwrap();
        assert!(summary.status.is_none());
        assert_eq!(summary.metadata.unwrap().final_score, None);

        let item: MediaItem =
            serde_json::from_str(r#"{"resultsSummary":{"metadata":{"finalScore":"0.25"}}}"#).unwrap();
        assert_eq!(item.results_summary.unwrap().metadata.unwrap().final_score, Some(0.25));

        let item: MediaItem = serde_json::from_str(r#"{"resultsSummary":"pending"}"#).unwrap();
        assert!(item.results_summary.is_none());
    }

    #[test]
    fn test_media_page_skips_malformed_items() {
        let page: MediaPage = serde_json::from_str(
            r#"{"data":[{"requestId":"a"},"junk",{"requestId":"b","resultsSummary":{"metadata":{"finalScore":"N/A"}}}],
                "totalPages":"two"}"#,
        )
        .unwrap();
        let ids: Vec<_> = page.items().iter().map(|i| i.request_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b")]);
        assert_eq!(page.total_pages, None);

        let page: MediaPage = serde_json::from_str(r#"{"data":{"requestId":"a"},"totalPages":2}"#).unwrap();
        assert!(page.items().is_empty());
        assert_eq!(page.total_pages, Some(2));
    }

    #[test]
    fn test_upload_target_with_numeric_request_id() {
        let body: UploadTargetResponse = serde_json::from_str(
            r#"{"response":{"signedUrl":"https://bucket/x"},"requestId":123}"#,
        )
        .unwrap();
        assert_eq!(body.request_id.as_deref(), Some("123"));
        assert_eq!(
            body.response.unwrap().signed_url.as_deref(),
            Some("https://bucket/x")
        );
    }
}
