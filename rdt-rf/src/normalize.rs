//! Conversion of API items into result rows

use rdt_common::api::MediaItem;
use rdt_common::{ResultRecord, UNABLE_TO_EVALUATE};

/// Normalize one API item into a [`ResultRecord`]
///
/// Never fails. A missing summary or status becomes
/// [`UNABLE_TO_EVALUATE`], a missing score stays `None` and a missing file
/// name becomes an empty string. `requested_id` (the id the item was
/// queried by) wins over the item's own `requestId`.
pub fn normalize(item: &MediaItem, requested_id: Option<&str>) -> ResultRecord {
    let summary = item.results_summary.as_ref();

    let status = summary
        .and_then(|s| s.status.clone())
        .unwrap_or_else(|| UNABLE_TO_EVALUATE.to_string());

    let score = summary
        .and_then(|s| s.metadata.as_ref())
        .and_then(|m| m.final_score);

    let request_id = requested_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| item.request_id.clone())
        .unwrap_or_default();

    ResultRecord {
        file_name: item.original_file_name.clone().unwrap_or_default(),
        request_id,
        status,
        score,
    }
}
