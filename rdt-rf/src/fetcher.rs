//! Result fetching
//!
//! Two request shapes:
//! - direct: one job by id
//! - listing: every job visible to the API key, page by page
//!
//! Records are appended to a caller-owned vector. A failed item or page is
//! logged and never aborts the batch.

use crate::normalize::normalize;
use crate::pagination::PageCursor;
use rdt_common::api::{ApiClient, ApiError};
use rdt_common::ResultRecord;
use std::collections::HashSet;

/// Outcome counts for a batch of direct fetches
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub requested: usize,
    pub fetched: usize,
    pub failed: usize,
}

/// Why a listing walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingEnd {
    /// Reached the reported total page count
    LastPage,
    /// A page came back with no items
    EmptyPage { page_index: u32 },
    /// A page request failed; later pages were not requested
    PageFailed { page_index: u32 },
}

/// Outcome of a listing walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSummary {
    /// Pages fetched successfully (including a final empty one)
    pub pages: u32,
    /// Records appended
    pub records: usize,
    pub end: ListingEnd,
}

/// Fetches and normalizes analysis results
pub struct ResultFetcher {
    client: ApiClient,
}

impl ResultFetcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the result of one job
    pub async fn fetch_one(&self, request_id: &str) -> Result<ResultRecord, ApiError> {
        tracing::info!(request_id = %request_id, "Fetching result");
        let item = self.client.media_detail(request_id).await?;
        Ok(normalize(&item, Some(request_id)))
    }

    /// Fetch each distinct id once, in first-seen order, skipping blank ids
    pub async fn fetch_many<'a, I>(&self, request_ids: I, out: &mut Vec<ResultRecord>) -> FetchSummary
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut summary = FetchSummary::default();

        for request_id in distinct_ids(request_ids) {
            summary.requested += 1;
            match self.fetch_one(request_id).await {
                Ok(record) => {
                    summary.fetched += 1;
                    out.push(record);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(request_id = %request_id, "Failed to fetch result: {}", e);
                }
            }
        }

        summary
    }

    /// Walk the listing of every job, appending one record per item
    pub async fn fetch_all(&self, out: &mut Vec<ResultRecord>) -> ListingSummary {
        let mut cursor = PageCursor::new();
        let mut pages = 0;
        let mut records = 0;

        let end = loop {
            let page_index = cursor.page_index();
            tracing::info!(page_index, "Getting page");

            let page = match self.client.media_page(page_index).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(page_index, "Failed to fetch page: {}", e);
                    break ListingEnd::PageFailed { page_index };
                }
            };
            pages += 1;

            let items = page.items();
            records += items.len();
            out.extend(items.iter().map(|item| normalize(item, None)));

            if !cursor.advance(items.len(), page.total_pages) {
                if items.is_empty() {
                    tracing::info!(page_index, "No data found on page");
                    break ListingEnd::EmptyPage { page_index };
                }
                break ListingEnd::LastPage;
            }
        };

        tracing::info!(
            pages,
            records,
            total_pages = cursor.total_pages(),
            "Listing complete"
        );

        ListingSummary { pages, records, end }
    }
}

/// Trimmed, non-blank ids with repeats removed, in first-seen order
pub(crate) fn distinct_ids<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| {
            let first = seen.insert(*id);
            if !first {
                tracing::debug!(request_id = %id, "Skipping repeated id");
            }
            first
        })
        .collect()
}
