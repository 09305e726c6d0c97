//! Output rows produced by the tools

use crate::table::Table;

/// Status written when a result carries no summary status
pub const UNABLE_TO_EVALUATE: &str = "UNABLE_TO_EVALUATE";

/// One successfully uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    /// Base name of the uploaded file
    pub file_name: String,
    /// Job id assigned by the API
    pub request_id: String,
    /// Path the file was read from
    pub file_path: String,
}

impl UploadRecord {
    pub const HEADERS: [&'static str; 3] = ["file_name", "request_id", "file_path"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.file_name.clone(),
            self.request_id.clone(),
            self.file_path.clone(),
        ]
    }
}

/// Normalized analysis result for one job
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub file_name: String,
    pub request_id: String,
    /// Provider status code, or [`UNABLE_TO_EVALUATE`]
    pub status: String,
    /// Final score; `None` when the API reported none
    pub score: Option<f64>,
}

impl ResultRecord {
    pub const HEADERS: [&'static str; 4] = ["file_name", "request_id", "status", "score"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.file_name.clone(),
            self.request_id.clone(),
            self.status.clone(),
            format_score(self.score),
        ]
    }
}

/// Audio result resolved from a video job
#[derive(Debug, Clone, PartialEq)]
pub struct AudioResultRecord {
    /// Job id of the video the audio track came from
    pub video_request_id: String,
    /// Result of the audio job; `result.request_id` is the audio job id
    pub result: ResultRecord,
}

impl AudioResultRecord {
    pub const HEADERS: [&'static str; 5] = [
        "video_request_id",
        "audio_request_id",
        "file_name",
        "status",
        "score",
    ];

    pub fn audio_request_id(&self) -> &str {
        &self.result.request_id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.video_request_id.clone(),
            self.result.request_id.clone(),
            self.result.file_name.clone(),
            self.result.status.clone(),
            format_score(self.result.score),
        ]
    }
}

/// Empty cell for a missing score, shortest round-trip text otherwise
fn format_score(score: Option<f64>) -> String {
    score.map(|s| s.to_string()).unwrap_or_default()
}

impl From<&[UploadRecord]> for Table {
    fn from(records: &[UploadRecord]) -> Self {
        let mut table = Table::with_headers(&UploadRecord::HEADERS);
        for record in records {
            table.push_row(record.cells());
        }
        table
    }
}

impl From<&[ResultRecord]> for Table {
    fn from(records: &[ResultRecord]) -> Self {
        let mut table = Table::with_headers(&ResultRecord::HEADERS);
        for record in records {
            table.push_row(record.cells());
        }
        table
    }
}

impl From<&[AudioResultRecord]> for Table {
    fn from(records: &[AudioResultRecord]) -> Self {
        let mut table = Table::with_headers(&AudioResultRecord::HEADERS);
        for record in records {
            table.push_row(record.cells());
        }
        table
    }
}
