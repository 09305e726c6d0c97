//! rdt-rf library interface
//!
//! Fetches analysis results for jobs created by rdt-up, either one id at a
//! time or by paging through every job visible to the API key, and resolves
//! the audio results linked to video jobs.

pub mod audio;
pub mod fetcher;
pub mod normalize;
pub mod pagination;

pub use audio::{AudioLinkError, AudioLinker};
pub use fetcher::{FetchSummary, ListingEnd, ListingSummary, ResultFetcher};
pub use normalize::normalize;
pub use pagination::PageCursor;
