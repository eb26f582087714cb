//! Builds the labeled training set by querying image search APIs and
//! downloading the results into per-class directories.

pub mod download;
pub mod session;
pub mod sources;

pub use session::{ScrapeReport, ScrapeSession};
pub use sources::{available_sources, ImageSource, SourceError};
