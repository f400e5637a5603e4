//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: URLs already scheduled in a run
//! - `FrontierLevel`: ordered, de-duplicated URLs of one wave
//! - `CrawlState`: the per-run combination of both, advanced wave by wave

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, FrontierEntry, FrontierLevel, VisitedSet};
