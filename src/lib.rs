//! Member Journey Viewer: load a member's coaching snapshot from local
//! files or a live API, correlate episodes, conversations, and extracted
//! decisions, and project timeline, search, and summary views over it.

pub mod config;
pub mod fetch;
pub mod ingest;
pub mod link;
pub mod model;
pub mod output;
pub mod search;
pub mod summary;
pub mod timeline;
