pub mod config;
pub mod error;
pub mod hashing;
pub mod source;
pub mod tracking;
pub mod types;

pub use config::TrackingConfig;
pub use error::{Result, TrackingError};
pub use hashing::{hash_lines, line_hash, LineHash};
pub use source::SourceHashHolder;
pub use tracking::{track_components, ComponentInput, ComponentResult, Tracker, TrackingResult};
pub use types::{NewIssue, ReferenceIssue, RuleKey};
