//! CustomClean - Decision-Replay Directory Cleaner
//!
//! CustomClean removes unwanted files, folders, and links from a target directory based on a
//! cleaning document produced by the CustomClean GUI. The document records a one-time,
//! human-reviewed keep/delete decision for every entry in an example directory tree, together
//! with a list of naming patterns; replaying it against a structurally similar directory
//! deletes exactly the entries marked "delete", including across sibling folders whose names
//! differ only by a numeric suffix (a wildcard in a pattern stands for a run of digits).
//!
//! ## Architecture
//!
//! - Document loading and tree validation (`document`)
//! - Tree model and deletion-plan aggregation (`tree`)
//! - Pattern generalization and filesystem expansion (`pattern`)
//! - Ordered removal with per-category failure reporting (`remove`)

pub mod document;
pub mod error;
pub mod pattern;
pub mod remove;
pub mod tree;

// Re-export commonly used items
pub use document::{load, Document};
pub use error::CleanError;
pub use pattern::{expand, generalize, PatternSet, Target};
pub use remove::{remove_targets, RemovalReport, RemovedKind};
pub use tree::{aggregate, DeletionPlan, EntryState, Node};
