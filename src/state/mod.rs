//! State module for tracking crawl progress
//!
//! This module holds the only mutable state shared between concurrent jobs of
//! one crawl.
//!
//! # Components
//!
//! - `VisitedSet`: at-most-once claims for pages and resources
//! - `FolderLocks`: per-destination-folder locks for filename collision checks

mod folder_locks;
mod visited;

// Re-export main types
pub use folder_locks::FolderLocks;
pub use visited::VisitedSet;
