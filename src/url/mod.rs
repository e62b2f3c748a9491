//! URL handling module for Site-Mirror
//!
//! This module provides URL normalization for the visited sets and the
//! origin comparison that keeps a crawl on its starting host.

mod normalize;
mod origin;

// Re-export main functions
pub use normalize::{normalize_url, resolve_href};
pub use origin::Origin;
