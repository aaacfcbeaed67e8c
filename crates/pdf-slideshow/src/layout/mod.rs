//! Layout calculation for the slideshow
//!
//! This module handles the pure part of assembly:
//! - Bucketing documents by orientation and page count
//! - Page order of the assembled document
//! - Display duration of every output page

mod buckets;
mod compose;

pub use buckets::*;
pub use compose::*;
