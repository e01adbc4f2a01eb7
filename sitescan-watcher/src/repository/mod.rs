//! Repository layer
//!
//! Repositories are stateless HTTP adapters that abstract communication with
//! the analysis backend. They expose exactly the two read operations the
//! watcher needs and no interpretation logic.
//!
//! The trait seam lets the tracker and reconciler be tested against scripted
//! in-memory backends.

mod scans;

pub use scans::{HttpScanRepository, ScanRepository};
