//! Support library for the `sift` binary.
//!
//! Everything search related lives in `sift-core`; this crate only supplies
//! what a host needs around it: a corpus built from a directory tree, the
//! platform directories and logger setup.

pub mod app_dirs;
pub mod indexing;
pub mod logging;

pub use indexing::{IndexOptions, build_corpus};
