//! Core data types, the forecast source seam and daily rollups
//!
//! Everything here is free of I/O so the client, storage and HTTP crates
//! can share one vocabulary for readings and averages.

pub mod rollups;
pub mod source;
pub mod types;

pub use rollups::*;
pub use source::*;
pub use types::*;
