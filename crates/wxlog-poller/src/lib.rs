//! Latest-reading cache and the periodic poller that feeds it

pub mod cache;
pub mod poller;

pub use cache::*;
pub use poller::*;
