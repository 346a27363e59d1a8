//! Git bookkeeping for the release flow.

pub mod operations;

pub use operations::{Git2Operations, GitOperations};
