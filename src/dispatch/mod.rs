//! Batch dispatch
//!
//! The [`Dispatcher`] owns one run: it prepares the target list, drives
//! each URL through the fetch client under its own concurrency bound and
//! partitions the outcomes into a [`BatchResult`].

mod batch;
mod dispatcher;

pub use batch::{BatchResult, BatchStats, FailedUrl};
pub use dispatcher::Dispatcher;
