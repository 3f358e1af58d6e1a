//! Runners wire an input source to the [`ProvisioningService`](crate::ProvisioningService).
//!
//! This module provides both a synchronous runner over files on disk and an
//! asynchronous runner over any tokio byte stream.
//!
mod async_runner;
mod sync_runner;

pub use async_runner::provision_async;
pub use sync_runner::provision_path;
