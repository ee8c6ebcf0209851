//! Acquisition layer: endpoint descriptors, the shared HTTP client, and the
//! fetch-or-default helper that turns every upstream failure into an empty
//! payload.

pub mod endpoint;
pub mod fetcher;
pub mod http_client;
