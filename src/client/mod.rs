// src/client/mod.rs
mod api;

pub use api::{ApiClient, ApiError, RequestOptions};
