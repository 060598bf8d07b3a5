//! HTTP gateway to the rental service.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
