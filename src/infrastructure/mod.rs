//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns: the HTTP
//! client for the photo-sharing API and file-backed token storage.

pub mod api;
pub mod token_store;

pub use api::*;
pub use token_store::*;
