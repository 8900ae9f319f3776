//! termgram - Terminal Photo-Sharing Client Library
//!
//! A terminal client for a photo-sharing service: authentication, home feed,
//! post detail with image carousel, likes, comments, and profile editing.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
