//! Application layer managing session and screen state.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the authentication session and its transitions, the navigation state, and
//! the per-screen buffers the UI renders.

pub mod session;
pub mod state;

pub use session::*;
pub use state::*;
