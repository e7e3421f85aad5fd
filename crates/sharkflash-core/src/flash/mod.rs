//! High-level flash operations
//!
//! This module drives complete programming sessions: probe, erase, the
//! paged program loop, readback, and verification.

mod operations;

pub use operations::*;
