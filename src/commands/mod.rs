//! CLI command implementations

pub mod erase;
pub mod probe;
pub mod verify;
pub mod write;
