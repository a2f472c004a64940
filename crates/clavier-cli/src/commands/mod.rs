//! CLI command implementations.

pub mod modes;
pub mod render;
pub mod response;
