//! CLI command implementations.

pub mod circuit;
pub mod common;
pub mod interactions;
pub mod score;
pub mod solve;
pub mod tasks;
pub mod version;
