//! CLI command implementations.

pub mod init;
pub mod target;
pub mod validate;
