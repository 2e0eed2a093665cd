//! CLI command implementations.

pub mod ask;
pub mod catalog;
pub mod init;
pub mod search;
