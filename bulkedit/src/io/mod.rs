//! I/O helpers: the remote client, config, recipe and report files.

pub mod client;
pub mod config;
pub mod recipe;
pub mod report;
pub mod values;
