//! Deterministic, pure logic of the batch mutation engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! resources and return deterministic outputs suitable for tests.

pub mod error;
pub mod filter;
pub mod patch;
pub mod resource;
pub mod types;
