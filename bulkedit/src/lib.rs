//! Batch metadata editor for Omeka S repositories.
//!
//! Curators describe a target selection and a list of add/replace/remove
//! rules in a recipe file; the editor previews the resulting field changes
//! and, on request, writes them back resource by resource. The architecture
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (resource model, patch
//!   computation, selection filters). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (REST client, config, recipe and
//!   report files). The client sits behind a trait to enable fakes in tests.
//!
//! Orchestration modules ([`select`], [`batch`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod batch;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod select;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
