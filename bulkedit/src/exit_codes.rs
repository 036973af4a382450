//! Stable exit codes for bulkedit CLI commands.

/// Command succeeded (a preview or commit with no failed writes).
pub const OK: i32 = 0;
/// Command failed due to invalid config/recipe, a selection error or other errors.
pub const INVALID: i32 = 1;
/// `bulkedit run --commit` finished but one or more writes failed.
pub const PARTIAL: i32 = 2;
