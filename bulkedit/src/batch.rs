//! Orchestration for a single batch run.

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::error::TransformError;
use crate::core::patch::{apply_rules, diff};
use crate::core::types::{
    BatchReport, ChangeRecord, EditRule, FailureRecord, Mode, SelectionCriteria,
};
use crate::io::client::ResourceClient;
use crate::select::resolve_all;

/// Apply `rules` to every selected resource.
///
/// Resources the rules leave unchanged are skipped. In [`Mode::Preview`] the
/// client is only read from and each change is reported with its field diff.
/// In [`Mode::Commit`] each changed resource is patched; a failed write is
/// recorded in [`BatchReport::failed`] and the batch moves on. Selection and
/// transform errors abort the run.
#[instrument(skip_all, fields(mode = ?mode, rules = rules.len()))]
pub fn run_batch<C: ResourceClient + ?Sized>(
    client: &C,
    criteria: &SelectionCriteria,
    rules: &[EditRule],
    mode: Mode,
) -> Result<BatchReport> {
    for rule in rules.iter().filter(|rule| !rule.action.is_recognized()) {
        warn!(action = %rule.action, term = %rule.term, "ignoring unrecognized action");
    }

    let resources = resolve_all(criteria, client).context("resolve selection")?;
    info!(count = resources.len(), "resources selected");

    let mut report = BatchReport::default();
    for resource in &resources {
        let id = resource.id().ok_or(TransformError::MissingId)?;
        let updated =
            apply_rules(resource, rules).with_context(|| format!("apply rules to {id}"))?;
        if updated == *resource {
            debug!(id, "no change");
            continue;
        }

        let kind = resource.kind();
        match mode {
            Mode::Preview => report.changed.push(ChangeRecord::Preview {
                id,
                kind,
                title: resource.title().to_string(),
                diff: diff(resource, &updated),
            }),
            Mode::Commit => match client.patch(kind, id, &updated) {
                Ok(()) => report.changed.push(ChangeRecord::Committed { id }),
                Err(err) => {
                    warn!(id, error = %err, "write failed");
                    report.failed.push(FailureRecord {
                        id,
                        message: err.to_string(),
                    });
                }
            },
        }
    }

    info!(
        changed = report.changed.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}
