//! Output Assembler & Exporter.
//!
//! Deduplicates the accumulated binary and source selection per source
//! repository and returns a mapping from repository identifier to the list
//! of selected units. The union of `output_set` and `srpm_output_set` is
//! partitioned by `associate_source_repo_id`; both RPMs and SRPMs are
//! emitted through the same call.

use std::collections::{HashMap, HashSet};

use crate::types::WrappedUnit;

/// Partitions `units` by `associate_source_repo_id`, deduplicating within
/// each partition by the underlying unit's identity (`WrappedUnit`'s
/// `Hash`/`Eq` already ignore `associate_source_repo_id`, so this function
/// does not need to re-derive an identity key).
#[must_use]
pub fn export(units: impl IntoIterator<Item = WrappedUnit>) -> HashMap<String, Vec<WrappedUnit>> {
    let mut buckets: HashMap<String, HashSet<WrappedUnit>> = HashMap::new();
    for unit in units {
        buckets
            .entry(unit.associate_source_repo_id.clone())
            .or_default()
            .insert(unit);
    }
    buckets
        .into_iter()
        .map(|(repo_id, units)| (repo_id, units.into_iter().collect()))
        .collect()
}
