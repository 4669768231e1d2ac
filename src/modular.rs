//! Modular Artifact Index.
//!
//! Computes the set of binary-package filenames claimed by any module
//! stream's artifact list, used to distinguish modular from non-modular
//! candidates. Modular filenames are frozen once, at
//! [`Depsolver`](crate::Depsolver) construction, not re-queried per
//! iteration; the caller supplies them, typically by awaiting
//! [`modular_filenames_from_repos`] against whatever repos are known to
//! carry modular content.

use crate::config::ResolverConfig;
use crate::content::{bounded_fan_out, ContentQueryLayer};
use crate::types::{ModulemdUnit, Repo};

/// Converts one NEVRA-style artifact string
/// (`NAME-EPOCH:VERSION-RELEASE.ARCH`) into the filename it claims
/// (`NAME-VERSION-RELEASE.ARCH.rpm`), dropping the epoch segment.
///
/// Returns `None` if `artifact` does not contain the `:` that separates
/// epoch from version; malformed artifacts are skipped rather than
/// panicking.
fn artifact_to_filename(artifact: &str) -> Option<String> {
    let colon = artifact.find(':')?;
    let before_epoch = &artifact[..colon];
    let after_epoch = &artifact[colon + 1..];
    let dash = before_epoch.rfind('-')?;
    let name_and_version_prefix = &before_epoch[..dash];
    Some(format!("{name_and_version_prefix}-{after_epoch}.rpm"))
}

/// Unions the artifact filenames claimed by every modulemd in `modulemds`.
#[must_use]
pub fn modular_filenames<'a>(modulemds: impl IntoIterator<Item = &'a ModulemdUnit>) -> Vec<String> {
    modulemds
        .into_iter()
        .flat_map(|modulemd| modulemd.artifacts.iter())
        .filter_map(|artifact| artifact_to_filename(artifact))
        .collect()
}

/// Fetches every modulemd across `repos` through `content`, honoring
/// `config`'s fan-out tunables, and reduces the result to the filenames
/// those module streams claim.
///
/// A repository whose query fails or times out contributes no artifacts; it
/// is logged and otherwise treated as carrying no modular content, matching
/// how every other content-layer query degrades in this resolver.
pub async fn modular_filenames_from_repos<C: ContentQueryLayer>(
    content: &C,
    repos: &[Repo],
    config: &ResolverConfig,
) -> Vec<String> {
    let futures: Vec<_> = repos
        .iter()
        .map(|repo| {
            let repo = repo.clone();
            async move { content.modulemds(&repo).await }
        })
        .collect();

    let results = bounded_fan_out(futures, config.content_concurrency, config.query_timeout).await;

    let mut modulemds = Vec::new();
    for result in results {
        match result {
            Ok(units) => modulemds.extend(units),
            Err(err) => {
                log::debug!(target: "rpm_depsolver", "modulemds query failed: {err}");
            }
        }
    }
    modular_filenames(&modulemds)
}
