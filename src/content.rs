//! Content Query Layer: the asynchronous, batched abstraction over a remote
//! content service that the resolver core consumes.
//!
//! The core only requires that queries can be awaited and their results
//! aggregated; queueing discipline and transport are this layer's concern.
//! [`bounded_fan_out`] realizes the concurrency shape the resolver expects:
//! a fixed number of in-flight futures, refilled from a pending queue as
//! each completes, with a timeout applied to every individual query.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::types::{BinaryUnit, ModulemdUnit, Repo};

/// An error from a single content-layer query.
///
/// Every variant is treated by the resolver as "zero units returned" for
/// the affected query, surfacing as a "not found" diagnostic rather than
/// aborting `run` (see the crate's error handling design).
#[derive(Debug, thiserror::Error)]
pub enum ContentQueryError {
    /// The query did not complete within its configured timeout.
    #[error("query timed out")]
    Timeout,
    /// The underlying transport reported a failure.
    #[error("content service query failed: {0}")]
    Transport(String),
}

/// Three batched, asynchronous operations against a remote content service.
///
/// An implementation may fan queries out internally (worker pool, thread
/// pool, async tasks); it need only present futures whose completion is
/// visible to the single driving task.
pub trait ContentQueryLayer: Send + Sync {
    /// Returns every unit in `repo` whose name is in `names`.
    fn units_by_name(
        &self,
        repo: &Repo,
        names: &HashSet<String>,
    ) -> impl Future<Output = Result<Vec<BinaryUnit>, ContentQueryError>> + Send;

    /// Returns every unit in `repo` whose `provides` contains any name in
    /// `atoms` (name-level match is sufficient).
    fn units_providing(
        &self,
        repo: &Repo,
        atoms: &HashSet<String>,
    ) -> impl Future<Output = Result<Vec<BinaryUnit>, ContentQueryError>> + Send;

    /// Returns every modulemd unit in `repo`.
    fn modulemds(
        &self,
        repo: &Repo,
    ) -> impl Future<Output = Result<Vec<ModulemdUnit>, ContentQueryError>> + Send;
}

/// Runs `tasks` with at most `concurrency` in flight at once, applying
/// `timeout` to each. A task that times out resolves to
/// [`ContentQueryError::Timeout`] rather than being dropped, so callers
/// always get one result per input task; the order of results matches
/// completion order, not input order.
pub async fn bounded_fan_out<T, Fut>(
    tasks: Vec<Fut>,
    concurrency: usize,
    timeout: Duration,
) -> Vec<Result<T, ContentQueryError>>
where
    Fut: Future<Output = Result<T, ContentQueryError>>,
{
    let mut pending = VecDeque::from(tasks);
    let mut in_flight = FuturesUnordered::new();
    let mut results = Vec::with_capacity(pending.len());

    loop {
        while in_flight.len() < concurrency.max(1) {
            let Some(task) = pending.pop_front() else {
                break;
            };
            in_flight.push(async move {
                match tokio::time::timeout(timeout, task).await {
                    Ok(result) => result,
                    Err(_) => Err(ContentQueryError::Timeout),
                }
            });
        }

        let Some(result) = in_flight.next().await else {
            break;
        };
        results.push(result);
    }

    results
}

/// A fixed, in-memory catalog implementing [`ContentQueryLayer`].
///
/// Used by the test suite and by any caller content with a static snapshot
/// of repository contents rather than a live transport.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentLayer {
    units: HashMap<String, Vec<BinaryUnit>>,
    modulemds: HashMap<String, Vec<ModulemdUnit>>,
}

impl InMemoryContentLayer {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts binary and source units into `repo`'s catalog.
    pub fn insert_units(&mut self, repo: &Repo, units: impl IntoIterator<Item = BinaryUnit>) {
        self.units
            .entry(repo.id().to_string())
            .or_default()
            .extend(units);
    }

    /// Inserts modulemd units into `repo`'s catalog.
    pub fn insert_modulemds(
        &mut self,
        repo: &Repo,
        modulemds: impl IntoIterator<Item = ModulemdUnit>,
    ) {
        self.modulemds
            .entry(repo.id().to_string())
            .or_default()
            .extend(modulemds);
    }
}

impl ContentQueryLayer for InMemoryContentLayer {
    async fn units_by_name(
        &self,
        repo: &Repo,
        names: &HashSet<String>,
    ) -> Result<Vec<BinaryUnit>, ContentQueryError> {
        Ok(self
            .units
            .get(repo.id())
            .into_iter()
            .flatten()
            .filter(|unit| names.contains(&unit.name))
            .cloned()
            .collect())
    }

    async fn units_providing(
        &self,
        repo: &Repo,
        atoms: &HashSet<String>,
    ) -> Result<Vec<BinaryUnit>, ContentQueryError> {
        Ok(self
            .units
            .get(repo.id())
            .into_iter()
            .flatten()
            .filter(|unit| unit.provides.iter().any(|atom| atoms.contains(&atom.name)))
            .cloned()
            .collect())
    }

    async fn modulemds(&self, repo: &Repo) -> Result<Vec<ModulemdUnit>, ContentQueryError> {
        Ok(self.modulemds.get(repo.id()).cloned().unwrap_or_default())
    }
}
