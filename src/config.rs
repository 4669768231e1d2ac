//! Resolver tunables.

use std::time::Duration;

/// Tunable knobs governing one resolver's fan-out behavior.
///
/// Constructed independently of any particular [`Depsolver`](crate::Depsolver)
/// instance so embedding applications can tune fan-out without touching
/// resolver internals.
#[derive(Clone, Copy, Debug)]
pub struct ResolverConfig {
    /// Upper bound on how many unsolved atoms enter a single fixed-point
    /// iteration (`BATCH_SIZE_RESOLVER` in the reference implementation).
    /// Peak concurrency per iteration is `batch_size * number of items`.
    pub batch_size: usize,
    /// Upper bound on concurrent outbound content-layer queries within a
    /// single batch.
    pub content_concurrency: usize,
    /// Timeout applied to each individual content-layer query. A timed-out
    /// query is treated as a failed query: it contributes zero units and
    /// surfaces as a "not found" diagnostic for the atoms it was answering.
    pub query_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_size: 250,
            content_concurrency: 16,
            query_timeout: Duration::from_secs(30),
        }
    }
}
