//! Error handling for rpm-depsolver.
//!
//! Every error kind the core can produce during ordinary resolution
//! (unresolved dependency, whitelist miss, malformed dependency expression,
//! failed content query) is non-fatal: it is aggregated into
//! [`Diagnostics`](crate::Diagnostics) and the fixed point continues.
//! [`Error`] is reserved for programmer errors and content-layer contract
//! violations, the only conditions that abort
//! [`Depsolver::run`](crate::Depsolver::run).

/// Fatal errors that abort [`Depsolver::run`](crate::Depsolver::run).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A [`DepsolverItem`](crate::DepsolverItem) or resolver construction
    /// argument violated a precondition the core relies on (for example, an
    /// empty repository list for an item that is expected to resolve
    /// anything).
    #[error("invalid resolver input: {0}")]
    InvalidInput(String),
}
