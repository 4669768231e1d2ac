//! Batched, iterative dependency resolution for RPM-style binary and source
//! package repositories.
//!
//! The resolver seeds itself from per-repository whitelists of base package
//! names, then repeatedly asks a content query layer for the highest-version
//! candidate providing each outstanding requirement, until no requirement
//! remains unresolved. It never backtracks: candidate selection is always
//! "highest EVR wins", and boolean rich-dependency expressions are
//! over-approximated into flat sets of leaf capability names rather than
//! evaluated.

mod config;
mod content;
mod depexpr;
mod diagnostics;
mod error;
mod evr;
mod modular;
mod output;
mod resolver;
mod types;

pub use config::ResolverConfig;
pub use content::{ContentQueryError, ContentQueryLayer, InMemoryContentLayer};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::Error;
pub use evr::Evr;
pub use modular::{modular_filenames, modular_filenames_from_repos};
pub use resolver::{Depsolver, DepsolverFlags};
pub use types::{
    Atom,
    BinaryUnit,
    ContentType,
    DepsolverItem,
    ExclusionRule,
    ModulemdUnit,
    Repo,
    WrappedUnit,
};
