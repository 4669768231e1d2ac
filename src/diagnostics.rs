//! Structured, non-fatal resolution warnings.
//!
//! Every [`Diagnostic`] is also mirrored to the `log` facade at `warn` level
//! under the `rpm_depsolver` target as it is recorded, using the exact
//! wording specified for each variant's [`Display`] implementation.

use std::fmt::{self, Display, Formatter};

/// A single non-fatal resolution warning.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Diagnostic {
    /// A whitelisted base package name was not found in any of the
    /// repositories it was whitelisted against.
    WhitelistMiss {
        /// The whitelisted name.
        name: String,
        /// Identifiers of the repositories searched.
        repo_ids: Vec<String>,
    },
    /// An atom could not be found in any input repo.
    NotFound {
        /// The unresolved atom's name.
        atom: String,
        /// Identifiers of the repositories searched.
        repo_ids: Vec<String>,
        /// Filenames of units whose `requires` named this atom.
        requirers: Vec<String>,
    },
    /// An atom's only candidates were excluded by a blacklist rule.
    Blacklisted {
        /// The blacklisted atom's name.
        atom: String,
        /// Filenames of units whose `requires` named this atom.
        requirers: Vec<String>,
    },
    /// An atom's only candidates were modular units that the modular policy
    /// forbids a non-modular requirer from accepting.
    ModularOnly {
        /// The unresolved atom's name.
        atom: String,
        /// Filenames of units whose `requires` named this atom.
        requirers: Vec<String>,
    },
}

fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::WhitelistMiss { name, repo_ids } => {
                write!(f, "'{name}' not found in {}.", format_list(repo_ids))
            }
            Diagnostic::NotFound {
                atom,
                repo_ids,
                requirers,
            } => write!(
                f,
                "Failed depsolving: {atom} can not be found in these input repos: \
                 {}. These rpms depend on it {}",
                format_list(repo_ids),
                format_list(requirers)
            ),
            Diagnostic::Blacklisted { atom, requirers } => write!(
                f,
                "Failed depsolving: {atom} is blacklisted. These rpms depend on it {}",
                format_list(requirers)
            ),
            Diagnostic::ModularOnly { atom, requirers } => write!(
                f,
                "Failed depsolving: {atom} can only be satisfied by modular candidates, \
                 which a non-modular requirer can not accept. These rpms depend on it {}",
                format_list(requirers)
            ),
        }
    }
}

/// The accumulated non-fatal warnings produced over one
/// [`Depsolver::run`](crate::Depsolver::run).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records a diagnostic, logging it at `warn` level.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        log::warn!(target: "rpm_depsolver", "{diagnostic}");
        self.records.push(diagnostic);
    }

    /// Returns all recorded diagnostics, in the order they were observed.
    #[must_use]
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Returns `true` if no diagnostics were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
