//! Package metadata model: dependency atoms, binary/source units, modular
//! metadata, and the exclusion rules that gate selection.

use std::fmt::{self, Display, Formatter};

/// A single capability name with an optional version constraint.
///
/// `name` may be a bare symbol (`gcc`), a file path (`/some/script`), or a
/// synthetic capability (`pkgX(abc)`). Two atoms compare equal iff all
/// fields are equal; the resolver keys most of its bookkeeping on `name`
/// alone.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Atom {
    /// The capability name, or (for an unparsed requirement) a raw rich
    /// dependency expression.
    pub name: String,
    /// Rpm-style comparison flags (`EQ`, `GE`, ...), if any.
    pub flags: Option<String>,
    /// Epoch component of a version constraint, if any.
    pub epoch: Option<String>,
    /// Version component of a version constraint, if any.
    pub version: Option<String>,
    /// Release component of a version constraint, if any.
    pub release: Option<String>,
}

impl Atom {
    /// Creates an unconstrained atom with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: None,
            epoch: None,
            version: None,
            release: None,
        }
    }

    /// Returns whether this atom names a filesystem path rather than a
    /// capability; file-path dependencies are never resolved by the core.
    #[must_use]
    pub fn is_file_path(&self) -> bool {
        self.name.starts_with('/')
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The kind of content a [`BinaryUnit`] represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    /// A binary RPM.
    Rpm,
    /// A source RPM.
    Srpm,
}

/// An opaque handle to an input or source repository.
///
/// Carries only the identifier used for logging, diagnostics, and wrapping
/// selected units; transport details live entirely in the content query
/// layer.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Repo {
    id: String,
}

impl Repo {
    /// Creates a repository handle with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Returns the repository identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for Repo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A binary or source package as reported by the content query layer.
///
/// A unit's natural key for deduplication within one target repository is
/// `(name, version, release, epoch, arch)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryUnit {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Package release.
    pub release: String,
    /// Package epoch, if set.
    pub epoch: Option<String>,
    /// Target architecture.
    pub arch: String,
    /// Filename, if known. Absent only for synthetic test fixtures; real
    /// content always carries one.
    pub filename: Option<String>,
    /// Capabilities this unit provides.
    pub provides: Vec<Atom>,
    /// Raw dependency atoms this unit requires, not yet expanded through the
    /// rich-dependency-expression parser.
    pub requires: Vec<Atom>,
    /// Filename of the source RPM this unit was built from, if any.
    pub sourcerpm: Option<String>,
    /// Whether this is a binary or source package.
    pub content_type: ContentType,
}

impl BinaryUnit {
    /// Returns the `(name, arch)` group key used by candidate selection.
    #[must_use]
    pub fn group_key(&self) -> (&str, &str) {
        (&self.name, &self.arch)
    }
}

/// A [`BinaryUnit`] paired with the identifier of the repository it was
/// drawn from (`UbiUnit` in the reference model).
///
/// Hash and equality delegate entirely to the underlying unit's natural key
/// (`name`, `version`, `release`, `epoch`, `arch`), so that two wrapped
/// copies of the same unit from the *same* source repository collapse under
/// `HashSet` deduplication, while copies from different source repositories
/// remain distinguishable through `associate_source_repo_id` — which is
/// intentionally excluded from the hash and handled as a secondary
/// partition by the exporter (see `output`).
#[derive(Clone, Debug)]
pub struct WrappedUnit {
    /// The underlying binary or source unit.
    pub unit: BinaryUnit,
    /// Identifier of the repository this copy of the unit was selected
    /// from.
    pub associate_source_repo_id: String,
}

impl WrappedUnit {
    /// Wraps `unit` with the repository it was drawn from.
    #[must_use]
    pub fn new(unit: BinaryUnit, source_repo: impl Into<String>) -> Self {
        Self {
            unit,
            associate_source_repo_id: source_repo.into(),
        }
    }

    fn identity(&self) -> (&str, &str, &str, Option<&str>, &str) {
        (
            &self.unit.name,
            &self.unit.version,
            &self.unit.release,
            self.unit.epoch.as_deref(),
            &self.unit.arch,
        )
    }
}

impl PartialEq for WrappedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for WrappedUnit {}

impl std::hash::Hash for WrappedUnit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// A module stream and the binary-package artifacts it claims.
///
/// Each entry in `artifacts` is an NEVRA-style string of the form
/// `NAME-EPOCH:VERSION-RELEASE.ARCH` (epoch may be `0`); see `modular` for
/// the conversion to filenames.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModulemdUnit {
    /// Module name.
    pub name: String,
    /// Module stream.
    pub stream: String,
    /// Module version.
    pub version: u64,
    /// Module context.
    pub context: String,
    /// Module architecture.
    pub arch: String,
    /// NEVRA strings of artifacts this module stream contributes.
    pub artifacts: Vec<String>,
}

/// A name or name-glob to exclude from selection, optionally qualified by
/// architecture.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExclusionRule {
    /// The literal name, or (if `globbing`) a prefix glob.
    pub pattern: String,
    /// Whether `pattern` is a prefix glob rather than an exact name.
    pub globbing: bool,
    /// Restrict this rule to a single architecture, if set.
    pub arch: Option<String>,
}

impl ExclusionRule {
    /// Creates an exact-match exclusion rule with no architecture
    /// restriction.
    #[must_use]
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            globbing: false,
            arch: None,
        }
    }

    /// Creates a prefix-glob exclusion rule with no architecture
    /// restriction.
    #[must_use]
    pub fn globbed(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            globbing: true,
            arch: None,
        }
    }

    /// Restricts this rule to a single architecture.
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    /// Returns whether this rule excludes `unit`.
    #[must_use]
    pub fn matches(&self, unit: &BinaryUnit) -> bool {
        if let Some(arch) = &self.arch {
            if arch != &unit.arch {
                return false;
            }
        }
        if self.globbing {
            unit.name.starts_with(self.pattern.as_str())
        } else {
            unit.name == self.pattern
        }
    }
}

/// One repository's worth of resolver input: the base packages to seed
/// from, the names/globs to exclude, and the repositories to query.
#[derive(Clone, Debug)]
pub struct DepsolverItem {
    /// Base package names to seed selection from.
    pub whitelist: Vec<String>,
    /// Name/glob exclusion rules applied to every candidate drawn for this
    /// item.
    pub blacklist: Vec<ExclusionRule>,
    /// Repositories queried for this item.
    pub in_pulp_repos: Vec<Repo>,
}

impl DepsolverItem {
    /// Creates a new input item.
    #[must_use]
    pub fn new(
        whitelist: Vec<String>,
        blacklist: Vec<ExclusionRule>,
        in_pulp_repos: Vec<Repo>,
    ) -> Self {
        Self {
            whitelist,
            blacklist,
            in_pulp_repos,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn unit(name: &str, arch: &str) -> BinaryUnit {
        BinaryUnit {
            name: name.into(),
            version: "1".into(),
            release: "1".into(),
            epoch: None,
            arch: arch.into(),
            filename: None,
            provides: Vec::new(),
            requires: Vec::new(),
            sourcerpm: None,
            content_type: ContentType::Rpm,
        }
    }

    #[rstest]
    #[case::exact_match(ExclusionRule::exact("test"), "test", "x86_64", true)]
    #[case::exact_mismatch(ExclusionRule::exact("test"), "test-exclude", "x86_64", false)]
    #[case::glob_match(ExclusionRule::globbed("test-exc"), "test-exclude", "x86_64", true)]
    #[case::glob_mismatch(ExclusionRule::globbed("test-exc"), "test", "x86_64", false)]
    #[case::arch_scoped_rule_ignores_other_arches(
        ExclusionRule::exact("test").with_arch("s390x"),
        "test",
        "x86_64",
        false
    )]
    #[case::arch_scoped_rule_matches_its_arch(
        ExclusionRule::exact("test").with_arch("s390x"),
        "test",
        "s390x",
        true
    )]
    fn exclusion_rule_matches(
        #[case] rule: ExclusionRule,
        #[case] name: &str,
        #[case] arch: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(rule.matches(&unit(name, arch)), expected);
    }
}
