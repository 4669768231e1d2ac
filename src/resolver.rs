//! Resolver Core: the batched, iterative fixed-point dependency-resolution
//! engine.
//!
//! [`Depsolver::run`] seeds `output_set` from each item's whitelist, then
//! repeatedly batches the outstanding unsolved requirements to the content
//! query layer, applies blacklist and modular-policy filtering, and folds
//! newly discovered `requires`/`provides` back into the fixed point until
//! `_unsolved` is empty. The resolver owns its state for exactly one `run`;
//! nothing here is shared across instances, and the only suspension points
//! are awaits on batched content-layer futures (see `content`), so internal
//! sets are never mutated from more than one logical task.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::config::ResolverConfig;
use crate::content::{bounded_fan_out, ContentQueryLayer};
use crate::depexpr;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Error;
use crate::evr::Evr;
use crate::types::{Atom, BinaryUnit, DepsolverItem, Repo, WrappedUnit};

fn evr_of(unit: &BinaryUnit) -> Evr<'_> {
    Evr::new(unit.epoch.as_deref(), &unit.version, &unit.release)
}

fn requirer_filename(unit: &BinaryUnit) -> String {
    unit.filename.clone().unwrap_or_else(|| {
        format!("{}-{}-{}.{}.rpm", unit.name, unit.version, unit.release, unit.arch)
    })
}

fn unit_identity(unit: &BinaryUnit) -> (String, String, String, Option<String>, String) {
    (
        unit.name.clone(),
        unit.version.clone(),
        unit.release.clone(),
        unit.epoch.clone(),
        unit.arch.clone(),
    )
}

/// Flags recognized by [`Depsolver::new`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DepsolverFlags {
    /// When set, the fixed-point loop never runs: only whitelist base
    /// packages are selected, no `provides`/`requires` are accumulated, and
    /// source-rpm resolution still runs for the base packages that were
    /// found.
    pub base_pkgs_only: bool,
}

/// The fixed-point dependency resolver.
///
/// Owns one run's worth of state (`_provides`, `_requires`, `_unsolved`,
/// `output_set`, `srpm_output_set`) over a generic [`ContentQueryLayer`].
/// Construction captures every input the run needs; `run` drives the fixed
/// point to completion; `export` consumes the resolver and partitions its
/// selection by source repository.
#[derive(Debug)]
pub struct Depsolver<C: ContentQueryLayer> {
    items: Vec<DepsolverItem>,
    srpm_repos: Vec<Repo>,
    modular_rpm_filenames: HashSet<String>,
    flags: DepsolverFlags,
    config: ResolverConfig,
    content: C,

    provides: HashSet<Atom>,
    requires: HashSet<Atom>,
    unsolved: HashSet<Atom>,
    output_set: HashSet<WrappedUnit>,
    srpm_output_set: HashSet<WrappedUnit>,
    diagnostics: Diagnostics,

    // Name -> whether at least one requirer of that atom observed so far is
    // non-modular. Missing entries default to `true` (the common case:
    // require the ordinary non-modular competition).
    has_non_modular_requirer: HashMap<String, bool>,
    // Name -> filenames of units whose `requires` named this atom, for
    // diagnostics.
    requirers: HashMap<String, HashSet<String>>,
}

impl<C: ContentQueryLayer> Depsolver<C> {
    /// Constructs a resolver over `items`, ready to run.
    ///
    /// `modular_rpm_filenames` must be precomputed by the caller (typically
    /// via [`modular_filenames`](crate::modular_filenames) against whatever
    /// repos are known to carry modular content) and is frozen for the
    /// lifetime of this instance.
    #[must_use]
    pub fn new(
        items: Vec<DepsolverItem>,
        srpm_repos: Vec<Repo>,
        modular_rpm_filenames: impl IntoIterator<Item = String>,
        flags: DepsolverFlags,
        config: ResolverConfig,
        content: C,
    ) -> Self {
        Self {
            items,
            srpm_repos,
            modular_rpm_filenames: modular_rpm_filenames.into_iter().collect(),
            flags,
            config,
            content,
            provides: HashSet::new(),
            requires: HashSet::new(),
            unsolved: HashSet::new(),
            output_set: HashSet::new(),
            srpm_output_set: HashSet::new(),
            diagnostics: Diagnostics::default(),
            has_non_modular_requirer: HashMap::new(),
            requirers: HashMap::new(),
        }
    }

    /// Every capability name ever observed in a selected unit's `provides`.
    #[must_use]
    pub fn provides(&self) -> &HashSet<Atom> {
        &self.provides
    }

    /// Every dependency atom ever emitted by a selected unit, excluding
    /// file-path atoms.
    #[must_use]
    pub fn requires(&self) -> &HashSet<Atom> {
        &self.requires
    }

    /// The subset of `requires` not yet observed in `provides`.
    #[must_use]
    pub fn unsolved(&self) -> &HashSet<Atom> {
        &self.unsolved
    }

    /// The selected binary units.
    #[must_use]
    pub fn output_set(&self) -> &HashSet<WrappedUnit> {
        &self.output_set
    }

    /// The selected source units.
    #[must_use]
    pub fn srpm_output_set(&self) -> &HashSet<WrappedUnit> {
        &self.srpm_output_set
    }

    /// The non-fatal diagnostics accumulated so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drives the fixed point to completion: base-package seeding, the
    /// unsolved-requirement loop (unless `base_pkgs_only` is set), and
    /// source-rpm resolution.
    pub async fn run(&mut self) -> Result<(), Error> {
        for item_idx in 0..self.items.len() {
            self.run_base_packages(item_idx).await?;
        }

        if !self.flags.base_pkgs_only {
            while !self.unsolved.is_empty() {
                let batch = self.take_batch();
                self.resolve_batch(batch).await?;
            }
        }

        self.resolve_srpms().await?;
        Ok(())
    }

    /// Consumes the resolver and partitions `output_set ∪ srpm_output_set`
    /// by `associate_source_repo_id`.
    #[must_use]
    pub fn export(self) -> HashMap<String, Vec<WrappedUnit>> {
        crate::output::export(self.output_set.into_iter().chain(self.srpm_output_set))
    }

    /// The explicit scoped-resource exit point: drops this resolver and
    /// everything it owns.
    ///
    /// Every content-layer query this resolver issues is a local
    /// `FuturesUnordered` entry awaited in place by [`run`](Self::run) —
    /// nothing is ever detached with `tokio::spawn` — so dropping the
    /// resolver while a call to `run` is suspended already cancels every
    /// outstanding query and releases whatever the content layer holds.
    /// `close` exists to give callers a named call site for that exit
    /// instead of relying on an implicit drop falling out of scope.
    pub fn close(self) {
        drop(self);
    }

    fn batch_size(&self) -> usize {
        self.unsolved.len().min(self.config.batch_size)
    }

    fn take_batch(&mut self) -> HashSet<Atom> {
        let size = self.batch_size();
        let drained: Vec<Atom> = self.unsolved.iter().take(size).cloned().collect();
        for atom in &drained {
            self.unsolved.remove(atom);
        }
        log::debug!(
            target: "rpm_depsolver",
            "draining {} of {} unsolved atoms",
            drained.len(),
            drained.len() + self.unsolved.len()
        );
        drained.into_iter().collect()
    }

    fn is_modular(&self, unit: &BinaryUnit) -> bool {
        unit.filename
            .as_deref()
            .is_some_and(|filename| self.modular_rpm_filenames.contains(filename))
    }

    fn is_blacklisted(&self, item_idx: usize, unit: &BinaryUnit) -> bool {
        self.items[item_idx].blacklist.iter().any(|rule| rule.matches(unit))
    }

    fn all_repo_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .items
            .iter()
            .flat_map(|item| item.in_pulp_repos.iter().map(|repo| repo.id().to_string()))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn requirers_for(&self, atom_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .requirers
            .get(atom_name)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    async fn query_units_by_name(
        &self,
        repos: &[Repo],
        names: &HashSet<String>,
    ) -> Vec<(Repo, BinaryUnit)> {
        let futures: Vec<_> = repos
            .iter()
            .map(|repo| {
                let repo = repo.clone();
                async move {
                    self.content
                        .units_by_name(&repo, names)
                        .await
                        .map(|units| (repo, units))
                }
            })
            .collect();

        let results =
            bounded_fan_out(futures, self.config.content_concurrency, self.config.query_timeout)
                .await;

        let mut raw = Vec::new();
        for result in results {
            match result {
                Ok((repo, units)) => {
                    raw.extend(units.into_iter().map(|unit| (repo.clone(), unit)));
                }
                Err(err) => {
                    log::debug!(target: "rpm_depsolver", "units_by_name query failed: {err}");
                }
            }
        }
        raw
    }

    async fn query_providing_all_items(
        &self,
        names: &HashSet<String>,
    ) -> Vec<(usize, Repo, BinaryUnit)> {
        let mut futures = Vec::new();
        for (item_idx, item) in self.items.iter().enumerate() {
            for repo in &item.in_pulp_repos {
                let repo = repo.clone();
                futures.push(async move {
                    self.content
                        .units_providing(&repo, names)
                        .await
                        .map(|units| (item_idx, repo, units))
                });
            }
        }

        let results =
            bounded_fan_out(futures, self.config.content_concurrency, self.config.query_timeout)
                .await;

        let mut raw = Vec::new();
        for result in results {
            match result {
                Ok((item_idx, repo, units)) => {
                    raw.extend(units.into_iter().map(|unit| (item_idx, repo.clone(), unit)));
                }
                Err(err) => {
                    log::debug!(target: "rpm_depsolver", "units_providing query failed: {err}");
                }
            }
        }
        raw
    }

    fn pick_winner_base<'a>(
        &self,
        candidates: &[&'a (Repo, BinaryUnit)],
    ) -> Option<&'a (Repo, BinaryUnit)> {
        let mut best: Option<&'a (Repo, BinaryUnit)> = None;
        for candidate in candidates {
            best = match best {
                None => Some(*candidate),
                Some(current) if evr_of(&candidate.1) > evr_of(&current.1) => Some(*candidate),
                Some(current) => Some(current),
            };
        }
        best
    }

    fn pick_winner<'a>(
        &self,
        candidates: &[&'a (usize, Repo, BinaryUnit)],
        prefer_modular_tiebreak: bool,
    ) -> Option<&'a (usize, Repo, BinaryUnit)> {
        let mut best: Option<&'a (usize, Repo, BinaryUnit)> = None;
        for candidate in candidates {
            best = match best {
                None => Some(*candidate),
                Some(current) => {
                    let replace = match evr_of(&candidate.2).cmp(&evr_of(&current.2)) {
                        Ordering::Greater => true,
                        Ordering::Equal => {
                            prefer_modular_tiebreak
                                && self.is_modular(&candidate.2)
                                && !self.is_modular(&current.2)
                        }
                        Ordering::Less => false,
                    };
                    if replace { Some(*candidate) } else { Some(current) }
                }
            };
        }
        best
    }

    /// Seeds `output_set` from one item's whitelist: queries `units_by_name`,
    /// reports whitelist misses, applies the blacklist and the always-non-
    /// modular base-package policy (winner from the non-modular subset,
    /// every modular survivor pinned alongside it), and — unless
    /// `base_pkgs_only` is set — extracts the selected units' dependencies.
    async fn run_base_packages(&mut self, item_idx: usize) -> Result<(), Error> {
        let (whitelist, repos) = {
            let item = &self.items[item_idx];
            (item.whitelist.clone(), item.in_pulp_repos.clone())
        };
        let names: HashSet<String> = whitelist.iter().cloned().collect();
        let repo_ids: Vec<String> = repos.iter().map(|repo| repo.id().to_string()).collect();

        let raw = self.query_units_by_name(&repos, &names).await;
        let mut to_extract: Vec<BinaryUnit> = Vec::new();

        for name in &whitelist {
            let raw_for_name: Vec<&(Repo, BinaryUnit)> =
                raw.iter().filter(|(_, unit)| &unit.name == name).collect();

            if raw_for_name.is_empty() {
                self.diagnostics.record(Diagnostic::WhitelistMiss {
                    name: name.clone(),
                    repo_ids: repo_ids.clone(),
                });
                continue;
            }

            let survivors: Vec<&(Repo, BinaryUnit)> = raw_for_name
                .into_iter()
                .filter(|(_, unit)| !self.is_blacklisted(item_idx, unit))
                .collect();

            if survivors.is_empty() {
                continue;
            }

            let (modular, non_modular): (Vec<_>, Vec<_>) =
                survivors.iter().copied().partition(|entry| self.is_modular(&entry.1));

            let winner = self.pick_winner_base(&non_modular);

            let mut selected: Vec<&(Repo, BinaryUnit)> = modular;
            if let Some(winner) = winner {
                if !selected.iter().any(|candidate| std::ptr::eq(*candidate, winner)) {
                    selected.push(winner);
                }
            }

            for (repo, unit) in selected {
                self.output_set.insert(WrappedUnit::new(unit.clone(), repo.id()));
                to_extract.push(unit.clone());
            }
        }

        if !self.flags.base_pkgs_only {
            self.extract_and_resolve(&to_extract);
        }

        Ok(())
    }

    /// Resolves one batch of unsolved atom names: queries `units_providing`
    /// across every item, applies blacklist and modular-policy filtering per
    /// name, records "not found"/"blacklisted"/"modular-only" diagnostics for
    /// names with no surviving candidate, and extracts the selected units.
    async fn resolve_batch(&mut self, drained: HashSet<Atom>) -> Result<(), Error> {
        let names: HashSet<String> = drained.iter().map(|atom| atom.name.clone()).collect();
        let raw = self.query_providing_all_items(&names).await;

        let mut to_extract: Vec<BinaryUnit> = Vec::new();
        let mut already_extracted = HashSet::new();

        for name in &names {
            let raw_for_name: Vec<&(usize, Repo, BinaryUnit)> = raw
                .iter()
                .filter(|(_, _, unit)| unit.provides.iter().any(|provided| &provided.name == name))
                .collect();

            if raw_for_name.is_empty() {
                self.diagnostics.record(Diagnostic::NotFound {
                    atom: name.clone(),
                    repo_ids: self.all_repo_ids(),
                    requirers: self.requirers_for(name),
                });
                continue;
            }

            let survivors: Vec<&(usize, Repo, BinaryUnit)> = raw_for_name
                .into_iter()
                .filter(|(item_idx, _, unit)| !self.is_blacklisted(*item_idx, unit))
                .collect();

            if survivors.is_empty() {
                self.diagnostics.record(Diagnostic::Blacklisted {
                    atom: name.clone(),
                    requirers: self.requirers_for(name),
                });
                continue;
            }

            let (modular, non_modular): (Vec<_>, Vec<_>) =
                survivors.iter().copied().partition(|entry| self.is_modular(&entry.2));

            // An atom whose requirers observed so far are exclusively
            // modular may be resolved by a modular candidate directly;
            // otherwise the winner must come from the non-modular subset,
            // with every modular survivor still pinned unconditionally.
            let allow_full_pool = !self.has_non_modular_requirer.get(name).copied().unwrap_or(true);

            let winner = if allow_full_pool {
                self.pick_winner(&survivors, true)
            } else {
                let winner = self.pick_winner(&non_modular, false);
                if winner.is_none() && !modular.is_empty() {
                    self.diagnostics.record(Diagnostic::ModularOnly {
                        atom: name.clone(),
                        requirers: self.requirers_for(name),
                    });
                }
                winner
            };

            let mut selected: Vec<&(usize, Repo, BinaryUnit)> = modular;
            if let Some(winner) = winner {
                if !selected.iter().any(|candidate| std::ptr::eq(*candidate, winner)) {
                    selected.push(winner);
                }
            }

            for (_, repo, unit) in selected {
                self.output_set.insert(WrappedUnit::new(unit.clone(), repo.id()));
                if already_extracted.insert(unit_identity(unit)) {
                    to_extract.push(unit.clone());
                }
            }
        }

        self.extract_and_resolve(&to_extract);
        Ok(())
    }

    /// Collapses each unit's `requires` through the rich-dependency-
    /// expression parser, unions `provides`, and recomputes `_unsolved`: any
    /// atom still present in `_unsolved` whose name just became provided is
    /// pruned, and any genuinely new atom not yet provided is added. Atoms
    /// already drained out of `_unsolved` in an earlier batch are never
    /// reinserted, matching the termination invariant.
    fn extract_and_resolve(&mut self, units: &[BinaryUnit]) {
        let mut newly_required: Vec<Atom> = Vec::new();

        for unit in units {
            let unit_is_modular = self.is_modular(unit);
            let filename = requirer_filename(unit);

            for raw_atom in &unit.requires {
                for atom in depexpr::expand(raw_atom) {
                    if atom.is_file_path() {
                        continue;
                    }

                    self.has_non_modular_requirer
                        .entry(atom.name.clone())
                        .and_modify(|has_non_modular| {
                            *has_non_modular = *has_non_modular || !unit_is_modular;
                        })
                        .or_insert(!unit_is_modular);

                    self.requirers
                        .entry(atom.name.clone())
                        .or_default()
                        .insert(filename.clone());

                    if self.requires.insert(atom.clone()) {
                        newly_required.push(atom);
                    }
                }
            }

            for atom in &unit.provides {
                self.provides.insert(atom.clone());
            }
        }

        let provided_names: HashSet<&str> =
            self.provides.iter().map(|atom| atom.name.as_str()).collect();
        self.unsolved.retain(|atom| !provided_names.contains(atom.name.as_str()));
        for atom in newly_required {
            if !provided_names.contains(atom.name.as_str()) {
                self.unsolved.insert(atom);
            }
        }
    }

    async fn resolve_srpms(&mut self) -> Result<(), Error> {
        if self.srpm_repos.is_empty() {
            return Ok(());
        }

        let names: HashSet<String> = self
            .output_set
            .iter()
            .filter_map(|wrapped| wrapped.unit.sourcerpm.clone())
            .collect();
        if names.is_empty() {
            return Ok(());
        }

        let srpm_repos = self.srpm_repos.clone();
        let raw = self.query_units_by_name(&srpm_repos, &names).await;
        for (repo, unit) in raw {
            self.srpm_output_set.insert(WrappedUnit::new(unit, repo.id()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::InMemoryContentLayer;
    use crate::types::{ContentType, ExclusionRule, ModulemdUnit};

    fn rpm(name: &str, version: &str, provides: Vec<&str>, requires: Vec<&str>) -> BinaryUnit {
        BinaryUnit {
            name: name.into(),
            version: version.into(),
            release: "200".into(),
            epoch: Some("1".into()),
            arch: "x86_64".into(),
            filename: None,
            provides: provides.into_iter().map(Atom::named).collect(),
            requires: requires.into_iter().map(Atom::named).collect(),
            sourcerpm: None,
            content_type: ContentType::Rpm,
        }
    }

    fn make_depsolver(
        items: Vec<DepsolverItem>,
        srpm_repos: Vec<Repo>,
        content: InMemoryContentLayer,
    ) -> Depsolver<InMemoryContentLayer> {
        Depsolver::new(
            items,
            srpm_repos,
            Vec::new(),
            DepsolverFlags::default(),
            ResolverConfig::default(),
            content,
        )
    }

    #[tokio::test]
    async fn what_provides_picks_highest_version() {
        let repo = Repo::new("test_repo_id");
        let mut content = InMemoryContentLayer::new();
        content.insert_units(
            &repo,
            vec![rpm("test", "10", vec!["gcc"], vec![]), rpm("test", "100", vec!["gcc"], vec![])],
        );

        let item = DepsolverItem::new(vec!["test".into()], Vec::new(), vec![repo.clone()]);
        let mut solver = make_depsolver(vec![item], Vec::new(), content);
        solver.run().await.unwrap();

        let winner = solver
            .output_set()
            .iter()
            .find(|wrapped| wrapped.unit.name == "test")
            .expect("winner present");
        assert_eq!(winner.unit.version, "100");
    }

    #[tokio::test]
    async fn blacklist_excludes_matching_names_and_arches() {
        let repo = Repo::new("test_repo_id");
        let mut content = InMemoryContentLayer::new();
        content.insert_units(
            &repo,
            vec![rpm("test", "100", vec![], vec![]), rpm("test-exclude", "100", vec![], vec![])],
        );

        let blacklist = vec![
            ExclusionRule::globbed("test-exc"),
            ExclusionRule::exact("test").with_arch("s390x"),
        ];
        let item = DepsolverItem::new(
            vec!["test".into(), "test-exclude".into()],
            blacklist,
            vec![repo.clone()],
        );
        let mut solver = make_depsolver(vec![item], Vec::new(), content);
        solver.run().await.unwrap();

        let names: HashSet<&str> =
            solver.output_set().iter().map(|wrapped| wrapped.unit.name.as_str()).collect();
        assert_eq!(names, HashSet::from(["test"]));
    }

    #[tokio::test]
    async fn whitelist_miss_is_diagnosed_and_found_package_still_selected() {
        let repo = Repo::new("test_repo_rpm");
        let mut content = InMemoryContentLayer::new();
        content.insert_units(&repo, vec![rpm("gcc", "10", vec![], vec![])]);

        let item = DepsolverItem::new(
            vec!["gcc".into(), "jq".into(), "perl-version".into()],
            Vec::new(),
            vec![repo.clone()],
        );
        let mut solver = make_depsolver(vec![item], Vec::new(), content);
        solver.run().await.unwrap();

        assert!(solver.diagnostics().records().contains(&Diagnostic::WhitelistMiss {
            name: "jq".into(),
            repo_ids: vec!["test_repo_rpm".into()],
        }));
        assert!(solver.diagnostics().records().contains(&Diagnostic::WhitelistMiss {
            name: "perl-version".into(),
            repo_ids: vec!["test_repo_rpm".into()],
        }));

        let output: Vec<(&str, &str)> = solver
            .output_set()
            .iter()
            .map(|wrapped| (wrapped.unit.name.as_str(), wrapped.associate_source_repo_id.as_str()))
            .collect();
        assert_eq!(output, vec![("gcc", "test_repo_rpm")]);
    }

    #[tokio::test]
    async fn base_pkgs_only_skips_extraction_but_still_resolves_srpms() {
        let repo_rpm = Repo::new("test_repo_rpm");
        let repo_srpm = Repo::new("test_repo_srpm");
        let mut content = InMemoryContentLayer::new();

        let mut gcc = rpm("gcc", "10", vec!["lib.a"], vec!["dep-gcc", "lib.b", "lib.c"]);
        gcc.sourcerpm = Some("gcc.src.rpm".into());
        let dep_gcc = rpm("dep-gcc", "100", vec!["dep-gcc"], vec!["lib.a", "lib.b"]);
        content.insert_units(&repo_rpm, vec![gcc, dep_gcc]);

        // Source resolution queries `units_by_name` against the srpm
        // filename itself, so the srpm unit's `name` must equal the
        // filename it is looked up by.
        let mut gcc_srpm = rpm("gcc.src.rpm", "10", vec![], vec![]);
        gcc_srpm.release = "200".into();
        gcc_srpm.filename = Some("gcc.src.rpm".into());
        gcc_srpm.content_type = ContentType::Srpm;
        content.insert_units(&repo_srpm, vec![gcc_srpm]);

        let item = DepsolverItem::new(vec!["gcc".into()], Vec::new(), vec![repo_rpm.clone()]);
        let flags = DepsolverFlags { base_pkgs_only: true };
        let mut solver = Depsolver::new(
            vec![item],
            vec![repo_srpm.clone()],
            Vec::new(),
            flags,
            ResolverConfig::default(),
            content,
        );
        solver.run().await.unwrap();

        assert!(solver.provides().is_empty());
        assert!(solver.requires().is_empty());
        assert!(solver.unsolved().is_empty());

        let rpm_names: HashSet<&str> =
            solver.output_set().iter().map(|wrapped| wrapped.unit.name.as_str()).collect();
        assert_eq!(rpm_names, HashSet::from(["gcc"]));

        let srpm_names: HashSet<&str> =
            solver.srpm_output_set().iter().map(|wrapped| wrapped.unit.name.as_str()).collect();
        assert_eq!(srpm_names, HashSet::from(["gcc.src.rpm"]));
    }

    #[tokio::test]
    async fn modular_policy_pins_modular_candidates_alongside_non_modular_winner() {
        let repo = Repo::new("test_repo");
        let mut content = InMemoryContentLayer::new();

        let mut nginx_non_modular = rpm("nginx", "1.20.1", vec!["nginx"], vec!["nginx-core"]);
        nginx_non_modular.filename = Some("nginx-1.20.1-14.el9.x86_64.rpm".into());

        let mut nginx_core_non_modular = rpm("nginx-core", "1.20.1", vec!["nginx-core"], vec![]);
        nginx_core_non_modular.filename = Some("nginx-core-1.20.1-14.el9.x86_64.rpm".into());

        let mut nginx_modular = rpm("nginx", "1.22.1", vec!["nginx"], vec!["nginx-core"]);
        nginx_modular.filename =
            Some("nginx-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm".into());

        let mut nginx_core_modular = rpm("nginx-core", "1.22.1", vec!["nginx-core"], vec![]);
        nginx_core_modular.filename =
            Some("nginx-core-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm".into());

        content.insert_units(
            &repo,
            vec![
                nginx_non_modular.clone(),
                nginx_core_non_modular.clone(),
                nginx_modular.clone(),
                nginx_core_modular.clone(),
            ],
        );
        content.insert_modulemds(
            &repo,
            vec![ModulemdUnit {
                name: "nginx".into(),
                stream: "1.22".into(),
                version: 9_020_020_221_218_004_026,
                context: "9".into(),
                arch: "x86_64".into(),
                artifacts: vec![
                    "nginx-1:1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64".into(),
                    "nginx-core-1:1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64".into(),
                ],
            }],
        );

        let modular_filenames = crate::modular_filenames(&[ModulemdUnit {
            name: "nginx".into(),
            stream: "1.22".into(),
            version: 9_020_020_221_218_004_026,
            context: "9".into(),
            arch: "x86_64".into(),
            artifacts: vec![
                "nginx-1:1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64".into(),
                "nginx-core-1:1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64".into(),
            ],
        }]);

        let item = DepsolverItem::new(vec!["nginx".into()], Vec::new(), vec![repo.clone()]);
        let mut solver = Depsolver::new(
            vec![item],
            Vec::new(),
            modular_filenames,
            DepsolverFlags::default(),
            ResolverConfig::default(),
            content,
        );
        solver.run().await.unwrap();

        let filenames: HashSet<&str> = solver
            .output_set()
            .iter()
            .filter_map(|wrapped| wrapped.unit.filename.as_deref())
            .collect();
        assert_eq!(
            filenames,
            HashSet::from([
                "nginx-1.20.1-14.el9.x86_64.rpm",
                "nginx-core-1.20.1-14.el9.x86_64.rpm",
                "nginx-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm",
                "nginx-core-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm",
            ])
        );
        assert!(solver.unsolved().is_empty());
    }

    #[tokio::test]
    async fn modular_only_candidate_for_non_modular_requirer_is_diagnosed() {
        let repo = Repo::new("test_repo");
        let mut content = InMemoryContentLayer::new();

        let mut nginx = rpm("nginx", "1.20.1", vec!["nginx"], vec!["nginx-core"]);
        nginx.filename = Some("nginx-1.20.1-14.el9.x86_64.rpm".into());

        let mut nginx_core_modular =
            rpm("nginx-core", "1.22.1", vec!["nginx-core"], vec![]);
        nginx_core_modular.filename =
            Some("nginx-core-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm".into());

        content.insert_units(&repo, vec![nginx, nginx_core_modular]);

        let modulemd = ModulemdUnit {
            name: "nginx".into(),
            stream: "1.22".into(),
            version: 9_020_020_221_218_004_026,
            context: "9".into(),
            arch: "x86_64".into(),
            artifacts: vec![
                "nginx-core-1:1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64".into(),
            ],
        };
        content.insert_modulemds(&repo, vec![modulemd.clone()]);
        let modular_filenames = crate::modular_filenames(&[modulemd]);

        let item = DepsolverItem::new(vec!["nginx".into()], Vec::new(), vec![repo.clone()]);
        let mut solver = Depsolver::new(
            vec![item],
            Vec::new(),
            modular_filenames,
            DepsolverFlags::default(),
            ResolverConfig::default(),
            content,
        );
        solver.run().await.unwrap();

        let records = solver.diagnostics().records();
        assert!(records.iter().any(|d| matches!(
            d,
            Diagnostic::ModularOnly { atom, requirers }
                if atom == "nginx-core" && requirers == &vec!["nginx-1.20.1-14.el9.x86_64.rpm".to_string()]
        )));

        // The modular candidate is still pinned into the output unconditionally,
        // even though the non-modular requirer could not be handed it directly.
        let filenames: HashSet<&str> = solver
            .output_set()
            .iter()
            .filter_map(|wrapped| wrapped.unit.filename.as_deref())
            .collect();
        assert!(filenames.contains("nginx-core-1.22.1-3.module+el9.2.0+17617+2f289c6c.x86_64.rpm"));
    }

    #[tokio::test]
    async fn unresolved_requirements_produce_distinguished_diagnostics() {
        let repo = Repo::new("test_repo_1");
        let mut content = InMemoryContentLayer::new();

        let mut lib_x = rpm(
            "lib-x",
            "100",
            vec!["lib.c", "lib.d"],
            vec!["lib.e", "lib.g", "( pkgX(abc) with capY(xyz) )", "lib_exclude"],
        );
        lib_x.filename = Some("lib-x-100-200.x86_64.rpm".into());
        let lib_exclude = rpm("lib_exclude", "100", vec!["lib_exclude"], vec![]);

        content.insert_units(&repo, vec![lib_x, lib_exclude]);

        let blacklist = vec![ExclusionRule::exact("lib_exclude")];
        let item = DepsolverItem::new(vec!["lib-x".into()], blacklist, vec![repo.clone()]);
        let mut solver = make_depsolver(vec![item], Vec::new(), content);
        solver.run().await.unwrap();

        let records = solver.diagnostics().records();
        assert!(records.iter().any(|d| matches!(d, Diagnostic::NotFound { atom, .. } if atom == "lib.g")));
        assert!(
            records.iter().any(|d| matches!(d, Diagnostic::NotFound { atom, .. } if atom == "pkgX(abc)"))
        );
        assert!(
            records.iter().any(|d| matches!(d, Diagnostic::NotFound { atom, .. } if atom == "capY(xyz)"))
        );
        assert!(records.iter().any(|d| matches!(
            d,
            Diagnostic::Blacklisted { atom, requirers }
                if atom == "lib_exclude" && requirers == &vec!["lib-x-100-200.x86_64.rpm".to_string()]
        )));
    }

    #[tokio::test]
    async fn export_partitions_by_source_repo() {
        let repo_1 = Repo::new("test_repo_1");
        let repo_2 = Repo::new("test_repo_2");
        let mut content = InMemoryContentLayer::new();
        content.insert_units(&repo_1, vec![rpm("test", "100", vec![], vec![])]);
        content.insert_units(&repo_2, vec![rpm("test", "100", vec![], vec![])]);

        let item_1 = DepsolverItem::new(vec!["test".into()], Vec::new(), vec![repo_1.clone()]);
        let item_2 = DepsolverItem::new(vec!["test".into()], Vec::new(), vec![repo_2.clone()]);
        let mut solver = make_depsolver(vec![item_1, item_2], Vec::new(), content);
        solver.run().await.unwrap();

        let exported = solver.export();
        assert_eq!(exported["test_repo_1"].len(), 1);
        assert_eq!(exported["test_repo_2"].len(), 1);
    }
}
