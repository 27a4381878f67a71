use crate::error::{ReleasesError, Result};
use crate::log::Log;
use crate::maven::version::{match_snapshot, validate_version_spec};
use crate::pom::{Dependency, DependencySection, DescriptorRewriter, Locator, ProjectModel, Reactor};
use crate::repository::{ArtifactCoordinate, VersionSource};
use crate::updater::filter::ArtifactFilter;
use crate::updater::report::UpdateReport;
use crate::updater::selector::{MatchPolicy, VersionSelector};
use std::fmt;
use std::path::PathBuf;

/// Options of a `use-releases` run.
#[derive(Debug, Clone)]
pub struct UseReleasesConfig {
    /// Prefix matching instead of exact matching
    pub allow_range_matching: bool,
    /// Zero-fill the release prefix before prefix matching
    pub pad_version_for_range_matching: bool,
    /// Read known versions from this file instead of repositories
    pub dependencies_property_file: Option<PathBuf>,
    /// Abort when a snapshot has no matching release
    pub fail_if_not_replaced: bool,
    pub process_parent: bool,
    pub process_dependency_management: bool,
    pub process_dependencies: bool,
    /// Skip dependencies produced by the same multi-module build
    pub exclude_reactor: bool,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl Default for UseReleasesConfig {
    fn default() -> Self {
        Self {
            allow_range_matching: false,
            pad_version_for_range_matching: false,
            dependencies_property_file: None,
            fail_if_not_replaced: false,
            process_parent: false,
            process_dependency_management: true,
            process_dependencies: true,
            exclude_reactor: true,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

impl UseReleasesConfig {
    pub fn match_policy(&self) -> MatchPolicy {
        if self.allow_range_matching {
            MatchPolicy::Range {
                pad: self.pad_version_for_range_matching,
            }
        } else {
            MatchPolicy::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    ImportedManagement,
    ManagedDependency,
    Dependency,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Parent => "project",
            EntryKind::ImportedManagement => "imported dependency management",
            EntryKind::ManagedDependency => "managed dependency",
            EntryKind::Dependency => "dependency",
        };
        f.write_str(label)
    }
}

/// A versioned declaration the updater may rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub kind: EntryKind,
    /// Coordinate carrying the current version.
    pub coordinate: ArtifactCoordinate,
    pub version: String,
    pub locator: Locator,
}

impl DependencyEntry {
    fn parent(model: &ProjectModel) -> Option<Self> {
        let parent = model.parent.as_ref()?;
        if parent.version.is_empty() {
            return None;
        }

        Some(Self {
            kind: EntryKind::Parent,
            coordinate: ArtifactCoordinate::new(parent.group.as_str(), parent.artifact.as_str())
                .with_packaging("pom")
                .with_version(parent.version.as_str()),
            version: parent.version.clone(),
            locator: Locator::Parent,
        })
    }

    fn dependency(kind: EntryKind, section: DependencySection, dep: &Dependency) -> Option<Self> {
        let version = dep.version.as_deref()?;
        if dep.group.is_empty() || dep.artifact.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            coordinate: ArtifactCoordinate::new(dep.group.as_str(), dep.artifact.as_str())
                .with_packaging(dep.packaging.as_str())
                .with_classifier(dep.classifier.clone())
                .with_version(version),
            version: version.to_string(),
            locator: Locator::Dependency {
                section,
                group: dep.group.clone(),
                artifact: dep.artifact.clone(),
            },
        })
    }

    /// Entries in visiting order: parent, imported BOMs, managed entries,
    /// then direct dependencies.
    pub fn collect(model: &ProjectModel, config: &UseReleasesConfig) -> Vec<Self> {
        let mut entries = Vec::new();

        if config.process_parent {
            entries.extend(Self::parent(model));
        }

        if config.process_dependency_management {
            let section = DependencySection::DependencyManagement;
            entries.extend(
                model
                    .imported_management()
                    .filter_map(|d| Self::dependency(EntryKind::ImportedManagement, section, d)),
            );
            entries.extend(
                model
                    .managed_dependencies()
                    .filter_map(|d| Self::dependency(EntryKind::ManagedDependency, section, d)),
            );
        }

        if config.process_dependencies {
            entries.extend(model.dependencies.iter().filter_map(|d| {
                Self::dependency(EntryKind::Dependency, DependencySection::Dependencies, d)
            }));
        }

        entries
    }

    fn is_dependency(&self) -> bool {
        !matches!(self.kind, EntryKind::Parent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Not a snapshot, excluded, or produced by the reactor.
    NoOp,
    Resolved(String),
    Unresolved,
}

/// Replaces snapshot versions of one descriptor with released versions.
pub struct DependencyUpdatePlanner<'a> {
    config: &'a UseReleasesConfig,
    source: &'a dyn VersionSource,
    log: &'a dyn Log,
    filter: ArtifactFilter,
    selector: VersionSelector,
}

impl<'a> DependencyUpdatePlanner<'a> {
    pub fn new(
        config: &'a UseReleasesConfig,
        source: &'a dyn VersionSource,
        log: &'a dyn Log,
    ) -> Result<Self> {
        Ok(Self {
            config,
            source,
            log,
            filter: ArtifactFilter::new(&config.includes, &config.excludes)?,
            selector: VersionSelector::new(config.match_policy()),
        })
    }

    /// Processes every entry of `model`, rewriting through `rewriter`.
    ///
    /// Stops at the first fatal error; rewrites made before it stay applied.
    pub fn update(
        &self,
        model: &ProjectModel,
        reactor: &Reactor,
        rewriter: &mut dyn DescriptorRewriter,
    ) -> Result<UpdateReport> {
        let mut report = UpdateReport::new();
        for entry in DependencyEntry::collect(model, self.config) {
            self.apply(&entry, reactor, rewriter, &mut report)?;
        }
        Ok(report)
    }

    fn apply(
        &self,
        entry: &DependencyEntry,
        reactor: &Reactor,
        rewriter: &mut dyn DescriptorRewriter,
        report: &mut UpdateReport,
    ) -> Result<()> {
        let name = entry.coordinate.to_string();

        match self.decide(entry, reactor)? {
            UpdateDecision::NoOp => {}
            UpdateDecision::Resolved(target) => {
                if rewriter.rewrite_version(&entry.locator, &entry.version, &target)? {
                    self.log.info(&format!("Updated {} to version {}", name, target));
                    report.add_update(
                        entry.kind,
                        entry.coordinate.key(),
                        entry.version.clone(),
                        target,
                    );
                } else {
                    self.log.warn(&format!(
                        "Version of {} is not declared in this descriptor, leaving it unchanged",
                        name
                    ));
                }
            }
            UpdateDecision::Unresolved => {
                let via = match self.selector.policy() {
                    MatchPolicy::Exact => "",
                    MatchPolicy::Range { .. } => " via rangeMatching",
                };
                self.log.info(&format!("No matching release of {} to update{}.", name, via));

                if self.config.fail_if_not_replaced {
                    let coordinate = ArtifactCoordinate {
                        version: String::new(),
                        ..entry.coordinate.clone()
                    };
                    return Err(ReleasesError::UnresolvedVersion {
                        coordinate: coordinate.to_string(),
                        version: entry.version.clone(),
                    });
                }
                report.add_unresolved(name);
            }
        }

        Ok(())
    }

    /// Works out what should happen to `entry` without touching the document.
    pub fn decide(&self, entry: &DependencyEntry, reactor: &Reactor) -> Result<UpdateDecision> {
        let name = entry.coordinate.to_string();

        if entry.is_dependency()
            && self.config.exclude_reactor
            && reactor.contains(&entry.coordinate.group, &entry.coordinate.artifact)
        {
            self.log.info(&format!("Ignoring reactor dependency: {}", name));
            return Ok(UpdateDecision::NoOp);
        }

        let Some(release) = match_snapshot(&entry.version) else {
            return Ok(UpdateDecision::NoOp);
        };

        if let Err(err) = validate_version_spec(release) {
            return Err(ReleasesError::InvalidVersionSpec(format!(
                "{} of {} ({})",
                entry.version, entry.coordinate.key(), err
            )));
        }

        if !self.filter.is_included(&entry.coordinate) {
            self.log.debug(&format!("Skipping excluded {} {}", entry.kind, name));
            return Ok(UpdateDecision::NoOp);
        }

        self.log.debug(&format!("Looking for a release of {}", name));

        // metadata lookups for a snapshot version do not report releases
        let lookup = entry.coordinate.clone().with_version(release);
        let known = self.source.lookup_versions(&lookup)?;

        let selection = self.selector.select(release, &known);
        if selection.padded {
            self.log.info(&format!(
                "Padded version {} to {} for {} {}",
                release, selection.prefix, entry.kind, name
            ));
        }

        match selection.version {
            Some(version) => {
                if matches!(self.selector.policy(), MatchPolicy::Range { .. }) {
                    self.log.debug(&format!(
                        "Found matching version for {} to version {}",
                        name, version
                    ));
                }
                Ok(UpdateDecision::Resolved(version))
            }
            None => Ok(UpdateDecision::Unresolved),
        }
    }
}
