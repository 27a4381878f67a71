use crate::error::{ReleasesError, Result};
use crate::pom::model::{ProjectModel, property_reference};
use crate::pom::xml::{self, Element};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Section of the descriptor a dependency declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    Dependencies,
    DependencyManagement,
}

impl DependencySection {
    fn path(self) -> &'static [&'static str] {
        match self {
            DependencySection::Dependencies => &["dependencies"],
            DependencySection::DependencyManagement => &["dependencyManagement", "dependencies"],
        }
    }
}

/// Finds the occurrence of a version inside the descriptor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Parent,
    Dependency {
        section: DependencySection,
        group: String,
        artifact: String,
    },
}

/// Applies a single version substitution to a descriptor.
pub trait DescriptorRewriter {
    /// Returns `true` only when the text actually changed.
    fn rewrite_version(&mut self, locator: &Locator, old: &str, new: &str) -> Result<bool>;
}

/// In-memory `pom.xml` whose text is edited in place.
#[derive(Debug, Clone)]
pub struct PomDocument {
    path: Option<PathBuf>,
    text: String,
}

impl PomDocument {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ReleasesError::PomParsing(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Result<Element> {
        xml::parse(&self.text)
    }

    /// Reads the project model from the current text.
    pub fn model(&self) -> Result<ProjectModel> {
        ProjectModel::from_root(&self.root()?)
    }

    /// Writes the text back to where it was loaded from, keeping the previous
    /// content as `pom.xml.versionsBackup` when `backup` is set.
    pub fn save(&self, backup: bool) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            ReleasesError::DocumentRewrite("Document was not loaded from a file".to_string())
        })?;

        if backup {
            let mut backup_path = path.as_os_str().to_owned();
            backup_path.push(".versionsBackup");
            fs::copy(path, PathBuf::from(backup_path))?;
        }

        fs::write(path, &self.text).map_err(|e| {
            ReleasesError::DocumentRewrite(format!("Failed to write '{}': {}", path.display(), e))
        })
    }

    pub fn set_project_parent_version(&mut self, new: &str) -> Result<bool> {
        let root = self.parsed_root()?;
        let Some(version) = root.descend(&["parent", "version"]) else {
            return Ok(false);
        };

        if version.text == new {
            return Ok(false);
        }

        let span = version.text_span.clone();
        self.apply_edits(vec![(span, new.to_string())]);
        Ok(true)
    }

    /// Rewrites every matching declaration in `section` whose current version
    /// is `old`. A `${property}` version is updated through the property.
    ///
    /// A declaration that already reads `new`, typically through a property
    /// shared with an entry rewritten earlier, counts as updated.
    pub fn set_dependency_version(
        &mut self,
        section: DependencySection,
        group: &str,
        artifact: &str,
        old: &str,
        new: &str,
    ) -> Result<bool> {
        let root = self.parsed_root()?;
        let model = ProjectModel::from_root(&root)
            .map_err(|e| ReleasesError::DocumentRewrite(e.to_string()))?;
        let interpolator = model.interpolator();

        let Some(dependencies) = root.descend(section.path()) else {
            return Ok(false);
        };

        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut already_updated = false;
        for dep in dependencies.children_named("dependency") {
            let matches_coordinate = dep
                .child_text("groupId")
                .is_some_and(|g| interpolator.interpolate(g) == group)
                && dep
                    .child_text("artifactId")
                    .is_some_and(|a| interpolator.interpolate(a) == artifact);
            if !matches_coordinate {
                continue;
            }

            let Some(version) = dep.child("version") else {
                continue;
            };
            let current = interpolator.interpolate(&version.text);
            if current != old {
                // an earlier rewrite of a shared property already moved it
                already_updated |= current == new;
                continue;
            }

            let span = match property_reference(&version.text) {
                Some(name) => match root.descend(&["properties", name]) {
                    Some(property) if property.text == old => property.text_span.clone(),
                    // defined elsewhere (parent, nested property); leave it alone
                    _ => continue,
                },
                None => version.text_span.clone(),
            };

            if !edits.iter().any(|(existing, _)| *existing == span) {
                edits.push((span, new.to_string()));
            }
        }

        if old == new {
            return Ok(false);
        }
        if edits.is_empty() {
            return Ok(already_updated);
        }

        self.apply_edits(edits);
        Ok(true)
    }

    fn parsed_root(&self) -> Result<Element> {
        self.root().map_err(|e| ReleasesError::DocumentRewrite(e.to_string()))
    }

    fn apply_edits(&mut self, mut edits: Vec<(Range<usize>, String)>) {
        // back to front so earlier spans stay valid
        edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        for (span, replacement) in edits {
            self.text.replace_range(span, &replacement);
        }
    }
}

impl DescriptorRewriter for PomDocument {
    fn rewrite_version(&mut self, locator: &Locator, old: &str, new: &str) -> Result<bool> {
        match locator {
            Locator::Parent => self.set_project_parent_version(new),
            Locator::Dependency {
                section,
                group,
                artifact,
            } => self.set_dependency_version(*section, group, artifact, old, new),
        }
    }
}
