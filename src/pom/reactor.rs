use crate::error::{ReleasesError, Result};
use crate::pom::document::PomDocument;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One project taking part in the multi-module build.
#[derive(Debug, Clone)]
pub struct ReactorProject {
    pub pom_path: PathBuf,
    pub group: String,
    pub artifact: String,
}

/// All projects built together from a root `pom.xml`.
#[derive(Debug, Clone, Default)]
pub struct Reactor {
    projects: Vec<ReactorProject>,
}

impl Reactor {
    /// Walks `<modules>` recursively starting at `root_pom`.
    pub fn discover<P: AsRef<Path>>(root_pom: P) -> Result<Self> {
        let mut reactor = Reactor::default();
        let mut seen = HashSet::new();
        reactor.visit(root_pom.as_ref(), &mut seen)?;
        Ok(reactor)
    }

    #[cfg(test)]
    pub fn from_projects(projects: Vec<ReactorProject>) -> Self {
        Self { projects }
    }

    fn visit(&mut self, pom_path: &Path, seen: &mut HashSet<PathBuf>) -> Result<()> {
        let canonical = pom_path.canonicalize().map_err(|e| {
            ReleasesError::ProjectValidation(format!(
                "Module descriptor '{}' not found: {}",
                pom_path.display(),
                e
            ))
        })?;
        if !seen.insert(canonical.clone()) {
            return Ok(());
        }

        let model = PomDocument::load(&canonical)?.model()?;
        self.projects.push(ReactorProject {
            pom_path: canonical.clone(),
            group: model.group.clone(),
            artifact: model.artifact.clone(),
        });

        let base = canonical.parent().unwrap_or(Path::new("."));
        for module in &model.modules {
            self.visit(&module_pom_path(base, module), seen)?;
        }

        Ok(())
    }

    pub fn projects(&self) -> &[ReactorProject] {
        &self.projects
    }

    pub fn contains(&self, group: &str, artifact: &str) -> bool {
        self.projects
            .iter()
            .any(|p| p.group == group && p.artifact == artifact)
    }
}

/// A module names either a directory holding `pom.xml` or a descriptor file.
fn module_pom_path(base: &Path, module: &str) -> PathBuf {
    let candidate = base.join(module);
    if candidate.is_file() {
        candidate
    } else {
        candidate.join("pom.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discovers_nested_modules() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("pom.xml"),
            "<project><groupId>org.example</groupId><artifactId>root</artifactId>\
             <modules><module>core</module><module>tools/alt-pom.xml</module></modules></project>",
        );
        write(
            &root.join("core/pom.xml"),
            "<project><parent><groupId>org.example</groupId><artifactId>root</artifactId>\
             <version>1-SNAPSHOT</version></parent><artifactId>core</artifactId>\
             <modules><module>../core</module></modules></project>",
        );
        write(
            &root.join("tools/alt-pom.xml"),
            "<project><groupId>org.example.tools</groupId><artifactId>tools</artifactId></project>",
        );

        let reactor = Reactor::discover(root.join("pom.xml")).unwrap();
        let names: Vec<&str> = reactor.projects().iter().map(|p| p.artifact.as_str()).collect();
        assert_eq!(names, vec!["root", "core", "tools"]);
        assert!(reactor.contains("org.example", "core"));
        assert!(reactor.contains("org.example.tools", "tools"));
        assert!(!reactor.contains("org.example", "tools"));
    }

    #[test]
    fn missing_module_is_reported() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("pom.xml"),
            "<project><artifactId>root</artifactId><modules><module>gone</module></modules></project>",
        );
        let err = Reactor::discover(dir.path().join("pom.xml")).unwrap_err();
        assert!(matches!(err, ReleasesError::ProjectValidation(_)));
    }
}
