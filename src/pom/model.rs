use crate::error::{ReleasesError, Result};
use crate::maven::RemoteRepository;
use crate::pom::xml::Element;
use std::collections::HashMap;

/// `<parent>` reference of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

/// A `<dependency>` declaration with placeholders already interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub packaging: String,
    pub classifier: Option<String>,
    pub scope: Option<String>,
}

impl Dependency {
    /// A BOM pulled in through `<scope>import</scope>`.
    pub fn is_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.packaging == "pom"
    }
}

/// What the updater needs to know about one `pom.xml`.
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub parent: Option<ParentRef>,
    pub properties: HashMap<String, String>,
    pub dependency_management: Vec<Dependency>,
    pub dependencies: Vec<Dependency>,
    pub modules: Vec<String>,
    pub repositories: Vec<RemoteRepository>,
}

impl ProjectModel {
    pub fn from_root(root: &Element) -> Result<Self> {
        if root.name != "project" {
            return Err(ReleasesError::PomParsing(format!(
                "Expected <project> root element, found <{}>",
                root.name
            )));
        }

        let parent = root.child("parent").map(|p| ParentRef {
            group: p.child_text("groupId").unwrap_or_default().to_string(),
            artifact: p.child_text("artifactId").unwrap_or_default().to_string(),
            version: p.child_text("version").unwrap_or_default().to_string(),
        });

        let mut model = ProjectModel {
            group: root
                .child_text("groupId")
                .or(parent.as_ref().map(|p| p.group.as_str()))
                .unwrap_or_default()
                .to_string(),
            artifact: root.child_text("artifactId").unwrap_or_default().to_string(),
            version: root
                .child_text("version")
                .or(parent.as_ref().map(|p| p.version.as_str()))
                .unwrap_or_default()
                .to_string(),
            parent,
            properties: read_properties(root),
            ..Default::default()
        };

        let interpolator = model.interpolator();
        model.group = interpolator.interpolate(&model.group);
        model.version = interpolator.interpolate(&model.version);

        let interpolator = model.interpolator();
        model.dependency_management = root
            .descend(&["dependencyManagement", "dependencies"])
            .map(|deps| read_dependencies(deps, &interpolator))
            .unwrap_or_default();
        model.dependencies = root
            .child("dependencies")
            .map(|deps| read_dependencies(deps, &interpolator))
            .unwrap_or_default();
        model.modules = root
            .child("modules")
            .map(|modules| {
                modules
                    .children_named("module")
                    .map(|m| m.text.clone())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        model.repositories = root
            .child("repositories")
            .map(|repos| {
                repos
                    .children_named("repository")
                    .filter_map(|r| {
                        let url = interpolator.interpolate(r.child_text("url")?);
                        let id = r.child_text("id").unwrap_or("remote");
                        Some(RemoteRepository::new(id, url))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(model)
    }

    /// Managed entries that import a BOM, in declaration order.
    pub fn imported_management(&self) -> impl Iterator<Item = &Dependency> {
        self.dependency_management.iter().filter(|d| d.is_import())
    }

    /// Managed entries that are not BOM imports.
    pub fn managed_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependency_management.iter().filter(|d| !d.is_import())
    }

    pub fn interpolator(&self) -> Interpolator {
        let mut values = self.properties.clone();
        for prefix in ["project", "pom"] {
            values.insert(format!("{prefix}.groupId"), self.group.clone());
            values.insert(format!("{prefix}.artifactId"), self.artifact.clone());
            values.insert(format!("{prefix}.version"), self.version.clone());
            if let Some(parent) = &self.parent {
                values.insert(format!("{prefix}.parent.groupId"), parent.group.clone());
                values.insert(format!("{prefix}.parent.version"), parent.version.clone());
            }
        }
        Interpolator { values }
    }
}

/// Resolves `${name}` placeholders; unknown names stay verbatim.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    values: HashMap<String, String>,
}

impl Interpolator {
    pub fn interpolate(&self, input: &str) -> String {
        self.interpolate_depth(input, 0)
    }

    fn interpolate_depth(&self, input: &str, depth: usize) -> String {
        // guards against properties that refer to each other
        if depth > 8 || !input.contains("${") {
            return input.to_string();
        }

        let mut output = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.values.get(name) {
                        Some(value) => output.push_str(&self.interpolate_depth(value, depth + 1)),
                        None => output.push_str(&rest[start..start + end + 3]),
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }
}

/// The property name when `raw` is exactly one `${name}` placeholder.
pub fn property_reference(raw: &str) -> Option<&str> {
    raw.strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty() && !name.contains(['$', '{', '}']))
}

fn read_properties(root: &Element) -> HashMap<String, String> {
    root.child("properties")
        .map(|props| {
            props
                .children
                .iter()
                .map(|p| (p.name.clone(), p.text.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn read_dependencies(dependencies: &Element, interpolator: &Interpolator) -> Vec<Dependency> {
    dependencies
        .children_named("dependency")
        .map(|dep| Dependency {
            group: interpolator.interpolate(dep.child_text("groupId").unwrap_or_default()),
            artifact: interpolator.interpolate(dep.child_text("artifactId").unwrap_or_default()),
            version: dep
                .child_text("version")
                .filter(|v| !v.is_empty())
                .map(|v| interpolator.interpolate(v)),
            packaging: dep.child_text("type").unwrap_or("jar").to_string(),
            classifier: dep
                .child_text("classifier")
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            scope: dep.child_text("scope").map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::xml::parse;

    const POM: &str = r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>3-SNAPSHOT</version>
  </parent>
  <artifactId>app</artifactId>
  <properties>
    <lib.version>1.2.3-SNAPSHOT</lib.version>
    <alias.version>${lib.version}</alias.version>
  </properties>
  <modules>
    <module>core</module>
    <module>cli</module>
  </modules>
  <repositories>
    <repository><id>internal</id><url>https://repo.example.com/maven2/</url></repository>
  </repositories>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.example</groupId>
        <artifactId>bom</artifactId>
        <version>2.0-SNAPSHOT</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
      <dependency>
        <groupId>${project.groupId}</groupId>
        <artifactId>managed</artifactId>
        <version>${alias.version}</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>managed</artifactId>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>sibling</artifactId>
      <version>${project.version}</version>
      <classifier>tests</classifier>
    </dependency>
  </dependencies>
</project>"#;

    fn model() -> ProjectModel {
        ProjectModel::from_root(&parse(POM).unwrap()).unwrap()
    }

    #[test]
    fn inherits_coordinates_from_parent() {
        let model = model();
        assert_eq!(model.group, "org.example");
        assert_eq!(model.artifact, "app");
        assert_eq!(model.version, "3-SNAPSHOT");
        assert_eq!(model.parent.unwrap().version, "3-SNAPSHOT");
    }

    #[test]
    fn splits_imports_from_managed_entries() {
        let model = model();
        let imports: Vec<&str> = model.imported_management().map(|d| d.artifact.as_str()).collect();
        let managed: Vec<&Dependency> = model.managed_dependencies().collect();
        assert_eq!(imports, vec!["bom"]);
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].group, "org.example");
        assert_eq!(managed[0].version.as_deref(), Some("1.2.3-SNAPSHOT"));
    }

    #[test]
    fn reads_dependencies_with_interpolation() {
        let model = model();
        assert_eq!(model.dependencies.len(), 2);
        assert_eq!(model.dependencies[0].version, None);
        assert_eq!(model.dependencies[1].version.as_deref(), Some("3-SNAPSHOT"));
        assert_eq!(model.dependencies[1].classifier.as_deref(), Some("tests"));
    }

    #[test]
    fn reads_modules_and_repositories() {
        let model = model();
        assert_eq!(model.modules, vec!["core", "cli"]);
        assert_eq!(
            model.repositories,
            vec![RemoteRepository::new("internal", "https://repo.example.com/maven2")]
        );
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let interpolator = model().interpolator();
        assert_eq!(interpolator.interpolate("${missing}-x"), "${missing}-x");
        assert_eq!(interpolator.interpolate("v${lib.version}"), "v1.2.3-SNAPSHOT");
        assert_eq!(interpolator.interpolate("${unterminated"), "${unterminated");
    }

    #[test]
    fn detects_single_property_reference() {
        assert_eq!(property_reference("${lib.version}"), Some("lib.version"));
        assert_eq!(property_reference("${a}${b}"), None);
        assert_eq!(property_reference("1.0"), None);
    }

    #[test]
    fn rejects_non_project_root() {
        let err = ProjectModel::from_root(&parse("<settings/>").unwrap()).unwrap_err();
        assert!(matches!(err, ReleasesError::PomParsing(_)));
    }
}
