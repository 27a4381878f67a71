use crate::error::Result;
use std::fmt;

pub mod factory;
pub mod property_file;

pub use factory::VersionSourceFactory;
pub use property_file::PropertyFileSource;

/// Identifies an artifact independent of its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinate {
    pub group: String,
    pub artifact: String,
    pub packaging: String,
    pub classifier: Option<String>,
    /// Version the lookup is made for; the release prefix, never the snapshot.
    pub version: String,
}

impl ArtifactCoordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            packaging: "jar".to_string(),
            classifier: None,
            version: String::new(),
        }
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// `group:artifact`, the key used by repositories and property files.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)?;
        if self.packaging != "jar" || self.classifier.is_some() {
            write!(f, ":{}", self.packaging)?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        if !self.version.is_empty() {
            write!(f, ":{}", self.version)?;
        }
        Ok(())
    }
}

/// Supplies the versions known for an artifact.
pub trait VersionSource {
    fn lookup_versions(&self, coordinate: &ArtifactCoordinate) -> Result<Vec<String>>;

    /// Human readable description used in log output.
    fn describe(&self) -> String;
}
