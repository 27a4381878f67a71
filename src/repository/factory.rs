use crate::error::Result;
use crate::maven::{MavenRepository, RemoteRepository};
use crate::repository::{PropertyFileSource, VersionSource};
use std::path::Path;

pub struct VersionSourceFactory;

impl VersionSourceFactory {
    /// A configured property file always wins over remote repositories.
    pub fn create(
        property_file: Option<&Path>,
        repositories: Vec<RemoteRepository>,
    ) -> Result<Box<dyn VersionSource>> {
        match property_file {
            Some(path) => Ok(Box::new(PropertyFileSource::open(path)?)),
            None => Ok(Box::new(MavenRepository::with_repositories(repositories)?)),
        }
    }
}
