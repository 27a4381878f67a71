use crate::error::{ReleasesError, Result};
use crate::repository::{ArtifactCoordinate, VersionSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads known versions from a local properties file instead of a
/// repository.
///
/// Each entry maps `groupId:artifactId` to a comma-separated list of
/// versions, e.g. `org.example:lib=1.0,1.1,1.2`. The file is read again on
/// every lookup.
#[derive(Debug)]
pub struct PropertyFileSource {
    path: PathBuf,
}

impl PropertyFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ReleasesError::MetadataRetrieval(format!(
                "Dependencies property file '{}' does not exist",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn read_entries(&self) -> Result<Vec<(String, String)>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ReleasesError::MetadataRetrieval(format!(
                "Failed to read '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(parse_properties(&content))
    }
}

impl VersionSource for PropertyFileSource {
    fn lookup_versions(&self, coordinate: &ArtifactCoordinate) -> Result<Vec<String>> {
        let key = coordinate.key();
        let versions = self
            .read_entries()?
            .into_iter()
            .filter(|(k, _)| *k == key)
            .flat_map(|(_, value)| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(versions)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Minimal `.properties` reader: `#`/`!` comments, `=` or `:` separators,
/// backslash line continuations. The first `=` separates key from value
/// because keys themselves contain `:`.
fn parse_properties(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut pending = String::new();

    for raw in content.lines() {
        let line = raw.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        if let Some(continued) = line.strip_suffix('\\') {
            pending.push_str(continued);
            continue;
        }

        pending.push_str(line);
        if let Some(entry) = split_entry(&pending) {
            entries.push(entry);
        }
        pending.clear();
    }

    if !pending.is_empty() {
        if let Some(entry) = split_entry(&pending) {
            entries.push(entry);
        }
    }

    entries
}

fn split_entry(line: &str) -> Option<(String, String)> {
    let (key, value) = match line.find('=') {
        Some(index) => (&line[..index], &line[index + 1..]),
        // `group:artifact: 1.0` form, the separator is the last `:`
        None => {
            let index = line.rfind(':')?;
            (&line[..index], &line[index + 1..])
        }
    };

    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), value.trim().to_string()))
}
