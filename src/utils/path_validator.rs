use crate::error::{ReleasesError, Result};
use std::path::{Path, PathBuf};

const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// Resolves user supplied paths and keeps the tool away from system
/// directories.
pub struct PathValidator;

impl PathValidator {
    /// Accepts a project directory or a descriptor file and returns the
    /// canonical path of the root `pom.xml`.
    pub fn locate_pom(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = Self::canonicalize(path)?;

        let pom = if canonical.is_dir() {
            canonical.join("pom.xml")
        } else {
            canonical
        };

        if !pom.is_file() {
            return Err(ReleasesError::ProjectValidation(format!(
                "No pom.xml found at '{}'",
                path.display()
            )));
        }

        Ok(pom)
    }

    /// Canonical path of an input file such as the dependencies property
    /// file.
    pub fn validate_input_file(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = Self::canonicalize(path)?;

        if !canonical.is_file() {
            return Err(ReleasesError::ProjectValidation(format!(
                "Path '{}' is not a file",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    fn canonicalize(path: &Path) -> Result<PathBuf> {
        let canonical = path.canonicalize().map_err(|e| {
            ReleasesError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        for forbidden in FORBIDDEN {
            let forbidden_path = Path::new(forbidden);
            let inside = canonical.starts_with(forbidden_path)
                || forbidden_path
                    .canonicalize()
                    .is_ok_and(|resolved| canonical.starts_with(resolved));

            if path.starts_with(forbidden_path) || inside {
                return Err(ReleasesError::ProjectValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }
        }

        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn locate_pom_accepts_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        let pom = PathValidator::locate_pom(dir.path()).unwrap();
        assert!(pom.ends_with("pom.xml"));
    }

    #[test]
    fn locate_pom_accepts_descriptor_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("alt-pom.xml");
        fs::write(&file, "<project/>").unwrap();
        assert!(PathValidator::locate_pom(&file).unwrap().ends_with("alt-pom.xml"));
    }

    #[test]
    fn locate_pom_rejects_directory_without_pom() {
        let dir = tempdir().unwrap();
        let err = PathValidator::locate_pom(dir.path()).unwrap_err();
        assert!(matches!(err, ReleasesError::ProjectValidation(_)));
    }

    #[test]
    fn rejects_system_directory() {
        assert!(PathValidator::locate_pom("/etc").is_err());
    }

    #[test]
    fn input_file_must_be_a_file() {
        let dir = tempdir().unwrap();
        assert!(PathValidator::validate_input_file(dir.path()).is_err());
    }
}
