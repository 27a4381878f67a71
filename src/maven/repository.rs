use crate::error::{ReleasesError, Result};
use crate::maven::version::VersionComparator;
use crate::repository::{ArtifactCoordinate, VersionSource};
use quick_xml::de::from_str;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";
const MAX_METADATA_BYTES: usize = 10 * 1024 * 1024;

/// A remote Maven repository, as declared in `<repositories>` or on the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            id: id.into(),
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn maven_central() -> Self {
        Self::new("central", DEFAULT_MAVEN_CENTRAL)
    }
}

/// Maven repository client
pub struct MavenRepository {
    client: Client,
    repositories: Vec<RemoteRepository>,
}

impl MavenRepository {
    pub fn with_repositories(repositories: Vec<RemoteRepository>) -> Result<Self> {
        let client = Self::build_client()?;
        let repositories = if repositories.is_empty() {
            vec![RemoteRepository::maven_central()]
        } else {
            repositories
        };

        let repositories = Self::ensure_valid_repositories(repositories)?;

        Ok(Self {
            client,
            repositories,
        })
    }

    pub fn repositories(&self) -> &[RemoteRepository] {
        &self.repositories
    }

    /// Fetch every version known to any configured repository, sorted from
    /// oldest to newest.
    pub fn fetch_available_versions(&self, group: &str, artifact: &str) -> Result<Vec<String>> {
        let mut versions = Vec::new();
        for repo in &self.repositories {
            if let Some(found) =
                self.fetch_all_versions_from_repository(&repo.url, group, artifact)?
            {
                versions.extend(found);
            }
        }

        Ok(VersionComparator::sort_ascending(versions))
    }

    /// `Ok(None)` when the repository does not host the artifact.
    fn fetch_all_versions_from_repository(
        &self,
        repo_url: &str,
        group: &str,
        artifact: &str,
    ) -> Result<Option<Vec<String>>> {
        let metadata_url = Self::metadata_url(repo_url, group, artifact);

        let response = self.client.get(&metadata_url).send().map_err(|e| {
            ReleasesError::MetadataRetrieval(format!("Request to {metadata_url} failed: {e}"))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ReleasesError::MetadataRetrieval(format!(
                "HTTP {} for {}",
                response.status(),
                metadata_url
            )));
        }

        let text = response.text().map_err(|e| {
            ReleasesError::MetadataRetrieval(format!("Failed to read {metadata_url}: {e}"))
        })?;

        Self::parse_metadata(&text).map(Some)
    }

    fn metadata_url(repo_url: &str, group: &str, artifact: &str) -> String {
        let group_path = group.replace('.', "/");
        format!(
            "{}/{}/{}/maven-metadata.xml",
            repo_url.trim_end_matches('/'),
            group_path,
            artifact
        )
    }

    fn parse_metadata(text: &str) -> Result<Vec<String>> {
        if text.len() > MAX_METADATA_BYTES {
            return Err(ReleasesError::MetadataRetrieval(
                "Maven metadata response exceeded 10MB limit".to_string(),
            ));
        }

        let metadata: MavenMetadata = from_str(text).map_err(|e| {
            ReleasesError::MetadataRetrieval(format!("Failed to parse Maven metadata: {e}"))
        })?;

        Ok(metadata
            .versioning
            .and_then(|v| v.versions)
            .map(|v| v.version)
            .unwrap_or_default())
    }
}

impl VersionSource for MavenRepository {
    fn lookup_versions(&self, coordinate: &ArtifactCoordinate) -> Result<Vec<String>> {
        self.fetch_available_versions(&coordinate.group, &coordinate.artifact)
    }

    fn describe(&self) -> String {
        let urls: Vec<&str> = self.repositories().iter().map(|r| r.url.as_str()).collect();
        format!("repositories {}", urls.join(", "))
    }
}

impl MavenRepository {
    fn build_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("pom-releases/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleasesError::MetadataRetrieval(format!("HTTP client setup failed: {e}")))
    }

    fn ensure_valid_repositories(
        repositories: Vec<RemoteRepository>,
    ) -> Result<Vec<RemoteRepository>> {
        for repo in &repositories {
            Self::validate_repository_url(&repo.url)?;
        }
        Ok(repositories)
    }

    fn validate_repository_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|_| {
            ReleasesError::ProjectValidation(format!("Invalid repository URL: {url}"))
        })?;

        match parsed.scheme() {
            "https" | "http" => {}
            scheme => {
                return Err(ReleasesError::ProjectValidation(format!(
                    "Unsupported repository scheme: {scheme}"
                )));
            }
        }

        if let Some(host) = parsed.host_str() {
            if Self::is_private_host(host) {
                return Err(ReleasesError::ProjectValidation(format!(
                    "Repository host '{host}' is private or loopback and not allowed"
                )));
            }
        }

        Ok(())
    }

    fn is_private_host(host: &str) -> bool {
        if host.eq_ignore_ascii_case("localhost") {
            return true;
        }

        let host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            match ip {
                IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
                IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local(),
            }
        } else {
            false
        }
    }
}

#[derive(Debug, Deserialize)]
struct MavenMetadata {
    versioning: Option<Versioning>,
}

#[derive(Debug, Deserialize)]
struct Versioning {
    versions: Option<Versions>,
}

#[derive(Debug, Deserialize)]
struct Versions {
    #[serde(default)]
    version: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_repository() {
        assert!(
            MavenRepository::validate_repository_url("https://repo.maven.apache.org/maven2")
                .is_ok()
        );
    }

    #[test]
    fn rejects_invalid_scheme() {
        let err = MavenRepository::validate_repository_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, ReleasesError::ProjectValidation(_)));
    }

    #[test]
    fn rejects_private_host() {
        let err = MavenRepository::validate_repository_url("https://127.0.0.1/repo").unwrap_err();
        assert!(matches!(err, ReleasesError::ProjectValidation(_)));
    }

    #[test]
    fn defaults_to_maven_central() {
        let repo = MavenRepository::with_repositories(Vec::new()).unwrap();
        assert_eq!(repo.repositories(), &[RemoteRepository::maven_central()]);
    }

    #[test]
    fn builds_metadata_url_from_group_path() {
        assert_eq!(
            MavenRepository::metadata_url(
                "https://repo.example.com/maven2/",
                "org.example.tools",
                "lib"
            ),
            "https://repo.example.com/maven2/org/example/tools/lib/maven-metadata.xml"
        );
    }

    #[test]
    fn parses_metadata_versions_in_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.example</groupId>
  <artifactId>lib</artifactId>
  <versioning>
    <latest>1.2.4</latest>
    <release>1.2.4</release>
    <versions>
      <version>1.0</version>
      <version>1.2.3</version>
      <version>1.2.4</version>
    </versions>
    <lastUpdated>20240101000000</lastUpdated>
  </versioning>
</metadata>"#;
        assert_eq!(
            MavenRepository::parse_metadata(xml).unwrap(),
            vec!["1.0", "1.2.3", "1.2.4"]
        );
    }

    #[test]
    fn metadata_without_versions_is_empty() {
        let xml = "<metadata><groupId>g</groupId><artifactId>a</artifactId></metadata>";
        assert!(MavenRepository::parse_metadata(xml).unwrap().is_empty());
    }

    #[test]
    fn malformed_metadata_is_a_retrieval_failure() {
        let err = MavenRepository::parse_metadata("<metadata><versioning>").unwrap_err();
        assert!(matches!(err, ReleasesError::MetadataRetrieval(_)));
    }
}
