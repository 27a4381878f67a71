use crate::error::{ReleasesError, Result};
use crate::repository::ArtifactCoordinate;
use regex::Regex;

/// Include/exclude rules over `groupId:artifactId:type:classifier:version`.
#[derive(Debug, Default)]
pub struct ArtifactFilter {
    includes: Vec<ArtifactPattern>,
    excludes: Vec<ArtifactPattern>,
}

impl ArtifactFilter {
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: ArtifactPattern::parse_all(includes)?,
            excludes: ArtifactPattern::parse_all(excludes)?,
        })
    }

    pub fn is_included(&self, coordinate: &ArtifactCoordinate) -> bool {
        let included =
            self.includes.is_empty() || self.includes.iter().any(|p| p.matches(coordinate));
        included && !self.excludes.iter().any(|p| p.matches(coordinate))
    }
}

#[derive(Debug)]
struct ArtifactPattern {
    segments: Vec<Regex>,
}

impl ArtifactPattern {
    /// Each entry may itself hold several comma-separated patterns.
    fn parse_all(patterns: &[String]) -> Result<Vec<Self>> {
        patterns
            .iter()
            .flat_map(|p| p.split(','))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Self::new)
            .collect()
    }

    fn new(pattern: &str) -> Result<Self> {
        let segments = pattern
            .split(':')
            .map(|segment| Self::compile_glob(pattern, segment))
            .collect::<Result<Vec<_>>>()?;

        if segments.len() > 5 {
            return Err(ReleasesError::ProjectValidation(format!(
                "Invalid artifact pattern '{}'. Expected groupId:artifactId:type:classifier:version",
                pattern
            )));
        }

        Ok(Self { segments })
    }

    fn matches(&self, coordinate: &ArtifactCoordinate) -> bool {
        let values = [
            coordinate.group.as_str(),
            coordinate.artifact.as_str(),
            coordinate.packaging.as_str(),
            coordinate.classifier.as_deref().unwrap_or(""),
            coordinate.version.as_str(),
        ];

        self.segments
            .iter()
            .zip(values)
            .all(|(segment, value)| segment.is_match(value))
    }

    fn compile_glob(pattern: &str, segment: &str) -> Result<Regex> {
        let mut regex = String::from("^");
        for ch in segment.chars() {
            match ch {
                '*' => regex.push_str(".*"),
                '?' => regex.push('.'),
                '.' | '+' | '(' | ')' | '|' | '^' | '$' | '{' | '}' | '[' | ']' | '\\' => {
                    regex.push('\\');
                    regex.push(ch);
                }
                _ => regex.push(ch),
            }
        }
        regex.push('$');

        Regex::new(&regex).map_err(|e| {
            ReleasesError::ProjectValidation(format!(
                "Invalid artifact pattern '{}': {}",
                pattern, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(group: &str, artifact: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::new(group, artifact).with_version("1.0-SNAPSHOT")
    }

    fn filter(includes: &[&str], excludes: &[&str]) -> ArtifactFilter {
        let includes: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
        ArtifactFilter::new(&includes, &excludes).unwrap()
    }

    #[test]
    fn empty_filter_includes_everything() {
        assert!(filter(&[], &[]).is_included(&coordinate("org.example", "lib")));
    }

    #[test]
    fn includes_restrict_by_group_and_artifact() {
        let f = filter(&["org.example:*"], &[]);
        assert!(f.is_included(&coordinate("org.example", "lib")));
        assert!(!f.is_included(&coordinate("org.other", "lib")));
    }

    #[test]
    fn excludes_win_over_includes() {
        let f = filter(&["org.example"], &["*:internal-*"]);
        assert!(f.is_included(&coordinate("org.example", "lib")));
        assert!(!f.is_included(&coordinate("org.example", "internal-api")));
    }

    #[test]
    fn comma_separated_patterns_and_version_segment() {
        let f = filter(&["org.a:*,org.b:*:jar:*:1.0-*"], &[]);
        assert!(f.is_included(&coordinate("org.a", "x")));
        assert!(f.is_included(&coordinate("org.b", "y")));
        assert!(!f.is_included(&coordinate("org.c", "z")));
    }

    #[test]
    fn dots_are_literal() {
        let f = filter(&["org.example"], &[]);
        assert!(!f.is_included(&coordinate("orgXexample", "lib")));
    }

    #[test]
    fn rejects_too_many_segments() {
        let patterns = vec!["a:b:c:d:e:f".to_string()];
        assert!(ArtifactFilter::new(&patterns, &[]).is_err());
    }
}
