use crate::error::{ReleasesError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

// Literal -SNAPSHOT or a deployed timestamp build such as -20230101.120000-5
static SNAPSHOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)-((SNAPSHOT)|(\d{8}\.\d{6}-\d+))$").expect("snapshot pattern is valid")
});

/// Returns the release prefix of a snapshot version, or `None` when the
/// version is not a snapshot.
///
/// `1.2.3-SNAPSHOT` and `1.2.3-20230101.120000-5` both yield `1.2.3`.
pub fn match_snapshot(version: &str) -> Option<&str> {
    SNAPSHOT_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// True for anything a repository would treat as a snapshot build.
pub fn is_snapshot(version: &str) -> bool {
    version.ends_with("SNAPSHOT") || SNAPSHOT_RE.is_match(version)
}

/// Zero-fills the minor and incremental components of a version so that
/// prefix matching does not accept unintended releases (`4.2` would
/// otherwise match `4.2.1`).
pub fn pad_version(version: &str) -> String {
    let numeric_part = version.split('-').next().unwrap_or(version);
    let mut components = [0u64; 3];
    for (slot, token) in components.iter_mut().zip(numeric_part.split('.')) {
        match token.parse::<u64>() {
            Ok(value) => *slot = value,
            Err(_) => break,
        }
    }

    let [major, minor, incremental] = components;
    if minor == 0 && incremental == 0 {
        format!("{major}.0.0")
    } else if incremental == 0 {
        format!("{major}.{minor}.0")
    } else {
        version.to_string()
    }
}

/// Checks that `spec` is usable as a Maven version specification: either a
/// plain version or a set of bracketed ranges such as `[1.0,2.0),[3.0,)`.
pub fn validate_version_spec(spec: &str) -> Result<()> {
    let invalid = |reason: &str| ReleasesError::InvalidVersionSpec(format!("{spec} ({reason})"));

    let mut process = spec.trim();
    let mut ranges = 0usize;
    let mut previous_upper: Option<Option<Version>> = None;

    while process.starts_with('[') || process.starts_with('(') {
        let close = match (process.find(')'), process.find(']')) {
            (Some(paren), Some(bracket)) => paren.min(bracket),
            (Some(paren), None) => paren,
            (None, Some(bracket)) => bracket,
            (None, None) => return Err(invalid("unbounded range")),
        };

        let (lower, upper) = parse_restriction(&process[..=close]).map_err(invalid)?;

        if let Some(Some(previous)) = &previous_upper {
            match &lower {
                Some(lower) if lower >= previous => {}
                _ => return Err(invalid("ranges overlap")),
            }
        }

        previous_upper = Some(upper);
        ranges += 1;

        process = process[close + 1..].trim();
        if let Some(rest) = process.strip_prefix(',') {
            process = rest.trim();
        }
    }

    if !process.is_empty() && ranges > 0 {
        return Err(invalid("only fully-qualified sets allowed in multiple set scenario"));
    }

    Ok(())
}

type Restriction = (Option<Version>, Option<Version>);

fn parse_restriction(spec: &str) -> std::result::Result<Restriction, &'static str> {
    let lower_inclusive = spec.starts_with('[');
    let upper_inclusive = spec.ends_with(']');
    let inner = spec[1..spec.len() - 1].trim();

    match inner.find(',') {
        None => {
            if !lower_inclusive || !upper_inclusive {
                return Err("single version must be surrounded by []");
            }
            let version = Version::parse(inner);
            Ok((Some(version.clone()), Some(version)))
        }
        Some(index) => {
            let lower = inner[..index].trim();
            let upper = inner[index + 1..].trim();
            if lower == upper {
                return Err("range cannot have identical boundaries");
            }

            let lower = (!lower.is_empty()).then(|| Version::parse(lower));
            let upper = (!upper.is_empty()).then(|| Version::parse(upper));
            if let (Some(lower), Some(upper)) = (&lower, &upper) {
                if upper < lower {
                    return Err("range defies version ordering");
                }
            }
            Ok((lower, upper))
        }
    }
}

/// A Maven version split into comparable segments.
///
/// Segments are separated by `.`, `-` and digit/letter transitions. Numeric
/// segments compare as numbers and known qualifiers rank `alpha < beta <
/// milestone < rc < snapshot < release < sp`. Unknown qualifiers sit just
/// below the release, and every qualifier sorts below a number.
#[derive(Debug, Clone)]
pub struct Version {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Numeric(u64),
    Qualifier(Qualifier),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl Version {
    pub fn parse(version: &str) -> Self {
        // a deployed timestamp orders like the literal SNAPSHOT it replaces
        let segments = match match_snapshot(version) {
            Some(base) => {
                let mut segments = parse_segments(base);
                segments.push(Segment::Qualifier(Qualifier::Snapshot));
                segments
            }
            None => parse_segments(version),
        };

        Version {
            original: version.to_string(),
            segments,
        }
    }
}

/// Splits on `.` and `-` and wherever digits meet letters, so `rc1` reads
/// as `rc` followed by `1`.
fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in version.chars() {
        if ch == '.' || ch == '-' {
            if !current.is_empty() {
                segments.push(classify(&current));
                current.clear();
            }
            continue;
        }

        let boundary = current
            .chars()
            .last()
            .is_some_and(|last| last.is_ascii_digit() != ch.is_ascii_digit());
        if boundary {
            segments.push(classify(&current));
            current.clear();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        segments.push(classify(&current));
    }

    segments
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }

    let lower = token.to_lowercase();
    let qualifier = match lower.as_str() {
        "alpha" | "a" => Qualifier::Alpha,
        "beta" | "b" => Qualifier::Beta,
        "milestone" | "m" => Qualifier::Milestone,
        "rc" | "cr" => Qualifier::Rc,
        "snapshot" => Qualifier::Snapshot,
        "ga" | "final" | "release" => Qualifier::Release,
        "sp" => Qualifier::Sp,
        _ => return Segment::Text(lower),
    };
    Segment::Qualifier(qualifier)
}

/// Rank of a segment against a missing one, which reads as `0` or a release.
fn compare_to_missing(segment: &Segment) -> Ordering {
    match segment {
        Segment::Numeric(n) => n.cmp(&0),
        Segment::Qualifier(q) => q.cmp(&Qualifier::Release),
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Numeric(_), _) => Ordering::Greater,
        (_, Segment::Numeric(_)) => Ordering::Less,
        (Segment::Qualifier(a), Segment::Qualifier(b)) => a.cmp(b),
        (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
        (Segment::Qualifier(q), Segment::Text(_)) => {
            if *q >= Qualifier::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Segment::Text(_), Segment::Qualifier(q)) => {
            if *q >= Qualifier::Release {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let ordering = match (self.segments.get(i), other.segments.get(i)) {
                (Some(a), Some(b)) => compare_segments(a, b),
                (Some(a), None) => compare_to_missing(a),
                (None, Some(b)) => compare_to_missing(b).reverse(),
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Sorts ascending and drops duplicates, keeping the original spelling.
    pub fn sort_ascending(versions: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut parsed: Vec<Version> = versions
            .iter()
            .filter(|v| seen.insert(v.as_str()))
            .map(|v| Version::parse(v))
            .collect();
        parsed.sort();
        parsed.into_iter().map(|v| v.original).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_literal_snapshot() {
        assert_eq!(match_snapshot("1.2.3-SNAPSHOT"), Some("1.2.3"));
        assert_eq!(match_snapshot("4-SNAPSHOT"), Some("4"));
    }

    #[test]
    fn matches_timestamped_snapshot() {
        assert_eq!(match_snapshot("1.2.3-20230101.120000-5"), Some("1.2.3"));
        assert_eq!(match_snapshot("2.0-20991231.235959-120"), Some("2.0"));
    }

    #[test]
    fn rejects_release_and_qualified_versions() {
        assert_eq!(match_snapshot("1.2.3"), None);
        assert_eq!(match_snapshot("1.2.3-RC1"), None);
        assert_eq!(match_snapshot("-SNAPSHOT"), None);
        assert_eq!(match_snapshot("1.2.3-SNAPSHOT-extra"), None);
        assert_eq!(match_snapshot("1.2.3-2023011.120000-5"), None);
    }

    #[test]
    fn release_prefix_keeps_inner_qualifiers() {
        assert_eq!(match_snapshot("1.0-beta-1-SNAPSHOT"), Some("1.0-beta-1"));
    }

    #[test]
    fn snapshot_detection_for_candidates() {
        assert!(is_snapshot("1.0-SNAPSHOT"));
        assert!(is_snapshot("1.0-20240102.030405-7"));
        assert!(!is_snapshot("1.0"));
    }

    #[test]
    fn pads_missing_components() {
        assert_eq!(pad_version("4"), "4.0.0");
        assert_eq!(pad_version("4.2"), "4.2.0");
        assert_eq!(pad_version("4.0"), "4.0.0");
        assert_eq!(pad_version("4.2.1"), "4.2.1");
        assert_eq!(pad_version("4.2.0"), "4.2.0");
    }

    #[test]
    fn padding_drops_qualifier_when_components_are_missing() {
        assert_eq!(pad_version("1.2-beta"), "1.2.0");
        assert_eq!(pad_version("1.2.3-beta"), "1.2.3-beta");
    }

    #[test]
    fn accepts_plain_versions_and_ranges() {
        assert!(validate_version_spec("1.2.3").is_ok());
        assert!(validate_version_spec("[1.0,2.0)").is_ok());
        assert!(validate_version_spec("[1.0]").is_ok());
        assert!(validate_version_spec("(,1.0],[1.2,)").is_ok());
    }

    #[test]
    fn rejects_malformed_ranges() {
        let malformed = [
            "[1.0",
            "(1.0)",
            "[1.0,1.0]",
            "[2.0,1.0]",
            "[1.0,2.0]junk",
            "[1.0,2.0],[1.5,3.0]",
        ];
        for spec in malformed {
            let err = validate_version_spec(spec).unwrap_err();
            assert!(matches!(err, ReleasesError::InvalidVersionSpec(_)), "{spec}");
        }
    }

    #[test]
    fn sorts_mixed_versions_ascending() {
        let sorted = VersionComparator::sort_ascending(vec![
            "1.10".to_string(),
            "1.2.3".to_string(),
            "1.9".to_string(),
            "1.2.3".to_string(),
        ]);
        assert_eq!(sorted, vec!["1.2.3", "1.9", "1.10"]);
    }

    #[test]
    fn qualifiers_sort_before_their_release() {
        let sorted = VersionComparator::sort_ascending(vec![
            "2.0".to_string(),
            "2.0-sp1".to_string(),
            "2.0-beta-1".to_string(),
            "2.0-RC1".to_string(),
            "2.0-alpha-2".to_string(),
            "2.0-SNAPSHOT".to_string(),
        ]);
        assert_eq!(
            sorted,
            vec!["2.0-alpha-2", "2.0-beta-1", "2.0-RC1", "2.0-SNAPSHOT", "2.0", "2.0-sp1"]
        );
    }

    #[test]
    fn timestamped_snapshot_orders_like_snapshot() {
        let timestamped = Version::parse("1.0-20240102.030405-7");
        assert!(timestamped < Version::parse("1.0"));
        assert!(timestamped > Version::parse("1.0-rc-1"));
    }

    #[test]
    fn trailing_zeros_and_release_qualifiers_are_equal() {
        assert_eq!(Version::parse("1.0"), Version::parse("1.0.0"));
        assert_eq!(Version::parse("1.0-final"), Version::parse("1"));
    }

    #[test]
    fn ordering_is_transitive_across_mixed_segments() {
        let (a, b, c) = (Version::parse("10"), Version::parse("9"), Version::parse("x1"));
        assert!(a > b);
        assert!(b > c);
        assert!(a > c);
    }

    #[test]
    fn unknown_qualifiers_sit_between_snapshot_and_release() {
        assert!(Version::parse("1.0-jre") < Version::parse("1.0"));
        assert!(Version::parse("1.0-jre") > Version::parse("1.0-SNAPSHOT"));
        assert!(Version::parse("1.0-jre") < Version::parse("1.0.1"));
    }
}
