use crate::maven::version::{is_snapshot, pad_version};

/// How a release prefix is matched against the known versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The known versions must contain the prefix verbatim.
    #[default]
    Exact,
    /// Last known version starting with the (optionally padded) prefix.
    Range { pad: bool },
}

/// Outcome of a selection, including the prefix actually used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub prefix: String,
    pub padded: bool,
    pub version: Option<String>,
}

pub struct VersionSelector {
    policy: MatchPolicy,
}

impl VersionSelector {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn select(&self, release_prefix: &str, known: &[String]) -> Selection {
        match self.policy {
            MatchPolicy::Exact => Selection {
                prefix: release_prefix.to_string(),
                padded: false,
                version: known
                    .iter()
                    .find(|v| v.as_str() == release_prefix)
                    .cloned(),
            },
            MatchPolicy::Range { pad } => {
                let prefix = if pad {
                    pad_version(release_prefix)
                } else {
                    release_prefix.to_string()
                };

                // plain string prefix; later entries override earlier ones
                let version = known
                    .iter()
                    .filter(|v| !is_snapshot(v))
                    .filter(|v| v.starts_with(prefix.as_str()))
                    .last()
                    .cloned();

                Selection {
                    padded: prefix != release_prefix,
                    prefix,
                    version,
                }
            }
        }
    }
}
