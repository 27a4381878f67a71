// Snapshot-to-release updating.
//
// - selector: picks the release to adopt from the known versions
// - filter: include/exclude artifact patterns
// - planner: walks parent, managed and direct dependencies and rewrites them
// - report: what changed in one descriptor
pub mod filter;
pub mod planner;
pub mod report;
pub mod selector;

pub use planner::{DependencyUpdatePlanner, UseReleasesConfig};
pub use report::UpdateReport;
pub use selector::MatchPolicy;
