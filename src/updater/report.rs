use crate::updater::planner::EntryKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tracks the changes made while updating one descriptor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    /// `<parent>` version update
    pub parent_updates: BTreeMap<String, (String, String)>,
    /// Updates in `<dependencyManagement>`, imported BOMs included
    pub managed_updates: BTreeMap<String, (String, String)>,
    /// Updates in `<dependencies>`
    pub dependency_updates: BTreeMap<String, (String, String)>,
    /// Snapshots for which no release was found
    pub unresolved: Vec<String>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_update(&mut self, kind: EntryKind, name: String, old: String, new: String) {
        let section = match kind {
            EntryKind::Parent => &mut self.parent_updates,
            EntryKind::ImportedManagement | EntryKind::ManagedDependency => {
                &mut self.managed_updates
            }
            EntryKind::Dependency => &mut self.dependency_updates,
        };
        section.insert(name, (old, new));
    }

    pub fn add_unresolved(&mut self, name: String) {
        self.unresolved.push(name);
    }

    /// Check if the report is empty (no updates)
    pub fn is_empty(&self) -> bool {
        self.parent_updates.is_empty()
            && self.managed_updates.is_empty()
            && self.dependency_updates.is_empty()
    }

    pub fn total_updates(&self) -> usize {
        self.parent_updates.len() + self.managed_updates.len() + self.dependency_updates.len()
    }
}
