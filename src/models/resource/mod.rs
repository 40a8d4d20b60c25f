//! Resource model for timeline rows.
//!
//! Resources are supplied by the host and never mutated here. Rows are derived
//! from resources and groups on every pass and are never stored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A schedulable resource (one row of the timeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Disabled resources render but accept no new or dropped events.
    #[serde(default)]
    pub disabled: bool,
}

impl Resource {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group_id: None,
            disabled: false,
        }
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Grouping key for resources; purely presentational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub collapsible: bool,
}

impl Group {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            collapsible: true,
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Group(Group),
    Resource(Resource),
}

impl Row {
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Row::Resource(resource) => Some(resource),
            Row::Group(_) => None,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Row::Group(group) => &group.id,
            Row::Resource(resource) => &resource.id,
        }
    }
}

/// Flatten resources under their groups.
///
/// Resources without a (known) group come first in input order. Each group
/// then contributes its header row followed by its members, unless the group
/// is collapsible and listed in `collapsed`.
pub fn build_rows(
    resources: &[Resource],
    groups: &[Group],
    collapsed: &HashSet<String>,
) -> Vec<Row> {
    let known: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    let mut rows = Vec::with_capacity(resources.len() + groups.len());

    rows.extend(
        resources
            .iter()
            .filter(|r| r.group_id.as_deref().map_or(true, |g| !known.contains(g)))
            .cloned()
            .map(Row::Resource),
    );

    for group in groups {
        rows.push(Row::Group(group.clone()));
        if group.collapsible && collapsed.contains(&group.id) {
            continue;
        }
        rows.extend(
            resources
                .iter()
                .filter(|r| r.group_id.as_deref() == Some(group.id.as_str()))
                .cloned()
                .map(Row::Resource),
        );
    }

    rows
}
