//! Variable → descriptor registry.

use crate::{OutputDescriptor, ResultShape};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping from script variable name (case-sensitive, as written) to where its
/// value will be found. A later `put` for an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputRegistry {
    bindings: BTreeMap<String, OutputDescriptor>,
}

/// Disjoint views over a registry, one per descriptor kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryPartition {
    /// Names bound to the console report.
    pub console: Vec<String>,
    /// Name → side file holding a single number.
    pub file_scalars: BTreeMap<String, String>,
    /// Name → delimited table.
    pub file_series: BTreeMap<String, String>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the descriptor it replaced.
    pub fn put(&mut self, name: impl Into<String>, descriptor: OutputDescriptor) -> Option<OutputDescriptor> {
        let name = name.into();
        let previous = self.bindings.insert(name.clone(), descriptor.clone());
        if let Some(prev) = previous.as_ref().filter(|prev| **prev != descriptor) {
            tracing::debug!(name = %name, previous = ?prev, current = ?descriptor, "rebound");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&OutputDescriptor> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputDescriptor)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn partition(&self) -> RegistryPartition {
        let mut partition = RegistryPartition::default();
        for (name, descriptor) in &self.bindings {
            match descriptor {
                OutputDescriptor::ConsoleScalar => partition.console.push(name.clone()),
                OutputDescriptor::FileScalar(file) => {
                    partition.file_scalars.insert(name.clone(), file.clone());
                }
                OutputDescriptor::FileSeries(file) => {
                    partition.file_series.insert(name.clone(), file.clone());
                }
            }
        }
        partition
    }

    /// Expected result shape per variable, before resolution.
    pub fn shapes(&self) -> BTreeMap<String, ResultShape> {
        self.bindings.iter().map(|(k, v)| (k.clone(), v.expected_shape())).collect()
    }
}

impl RegistryPartition {
    /// Series variables grouped by table file, so each table is read once.
    pub fn series_by_file(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, file) in &self.file_series {
            grouped.entry(file.as_str()).or_default().push(name.as_str());
        }
        grouped
    }
}
