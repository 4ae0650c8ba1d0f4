//! Blocker graph for work items
//!
//! Directed graph over task and feature refs, built from blocker lists.
//! Detects cycles on insert and answers ready/blocked queries. Uses
//! petgraph for graph operations.

use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

use super::project::ProjectSnapshot;
use super::reference::WorkRef;
use super::status::Status;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Adding blocker would create a cycle: {0} -> {1}")]
    CycleDetected(WorkRef, WorkRef),

    #[error("Work item not found: {0}")]
    ItemNotFound(WorkRef),

    #[error("Item cannot block on itself: {0}")]
    SelfBlocker(WorkRef),
}

/// A blocker graph over a project's work items
///
/// Edge direction is blocker -> blocked item, so a topological order lists
/// prerequisites first.
#[derive(Debug, Default)]
pub struct BlockerGraph {
    graph: DiGraph<WorkRef, ()>,
    node_map: HashMap<WorkRef, NodeIndex>,
    statuses: HashMap<WorkRef, Status>,
}

impl BlockerGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from a snapshot
    ///
    /// Dangling blockers are skipped here; reporting them is the
    /// validator's job. Cycles and self-references still error, since no
    /// meaningful order exists for such data.
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Result<Self, GraphError> {
        let mut graph = Self::new();

        for task in &snapshot.tasks {
            graph.add_item(WorkRef::Task(task.id), task.status);
            for feature in &task.features {
                graph.add_item(task.feature_ref(feature), feature.status);
            }
        }

        for task in &snapshot.tasks {
            let task_ref = WorkRef::Task(task.id);
            for blocker in &task.blockers {
                if graph.contains(blocker) {
                    graph.add_blocker(&task_ref, blocker)?;
                }
            }
            for feature in &task.features {
                let feature_ref = task.feature_ref(feature);
                for blocker in &feature.blockers {
                    if graph.contains(blocker) {
                        graph.add_blocker(&feature_ref, blocker)?;
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Adds a work item with its status
    pub fn add_item(&mut self, item: WorkRef, status: Status) {
        self.statuses.insert(item.clone(), status);
        if !self.node_map.contains_key(&item) {
            let idx = self.graph.add_node(item.clone());
            self.node_map.insert(item, idx);
        }
    }

    /// Adds a blocker edge: `item` is blocked on `blocker`
    pub fn add_blocker(&mut self, item: &WorkRef, blocker: &WorkRef) -> Result<(), GraphError> {
        if item == blocker {
            return Err(GraphError::SelfBlocker(item.clone()));
        }

        let item_idx = self
            .node_map
            .get(item)
            .ok_or_else(|| GraphError::ItemNotFound(item.clone()))?;

        let blocker_idx = self
            .node_map
            .get(blocker)
            .ok_or_else(|| GraphError::ItemNotFound(blocker.clone()))?;

        self.graph.add_edge(*blocker_idx, *item_idx, ());

        if is_cyclic_directed(&self.graph) {
            if let Some(edge) = self.graph.find_edge(*blocker_idx, *item_idx) {
                self.graph.remove_edge(edge);
            }
            return Err(GraphError::CycleDetected(item.clone(), blocker.clone()));
        }

        Ok(())
    }

    /// Returns items that are ready: incomplete, with every blocker complete
    pub fn ready(&self) -> Vec<WorkRef> {
        let mut ready: Vec<_> = self
            .node_map
            .keys()
            .filter(|item| {
                if self.status_of(item).is_complete() {
                    return false;
                }
                self.blockers(item)
                    .iter()
                    .all(|b| self.status_of(b).is_complete())
            })
            .cloned()
            .collect();
        ready.sort();
        ready
    }

    /// Returns items with at least one incomplete blocker
    pub fn blocked(&self) -> Vec<WorkRef> {
        let mut blocked: Vec<_> = self
            .node_map
            .keys()
            .filter(|item| {
                if self.status_of(item).is_complete() {
                    return false;
                }
                self.blockers(item)
                    .iter()
                    .any(|b| !self.status_of(b).is_complete())
            })
            .cloned()
            .collect();
        blocked.sort();
        blocked
    }

    /// Returns the direct blockers of an item
    pub fn blockers(&self, item: &WorkRef) -> Vec<WorkRef> {
        let idx = match self.node_map.get(item) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .filter_map(|i| self.graph.node_weight(i).cloned())
            .collect()
    }

    /// Returns the items directly blocked on an item
    pub fn dependents(&self, item: &WorkRef) -> Vec<WorkRef> {
        let idx = match self.node_map.get(item) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter_map(|i| self.graph.node_weight(i).cloned())
            .collect()
    }

    /// Returns all items in prerequisite-first order
    pub fn topological_order(&self) -> Result<Vec<WorkRef>, GraphError> {
        toposort(&self.graph, None)
            .map(|order| {
                order
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect()
            })
            .map_err(|cycle| {
                let item = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or(WorkRef::Task(super::reference::TaskId(0)));
                GraphError::CycleDetected(item.clone(), item)
            })
    }

    /// Returns true if the graph contains the item
    pub fn contains(&self, item: &WorkRef) -> bool {
        self.node_map.contains_key(item)
    }

    /// Returns the number of items in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    fn status_of(&self, item: &WorkRef) -> Status {
        self.statuses.get(item).copied().unwrap_or_default()
    }
}
