//! The timing outline: an arena-backed tree with one node per
//! (parent, region) pair.
//!
//! Nodes own nothing but indices. The arena owns every node, a node's
//! `children` map holds indices into it, and `parent` is a plain back index
//! used only to move the active path upward on close.

use std::collections::HashMap;

use calltree_protocol::{Label, OutlineSummary, RegionId};

use crate::clock::Reading;
use crate::error::TimingError;
use crate::registry;
use crate::stats::IterationStats;

/// Label of the root node every outline starts with.
pub const ROOT_LABEL: &str = "Total";

/// Index of a node inside its [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

#[derive(Debug)]
struct Node {
    id: RegionId,
    label: Label,
    parent: Option<NodeIdx>,
    children: HashMap<RegionId, NodeIdx>,
    /// Position among the parent's children, in first-seen order.
    order: usize,
    last_child_order: usize,
    stats: IterationStats,
    started: Option<Reading>,
}

impl Node {
    fn new(id: RegionId, label: Label, parent: Option<NodeIdx>, order: usize) -> Self {
        Self {
            id,
            label,
            parent,
            children: HashMap::new(),
            order,
            last_child_order: 0,
            stats: IterationStats::default(),
            started: None,
        }
    }
}

#[derive(Debug)]
pub struct Outline {
    nodes: Vec<Node>,
}

impl Outline {
    pub fn new() -> Self {
        let root = Node::new(registry::region_id(ROOT_LABEL), ROOT_LABEL.into(), None, 0);
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeIdx {
        NodeIdx(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn id(&self, idx: NodeIdx) -> RegionId {
        self.nodes[idx.0].id
    }

    #[inline]
    pub fn label(&self, idx: NodeIdx) -> &Label {
        &self.nodes[idx.0].label
    }

    #[inline]
    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.nodes[idx.0].parent
    }

    pub fn stats(&self, idx: NodeIdx) -> &IterationStats {
        &self.nodes[idx.0].stats
    }

    /// Child of `parent` for region `id`, created on first use.
    pub fn child(&mut self, parent: NodeIdx, id: RegionId, label: &str) -> NodeIdx {
        if let Some(&existing) = self.nodes[parent.0].children.get(&id) {
            return existing;
        }
        let idx = NodeIdx(self.nodes.len());
        let order = {
            let p = &mut self.nodes[parent.0];
            p.last_child_order += 1;
            p.children.insert(id, idx);
            p.last_child_order
        };
        self.nodes.push(Node::new(id, label.into(), Some(parent), order));
        log::debug!(
            "outline: new node `{label}` under `{}`",
            self.nodes[parent.0].label
        );
        idx
    }

    /// Existing child of `parent` for region `id`.
    pub fn find_child(&self, parent: NodeIdx, id: RegionId) -> Option<NodeIdx> {
        self.nodes[parent.0].children.get(&id).copied()
    }

    /// Children of `idx` in first-seen order.
    pub fn children(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut children: Vec<NodeIdx> = self.nodes[idx.0].children.values().copied().collect();
        children.sort_by_key(|c| self.nodes[c.0].order);
        children
    }

    /// Start (or restart) the node's timer.
    pub fn start(&mut self, idx: NodeIdx, at: Reading) {
        self.nodes[idx.0].started = Some(at);
    }

    /// Stop the node's timer and fold the elapsed time into its statistics.
    pub fn stop(&mut self, idx: NodeIdx, at: Reading) -> Result<(), TimingError> {
        let node = &mut self.nodes[idx.0];
        let Some(start) = node.started.take() else {
            return Err(TimingError::NotRunning(node.label.to_string()));
        };
        let (cpu_us, wall_us) = at.micros_since(start);
        node.stats.record(cpu_us, wall_us);
        Ok(())
    }

    /// Mark an iteration boundary on every node.
    pub fn finished_iteration(&mut self) {
        let sampled = self
            .nodes
            .iter_mut()
            .map(|n| n.stats.finish_iteration())
            .filter(|&sampled| sampled)
            .count();
        log::trace!("outline: iteration finished, {sampled} nodes sampled");
    }

    /// Own CPU total once the node has been closed, otherwise the sum of its
    /// children's times.
    pub fn time_us(&self, idx: NodeIdx) -> u64 {
        let node = &self.nodes[idx.0];
        if node.stats.closes() > 0 {
            node.stats.cpu_total_us()
        } else {
            node.children.values().map(|&c| self.time_us(c)).sum()
        }
    }

    /// Snapshot of the subtree rooted at `idx`.
    pub fn summary(&self, idx: NodeIdx) -> OutlineSummary {
        let node = &self.nodes[idx.0];
        let stats = &node.stats;
        OutlineSummary {
            id: node.id,
            label: node.label.clone(),
            cpu_total_us: stats.cpu_total_us(),
            wall_total_us: stats.wall_total_us(),
            closes: stats.closes(),
            iterations: stats.iterations(),
            min_iteration_us: stats.min_us(),
            max_iteration_us: stats.max_us(),
            mean_us: stats.mean_us(),
            std_dev_us: stats.std_dev_us(),
            time_us: self.time_us(idx),
            children: self
                .children(idx)
                .into_iter()
                .map(|c| self.summary(c))
                .collect(),
        }
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}
