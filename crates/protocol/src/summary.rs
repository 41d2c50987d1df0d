use crate::label::Label;
use crate::types::RegionId;

/// Point-in-time copy of one outline node and its subtree.
///
/// Children are listed in first-seen order, which is also the order reports
/// print them in. All times are in microseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSummary {
    pub id: RegionId,
    pub label: Label,
    /// Cumulative CPU time across all closes.
    pub cpu_total_us: u64,
    /// Cumulative wall-clock time across all closes.
    pub wall_total_us: u64,
    /// Completed open/close cycles.
    pub closes: u64,
    /// Completed iterations (samples used for min/max/variance).
    pub iterations: u64,
    pub min_iteration_us: u64,
    pub max_iteration_us: u64,
    pub mean_us: f64,
    pub std_dev_us: f64,
    /// Own CPU total once closed at least once, otherwise the sum of the
    /// children's times.
    pub time_us: u64,
    pub children: Vec<OutlineSummary>,
}

impl OutlineSummary {
    /// Direct child with the given label.
    pub fn child(&self, label: &str) -> Option<&OutlineSummary> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Descend through a chain of child labels starting below this node.
    pub fn path(&self, labels: &[&str]) -> Option<&OutlineSummary> {
        labels
            .iter()
            .try_fold(self, |node, label| node.child(label))
    }

    /// Sum of the direct children's times.
    pub fn children_time_us(&self) -> u64 {
        self.children.iter().map(|c| c.time_us).sum()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineSummary::node_count)
            .sum::<usize>()
    }

    /// Number of samples `mean_us` is taken over: marked iterations, or
    /// closes while no iteration boundary has been seen.
    pub fn sample_count(&self) -> u64 {
        if self.iterations > 0 {
            self.iterations
        } else {
            self.closes
        }
    }

    /// This node's time as a percentage of `parent_time_us`, if positive.
    pub fn percent_of(&self, parent_time_us: u64) -> Option<f64> {
        (parent_time_us > 0).then(|| 100.0 * self.time_us as f64 / parent_time_us as f64)
    }
}
