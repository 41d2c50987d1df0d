use std::fmt;

/// Stable integer identity of a region label.
///
/// Assigned once per distinct label for the lifetime of the process and used
/// as the lookup key on every open/close instead of hashing the label string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a timing outline is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// CPU and wall totals, close counts, children time and iteration
    /// extrema for every node.
    #[default]
    Plain,
    /// Mean and standard deviation per node, plus each node's share of its
    /// parent's time.
    Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_id_display() {
        assert_eq!(RegionId(7).to_string(), "#7");
    }

    #[test]
    fn plain_is_default_mode() {
        assert_eq!(ReportMode::default(), ReportMode::Plain);
    }
}
