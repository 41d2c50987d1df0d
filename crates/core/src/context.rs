use std::io::Write;

use calltree_protocol::{OutlineSummary, RegionId, ReportMode};

use crate::clock::{Clock, ThreadClock};
use crate::error::TimingError;
use crate::outline::{NodeIdx, Outline};
use crate::registry;
use crate::report;

/// One timing tree plus the active path into it.
///
/// `current` always names a live node of `outline`: the innermost region
/// that is open, or the root when nothing is. Opens attach below it and
/// closes move it back to the parent, which is what makes nesting automatic.
///
/// A context is driven by a single thread of control; the crate-level
/// functions and macros use a thread-local one.
pub struct TimingContext {
    outline: Outline,
    current: NodeIdx,
    clock: Box<dyn Clock>,
}

impl TimingContext {
    pub fn new(clock: impl Clock + 'static) -> Self {
        let outline = Outline::new();
        let current = outline.root();
        Self {
            outline,
            current,
            clock: Box::new(clock),
        }
    }

    /// Context measuring the calling thread's CPU time.
    pub fn with_thread_clock() -> Result<Self, TimingError> {
        Ok(Self::new(ThreadClock::try_new()?))
    }

    /// Swap the time source. Timers already running keep readings from the
    /// old clock, so callers reset before switching mid-run.
    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.clock = Box::new(clock);
    }

    /// Open region `id` below the current node and make it current.
    pub fn open(&mut self, id: RegionId, label: &str) -> Result<NodeIdx, TimingError> {
        let node = self.outline.child(self.current, id, label);
        let at = self.clock.now()?;
        self.outline.start(node, at);
        self.current = node;
        Ok(node)
    }

    /// Close region `id`, which must be the current node, and make its
    /// parent current.
    pub fn close(&mut self, id: RegionId, label: &str) -> Result<(), TimingError> {
        let at = self.clock.now()?;
        let Some(parent) = self.outline.parent(self.current) else {
            return Err(TimingError::NothingOpen(label.to_owned()));
        };
        if self.outline.id(self.current) != id {
            return Err(TimingError::UnbalancedClose {
                expected: self.outline.label(self.current).to_string(),
                expected_id: self.outline.id(self.current),
                found: label.to_owned(),
                found_id: id,
            });
        }
        self.outline.stop(self.current, at)?;
        self.current = parent;
        Ok(())
    }

    /// Mark an iteration boundary across the whole tree.
    pub fn finished_iteration(&mut self) {
        self.outline.finished_iteration();
    }

    /// Discard the tree and start over from a fresh root.
    pub fn reset(&mut self) {
        log::debug!("timing: reset, discarding {} nodes", self.outline.len());
        self.outline = Outline::new();
        self.current = self.outline.root();
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn current(&self) -> NodeIdx {
        self.current
    }

    pub fn current_label(&self) -> &str {
        self.outline.label(self.current)
    }

    pub fn is_at_root(&self) -> bool {
        self.current == self.outline.root()
    }

    /// Snapshot of the whole tree.
    pub fn snapshot(&self) -> OutlineSummary {
        self.outline.summary(self.outline.root())
    }

    /// Snapshot of the child of the current node named `label`, if that
    /// region has been entered from here.
    pub fn find_child(&self, label: &str) -> Option<OutlineSummary> {
        let id = registry::lookup(label)?;
        let idx = self.outline.find_child(self.current, id)?;
        Some(self.outline.summary(idx))
    }

    pub fn write_report<W: Write>(&self, out: &mut W, mode: ReportMode) -> std::io::Result<()> {
        report::write_outline(out, &self.snapshot(), mode)
    }

    pub fn report_string(&self, mode: ReportMode) -> String {
        report::render_outline(&self.snapshot(), mode)
    }
}

impl std::fmt::Debug for TimingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingContext")
            .field("nodes", &self.outline.len())
            .field("current", &self.current_label())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;

    fn ctx() -> (TimingContext, ManualClock) {
        let clock = ManualClock::new();
        (TimingContext::new(clock.clone()), clock)
    }

    #[test]
    fn open_close_returns_to_root() {
        let (mut ctx, clock) = ctx();
        let a = registry::region_id("context_test_a");
        let b = registry::region_id("context_test_b");

        assert!(ctx.open(a, "context_test_a").is_ok());
        assert_eq!(ctx.current_label(), "context_test_a");
        assert!(ctx.open(b, "context_test_b").is_ok());
        clock.advance(Duration::from_micros(40));
        assert!(ctx.close(b, "context_test_b").is_ok());
        assert_eq!(ctx.current_label(), "context_test_a");
        assert!(ctx.close(a, "context_test_a").is_ok());
        assert!(ctx.is_at_root());
    }

    #[test]
    fn close_of_wrong_region_is_rejected() {
        let (mut ctx, _clock) = ctx();
        let a = registry::region_id("context_test_outer");
        let b = registry::region_id("context_test_inner");
        assert!(ctx.open(a, "context_test_outer").is_ok());
        let err = ctx.close(b, "context_test_inner");
        assert!(matches!(err, Err(TimingError::UnbalancedClose { .. })));
        // The tracker did not move.
        assert_eq!(ctx.current_label(), "context_test_outer");
    }

    #[test]
    fn close_at_root_is_rejected() {
        let (mut ctx, _clock) = ctx();
        let a = registry::region_id("context_test_stray");
        assert!(matches!(
            ctx.close(a, "context_test_stray"),
            Err(TimingError::NothingOpen(_))
        ));
        assert!(ctx.is_at_root());
    }

    #[test]
    fn reopening_reuses_node_and_restarts_timer() {
        let (mut ctx, clock) = ctx();
        let a = registry::region_id("context_test_reopen");
        for step in [10, 20] {
            assert!(ctx.open(a, "context_test_reopen").is_ok());
            clock.advance(Duration::from_micros(step));
            assert!(ctx.close(a, "context_test_reopen").is_ok());
            // Idle time between passes is not attributed.
            clock.advance(Duration::from_micros(1_000));
        }
        let snap = ctx.snapshot();
        assert_eq!(snap.children.len(), 1);
        let node = &snap.children[0];
        assert_eq!(node.closes, 2);
        assert_eq!(node.cpu_total_us, 30);
    }

    #[test]
    fn find_child_is_relative_to_current() {
        let (mut ctx, _clock) = ctx();
        let a = registry::region_id("context_test_parent");
        let b = registry::region_id("context_test_child");
        assert!(ctx.open(a, "context_test_parent").is_ok());
        assert!(ctx.open(b, "context_test_child").is_ok());
        assert!(ctx.close(b, "context_test_child").is_ok());

        assert!(ctx.find_child("context_test_child").is_some());
        assert!(ctx.close(a, "context_test_parent").is_ok());
        assert!(ctx.find_child("context_test_child").is_none());
        assert!(ctx.find_child("context_test_parent").is_some());
        assert!(ctx.find_child("context_test_unregistered_label").is_none());
    }

    #[test]
    fn reset_leaves_only_root() {
        let (mut ctx, clock) = ctx();
        let a = registry::region_id("context_test_reset");
        assert!(ctx.open(a, "context_test_reset").is_ok());
        clock.advance(Duration::from_micros(5));
        assert!(ctx.close(a, "context_test_reset").is_ok());
        ctx.reset();
        let snap = ctx.snapshot();
        assert_eq!(snap.node_count(), 1);
        assert_eq!(snap.time_us, 0);
        assert!(ctx.is_at_root());
    }
}
