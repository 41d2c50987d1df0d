//! Call-tree timing instrumentation.
//!
//! Regions ("spans") are opened and closed around pieces of code. Each one
//! becomes a node under whichever region was open at the time, so the
//! resulting outline mirrors the dynamic call structure: the same label
//! reached through two different callers shows up as two nodes. Every node
//! accumulates CPU and wall time across all of its invocations, plus
//! per-iteration min/max/variance once the caller marks iteration
//! boundaries with [`finished_iteration()`].
//!
//! Most code uses the macros ([`tic!`], [`toc!`], [`long_tic!`],
//! [`finished_iteration!`], [`print_timing!`], …) against the calling
//! thread's context. [`TimingContext`] is the same machinery as an explicit
//! value.

pub mod clock;
pub mod context;
pub mod error;
pub mod global;
mod macros;
pub mod outline;
pub mod registry;
pub mod report;
pub mod span;
pub mod stats;

pub use calltree_protocol::{Label, OutlineSummary, RegionId, ReportMode};
pub use clock::{Clock, ManualClock, Reading, ThreadClock};
pub use context::TimingContext;
pub use error::TimingError;
pub use global::{
    close_long_lived, current_label, find_child, finished_iteration, install_clock, is_at_root,
    open_long_lived, print, print_stats, report_string, reset, snapshot, write_report,
};
pub use outline::{NodeIdx, Outline, ROOT_LABEL};
pub use registry::{CallSite, lookup, region_id};
pub use span::Span;
