//! Thread-local default context and the function API behind the macros.
//!
//! Each thread lazily gets its own [`TimingContext`] measuring that thread's
//! CPU time, so spans opened on different threads build independent trees.
//! Misuse that the explicit context reports as an error (an unbalanced
//! close, a failing clock) is fatal here: the outline is logged and the
//! thread panics.

use std::cell::RefCell;
use std::io::Write;

use calltree_protocol::{OutlineSummary, RegionId, ReportMode};

use crate::clock::Clock;
use crate::context::TimingContext;
use crate::error::TimingError;
use crate::registry::CallSite;

thread_local! {
    static CONTEXT: RefCell<Option<TimingContext>> = const { RefCell::new(None) };
}

/// Run `f` against this thread's context, creating it on first use.
///
/// The context stays mutably borrowed while `f` runs, so `f` must not call
/// back into this module.
pub(crate) fn with_context<R>(f: impl FnOnce(&mut TimingContext) -> R) -> R {
    CONTEXT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let ctx = slot.get_or_insert_with(|| {
            TimingContext::with_thread_clock().unwrap_or_else(|e| fatal(&e, None))
        });
        f(ctx)
    })
}

/// Replace this thread's time source and start a fresh tree.
pub fn install_clock(clock: impl Clock + 'static) {
    CONTEXT.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(ctx) => {
                ctx.set_clock(clock);
                ctx.reset();
            }
            None => {
                *slot = Some(TimingContext::new(clock));
            }
        }
    });
}

pub fn open(id: RegionId, label: &str) {
    with_context(|ctx| {
        if let Err(e) = ctx.open(id, label) {
            fatal(&e, Some(&*ctx));
        }
    });
}

pub fn close(id: RegionId, label: &str) {
    with_context(|ctx| {
        if let Err(e) = ctx.close(id, label) {
            fatal(&e, Some(&*ctx));
        }
    });
}

pub(crate) fn try_close(id: RegionId, label: &str) -> Result<(), TimingError> {
    with_context(|ctx| ctx.close(id, label))
}

/// Open a region that is not tied to a lexical scope. The caller must
/// match it with [`close_long_lived`].
pub fn open_long_lived(site: &CallSite) {
    open(site.id(), site.label());
}

pub fn close_long_lived(site: &CallSite) {
    close(site.id(), site.label());
}

pub fn finished_iteration() {
    with_context(TimingContext::finished_iteration);
}

pub fn reset() {
    with_context(TimingContext::reset);
}

pub fn snapshot() -> OutlineSummary {
    with_context(|ctx| ctx.snapshot())
}

pub fn find_child(label: &str) -> Option<OutlineSummary> {
    with_context(|ctx| ctx.find_child(label))
}

pub fn current_label() -> String {
    with_context(|ctx| ctx.current_label().to_owned())
}

pub fn is_at_root() -> bool {
    with_context(|ctx| ctx.is_at_root())
}

pub fn write_report<W: Write>(out: &mut W, mode: ReportMode) -> std::io::Result<()> {
    with_context(|ctx| ctx.write_report(out, mode))
}

/// This thread's outline rendered as text.
pub fn report_string(mode: ReportMode) -> String {
    with_context(|ctx| ctx.report_string(mode))
}

/// Print this thread's outline to standard output.
pub fn print() {
    print_mode(ReportMode::Plain);
}

/// Print this thread's outline with mean, standard deviation and
/// percentage of parent.
pub fn print_stats() {
    print_mode(ReportMode::Statistics);
}

fn print_mode(mode: ReportMode) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_report(&mut out, mode) {
        log::warn!("timing: failed to print report: {e}");
    }
}

/// Abort the current thread over a timing misuse, after logging the outline
/// as it stood.
#[allow(clippy::panic)]
fn fatal(err: &TimingError, ctx: Option<&TimingContext>) -> ! {
    log::error!("timing: {err}");
    if let Some(ctx) = ctx {
        log::error!(
            "timing: outline at failure:\n{}",
            ctx.report_string(ReportMode::Plain)
        );
    }
    panic!("timing: {err}");
}
