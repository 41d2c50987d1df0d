use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

use calltree_protocol::RegionId;

use crate::global;
use crate::registry::CallSite;

/// Scope-bound region on this thread's timing context.
///
/// Opens on construction and closes exactly once: either through
/// [`Span::stop`] or when dropped, whichever comes first. Dropping covers
/// early returns, `?` and unwinding.
///
/// Spans are tied to the thread whose tree they opened in and cannot be
/// sent elsewhere.
#[must_use = "a span closes as soon as it is dropped"]
#[derive(Debug)]
pub struct Span {
    id: RegionId,
    label: &'static str,
    open: Cell<bool>,
    _thread_bound: PhantomData<Rc<()>>,
}

impl Span {
    /// Open the region for `site`, resolving its identity on first use.
    pub fn enter(site: &CallSite) -> Self {
        Self::open(site.id(), site.label())
    }

    pub fn open(id: RegionId, label: &'static str) -> Self {
        global::open(id, label);
        Self {
            id,
            label,
            open: Cell::new(true),
            _thread_bound: PhantomData,
        }
    }

    /// Close the region now. Further calls do nothing.
    pub fn stop(&self) {
        if self.open.replace(false) {
            global::close(self.id, self.label);
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if !self.open.replace(false) {
            return;
        }
        if std::thread::panicking() {
            // Never panic twice; an inconsistent tree is left for reset().
            if let Err(e) = global::try_close(self.id, self.label) {
                log::error!("timing: span `{}` not closed during unwind: {e}", self.label);
            }
        } else {
            global::close(self.id, self.label);
        }
    }
}
