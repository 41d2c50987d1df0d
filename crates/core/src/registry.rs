//! Process-wide label → [`RegionId`] registry and the per-call-site cache in
//! front of it.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, OnceLock, PoisonError};

use calltree_protocol::RegionId;

#[derive(Debug, Default)]
struct Registry {
    ids: HashMap<String, RegionId>,
    next: usize,
}

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::default()));

/// Identity for `label`, allocating the next sequential id on first sight.
///
/// The same label always maps to the same id for the rest of the process.
pub fn region_id(label: &str) -> RegionId {
    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(&id) = registry.ids.get(label) {
        return id;
    }
    let id = RegionId(registry.next);
    registry.next += 1;
    registry.ids.insert(label.to_owned(), id);
    log::debug!("registered region `{label}` as {id}");
    id
}

/// Identity for `label` if it has been registered, without registering it.
pub fn lookup(label: &str) -> Option<RegionId> {
    REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .ids
        .get(label)
        .copied()
}

/// One instrumented call site: a static label plus its identity, resolved
/// through the registry the first time the site executes.
///
/// The macros declare one `static CallSite` per expansion, so the string
/// lookup happens once per site rather than once per invocation.
#[derive(Debug)]
pub struct CallSite {
    label: &'static str,
    id: OnceLock<RegionId>,
}

impl CallSite {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            id: OnceLock::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> RegionId {
        *self.id.get_or_init(|| region_id(self.label))
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether this site has executed at least once.
    pub fn is_resolved(&self) -> bool {
        self.id.get().is_some()
    }
}
