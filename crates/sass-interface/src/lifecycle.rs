//! Per-thread accounting of context allocations.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Every `sass_new_*` call records a creation and every `sass_free_*`
//! call on a non-null pointer records a destruction. Counts are kept per
//! thread so that callers compiling in parallel observe only their own
//! contexts.

use std::cell::Cell;

/// Context creations and destructions seen on the current thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleCounts {
    pub created: usize,
    pub destroyed: usize,
}

impl LifecycleCounts {
    /// Contexts created but not yet freed.
    pub fn live(&self) -> usize {
        self.created.saturating_sub(self.destroyed)
    }

    /// Counts accumulated since `earlier` was taken.
    pub fn since(&self, earlier: LifecycleCounts) -> LifecycleCounts {
        LifecycleCounts {
            created: self.created.saturating_sub(earlier.created),
            destroyed: self.destroyed.saturating_sub(earlier.destroyed),
        }
    }
}

thread_local! {
    static COUNTS: Cell<LifecycleCounts> = const {
        Cell::new(LifecycleCounts { created: 0, destroyed: 0 })
    };
}

/// Current counts for this thread.
pub fn snapshot() -> LifecycleCounts {
    COUNTS.with(Cell::get)
}

pub(crate) fn record_created() {
    COUNTS.with(|counts| {
        let mut current = counts.get();
        current.created += 1;
        counts.set(current);
    });
}

pub(crate) fn record_destroyed() {
    COUNTS.with(|counts| {
        let mut current = counts.get();
        current.destroyed += 1;
        counts.set(current);
    });
}
