//! Debug-build bookkeeping of live GPU program handles.
//!
//! GL objects belong to the context current on one thread, so the registry
//! is per thread. Release builds compile the tracking out; the queries then
//! report nothing.

#[cfg(debug_assertions)]
use std::cell::{Cell, RefCell};
#[cfg(debug_assertions)]
use std::collections::BTreeSet;

use crate::renderer::device::ProgramHandle;

#[cfg(debug_assertions)]
thread_local! {
    static LIVE_PROGRAMS: RefCell<BTreeSet<ProgramHandle>> = RefCell::new(BTreeSet::new());
    static LEAKS_REPORTED: Cell<usize> = const { Cell::new(0) };
}

#[cfg(debug_assertions)]
pub(crate) fn track(handle: ProgramHandle) {
    LIVE_PROGRAMS.with(|live| {
        live.borrow_mut().insert(handle);
    });
}

#[cfg(debug_assertions)]
pub(crate) fn untrack(handle: ProgramHandle) {
    LIVE_PROGRAMS.with(|live| {
        live.borrow_mut().remove(&handle);
    });
}

#[cfg(debug_assertions)]
pub(crate) fn record_leak() {
    LEAKS_REPORTED.with(|count| count.set(count.get() + 1));
}

/// Programs created on this thread that have not been disposed yet.
#[cfg(debug_assertions)]
pub fn live_programs() -> Vec<ProgramHandle> {
    LIVE_PROGRAMS.with(|live| live.borrow().iter().copied().collect())
}

/// Number of leak warnings emitted on this thread.
#[cfg(debug_assertions)]
pub fn leaks_reported() -> usize {
    LEAKS_REPORTED.with(Cell::get)
}

#[cfg(not(debug_assertions))]
pub(crate) fn track(_handle: ProgramHandle) {}

#[cfg(not(debug_assertions))]
pub(crate) fn untrack(_handle: ProgramHandle) {}

#[cfg(not(debug_assertions))]
pub(crate) fn record_leak() {}

#[cfg(not(debug_assertions))]
pub fn live_programs() -> Vec<ProgramHandle> {
    Vec::new()
}

#[cfg(not(debug_assertions))]
pub fn leaks_reported() -> usize {
    0
}

/// Warns about every program still alive and returns how many there were.
///
/// Meant to run after the host's unload step, while the context is still
/// current.
pub fn audit_live_programs() -> usize {
    let live = live_programs();
    for handle in &live {
        log::warn!("GPU resource leak: {} is still alive at shutdown", handle);
    }
    if live.is_empty() {
        log::debug!("resource audit: no live programs");
    }
    live.len()
}
