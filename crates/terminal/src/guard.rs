//! Single-slot scan guard.
//!
//! Prevents more than one scan from being processed concurrently on a
//! terminal. Advisory only: the backend remains the source of truth
//! for duplicate-entry prevention; this protects the UI from rapid
//! re-scan races.

use std::sync::atomic::{AtomicBool, Ordering};

/// One-slot guard owned by the terminal screen.
///
/// Acquisition hands out a [`ScanPermit`] that releases the slot on
/// drop, so the guard is released on every exit path — success,
/// clarification, or error.
#[derive(Debug, Default)]
pub struct ScanGuard {
    held: AtomicBool,
}

impl ScanGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the slot.
    ///
    /// Returns `None` without side effects if a scan is already in
    /// progress; callers treat that as a silent no-op.
    pub fn try_acquire(&self) -> Option<ScanPermit<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanPermit { guard: self })
    }

    /// Whether a scan is currently in progress.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of exclusive scan access; releases the guard when dropped.
#[derive(Debug)]
pub struct ScanPermit<'a> {
    guard: &'a ScanGuard,
}

impl Drop for ScanPermit<'_> {
    fn drop(&mut self) {
        self.guard.held.store(false, Ordering::Release);
    }
}
