// src/rotation/guard.rs
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits a single rotation at a time; others are turned away, not queued
#[derive(Debug, Default)]
pub struct RotationGuard {
    busy: AtomicBool,
}

impl RotationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the lifetime of one rotation; releases the guard on drop
#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a RotationGuard,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
