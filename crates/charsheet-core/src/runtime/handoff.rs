// crates/charsheet-core/src/runtime/handoff.rs
// ============================================================================
// Module: Single-Slot Handoff
// Description: Last-write-wins slot shared by one background writer and one reader.
// Purpose: Publish recomputed collections without ever blocking the reader.
// Dependencies: std::sync
// ============================================================================

//! ## Overview
//! A background task publishes whole values into a [`HandoffSlot`]; each
//! publish replaces the previous value and bumps a generation counter. The
//! reader polls with `try_lock` and keeps its cached value when the writer
//! holds the lock, so a read is at most one cycle stale.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::TryLockError;

// ============================================================================
// SECTION: Slot
// ============================================================================

/// Shared slot state.
#[derive(Debug)]
struct Published<T> {
    /// Number of publishes so far.
    generation: u64,
    /// Latest published value.
    value: Option<Arc<T>>,
}

/// Slot that creates the writer and reader halves.
#[derive(Debug)]
pub struct HandoffSlot<T> {
    /// Shared state.
    shared: Arc<Mutex<Published<T>>>,
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandoffSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Published {
                generation: 0,
                value: None,
            })),
        }
    }

    /// Returns a writer half.
    #[must_use]
    pub fn publisher(&self) -> SlotPublisher<T> {
        SlotPublisher {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Returns a reader half with an empty cache.
    #[must_use]
    pub fn reader(&self) -> SlotReader<T> {
        SlotReader {
            shared: Arc::clone(&self.shared),
            generation: 0,
            cached: None,
        }
    }
}

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Writer half; may live on a background thread.
#[derive(Debug)]
pub struct SlotPublisher<T> {
    /// Shared state.
    shared: Arc<Mutex<Published<T>>>,
}

impl<T> SlotPublisher<T> {
    /// Replaces the slot value and returns the new generation.
    pub fn publish(&self, value: T) -> u64 {
        let mut slot = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.value = Some(Arc::new(value));
        slot.generation
    }
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Reader half; never blocks.
#[derive(Debug)]
pub struct SlotReader<T> {
    /// Shared state.
    shared: Arc<Mutex<Published<T>>>,
    /// Generation of the cached value.
    generation: u64,
    /// Last value observed.
    cached: Option<Arc<T>>,
}

impl<T> SlotReader<T> {
    /// Refreshes the cache when the slot is free and returns the cached value.
    pub fn poll(&mut self) -> Option<&T> {
        let slot = match self.shared.try_lock() {
            Ok(slot) => Some(slot),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        };
        if let Some(slot) = slot
            && slot.generation != self.generation
        {
            self.generation = slot.generation;
            self.cached.clone_from(&slot.value);
        }
        self.cached.as_deref()
    }

    /// Returns the generation of the cached value; zero before the first read.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
