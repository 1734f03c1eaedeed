// Copyright 2026 veldra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Deferred Cache
//!
//! A double-checked-locking primitive that guarantees a cache-population
//! closure runs at most once per dirty period, no matter how many threads
//! ask for the cache concurrently.
//!
//! The cached **value** is not owned by the primitive. It lives in the
//! caller's storage; [`DeferredCache`] only orders access to it:
//!
//! 1. While the cache is valid, any thread may read the value without
//!    further synchronization.
//! 2. While it is dirty, exactly one thread runs the population closure
//!    (the single writer); every other concurrent caller blocks until the
//!    new value has been published.
//!
//! ## Isolation
//!
//! Population is allowed to fan out into [`parallel_for`](crate::task::parallel_for)
//! sub-work. If the calling thread is itself a worker in an ambient
//! work-stealing pool, waiting on that sub-work must not make it pick up
//! unrelated pool tasks while the cache lock is held: a stolen task that
//! transitively calls [`ensure`](DeferredCache::ensure) on the same cache
//! would deadlock. The cache therefore runs the closure through an
//! injected [`Isolation`] strategy. The default, [`CallerThread`], runs
//! it inline and is correct whenever no such pool exists; renderer-side
//! caches inject an [`IsolatedPool`](crate::task::IsolatedPool).

use crate::task::{CallerThread, Isolation};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Read-many / compute-once synchronization for a lazily evaluated value
/// stored outside the primitive.
///
/// A `DeferredCache` starts out dirty. [`ensure`](Self::ensure) brings it
/// up to date, running the supplied closure at most once per dirty
/// period; [`tag_dirty`](Self::tag_dirty) starts the next period.
///
/// # Example
///
/// ```rust
/// use veldra_core::sync::DeferredCache;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let bounds = AtomicU64::new(0);
/// let cache = DeferredCache::new();
///
/// cache.ensure(|| bounds.store(42, Ordering::Relaxed));
/// assert!(cache.is_cached());
///
/// // Already valid: the closure is not invoked again.
/// cache.ensure(|| unreachable!());
///
/// cache.tag_dirty();
/// cache.ensure(|| bounds.store(43, Ordering::Relaxed));
/// assert_eq!(bounds.load(Ordering::Relaxed), 43);
/// ```
pub struct DeferredCache<I: Isolation = CallerThread> {
    /// Whether the externally stored value is current. Readable on the
    /// fast path without touching the mutex.
    valid: AtomicBool,
    /// Guards only the populate-and-publish sequence.
    mutex: Mutex<()>,
    isolation: I,
}

impl DeferredCache<CallerThread> {
    /// Creates a dirty cache that runs population inline on the calling
    /// thread.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            valid: AtomicBool::new(false),
            mutex: Mutex::new(()),
            isolation: CallerThread,
        }
    }
}

impl<I: Isolation> DeferredCache<I> {
    /// Creates a dirty cache that runs population through the given
    /// [`Isolation`] strategy.
    pub fn with_isolation(isolation: I) -> Self {
        Self {
            valid: AtomicBool::new(false),
            mutex: Mutex::new(()),
            isolation,
        }
    }

    /// Returns `true` if the externally stored value is current.
    ///
    /// This is a relaxed load: a hint, not a synchronization point. It
    /// does **not** order reads of the cached value; only a returned
    /// [`ensure`](Self::ensure) call does.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.valid.load(Ordering::Relaxed)
    }

    /// Returns `true` if the value must be recomputed before use.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.is_cached()
    }

    /// Marks the cached value as stale.
    ///
    /// May be called from any thread at any time and never blocks. If a
    /// population is in flight elsewhere, the *next* `ensure` call after
    /// it completes recomputes again. Calling this repeatedly without an
    /// intervening `ensure` is equivalent to calling it once.
    pub fn tag_dirty(&self) {
        self.valid.store(false, Ordering::Relaxed);
    }

    /// Makes sure the externally stored value is up to date, running
    /// `populate` only if no other thread has done so since the last
    /// [`tag_dirty`](Self::tag_dirty).
    ///
    /// When this returns, every write performed by the winning
    /// `populate` (on this or any other thread) is visible to the
    /// caller. Concurrent callers during a population block on the
    /// internal lock and return once the value is published.
    ///
    /// All call sites of one cache must supply the same effective
    /// population logic; the primitive does not distinguish between
    /// closures, so correctness requires that they all compute the same
    /// target value.
    ///
    /// # Panics
    ///
    /// A panic inside `populate` propagates to the calling thread. The
    /// lock is released and the cache stays dirty, so a later `ensure`
    /// from any thread retries the population.
    ///
    /// # Deadlocks
    ///
    /// `populate` must not call `ensure` on the *same* cache instance;
    /// the internal lock is not reentrant. Calling `ensure` on a
    /// different instance is fine.
    pub fn ensure<F>(&self, populate: F)
    where
        F: FnOnce() + Send,
    {
        // Fast path: the acquire load pairs with the release store below,
        // making the winning populate's writes visible before we return.
        if self.valid.load(Ordering::Acquire) {
            return;
        }

        // Recover the guard if a previous populate panicked. The validity
        // flag, not lock poisoning, tracks whether the value is current.
        let _guard = match self.mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // A competing caller may have finished populating between the
        // fast-path check and our lock acquisition. The mutex already
        // orders this load against their release store.
        if self.valid.load(Ordering::Relaxed) {
            return;
        }

        log::trace!("Deferred cache dirty, running population.");

        let mut populate = Some(populate);
        self.isolation.run(&mut || {
            if let Some(populate) = populate.take() {
                populate();
            }
        });

        self.valid.store(true, Ordering::Release);
    }
}

impl Default for DeferredCache<CallerThread> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Isolation> fmt::Debug for DeferredCache<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCache")
            .field("valid", &self.is_cached())
            .finish_non_exhaustive()
    }
}
