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

//! # Task Isolation
//!
//! Strategies for running a unit of work to completion without letting
//! the surrounding work-stealing scheduler hand the blocked caller an
//! unrelated pending task.
//!
//! The hazard: a worker thread that waits inside a work-stealing pool
//! (on a nested `parallel_for`, for instance) is normally re-used to
//! execute other queued tasks. If the wait happens while a lock is held
//! and a stolen task transitively takes the same lock, the thread
//! deadlocks against itself. [`DeferredCache`](crate::sync::DeferredCache)
//! runs its population closure through one of these strategies for
//! exactly that reason.
//!
//! Two strategies ship with the crate:
//!
//! - [`CallerThread`] invokes the work inline. Correct whenever the
//!   caller is not a pool worker: unit tests, command-line tools, the
//!   editor's main thread.
//! - [`IsolatedPool`] owns a private thread pool reserved for isolated
//!   work. Nested parallelism inside the work is serviced by that pool's
//!   threads, which can only ever steal the work's own sub-tasks.

#[cfg(feature = "parallel")]
use std::fmt;

/// Runs a unit of work synchronously, shielded from the ambient
/// scheduler.
///
/// The contract consumers rely on: `run(work)` returns only after `work`
/// has executed to completion, and at no point during the call does the
/// calling context dequeue unrelated tasks from an outer pool.
pub trait Isolation: Send + Sync {
    /// Executes `work` to completion.
    ///
    /// `work` is invoked exactly once. Panics inside it propagate to the
    /// caller.
    fn run(&self, work: &mut (dyn FnMut() + Send));
}

/// Trivial strategy: invoke the work directly on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallerThread;

impl Isolation for CallerThread {
    fn run(&self, work: &mut (dyn FnMut() + Send)) {
        work();
    }
}

/// Configuration for an [`IsolatedPool`].
#[cfg(feature = "parallel")]
#[derive(Debug, Clone)]
pub struct PoolDesc {
    /// Number of worker threads. `0` means one per available core.
    pub worker_threads: usize,
    /// Prefix for worker thread names, suffixed with the worker index.
    pub thread_name_prefix: String,
}

#[cfg(feature = "parallel")]
impl Default for PoolDesc {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            thread_name_prefix: "veldra-isolated".to_string(),
        }
    }
}

/// Error type for isolated-pool construction.
#[cfg(feature = "parallel")]
#[derive(Debug)]
pub enum TaskPoolError {
    /// The backing thread pool could not be built (thread spawn failure).
    Build(rayon::ThreadPoolBuildError),
}

#[cfg(feature = "parallel")]
impl fmt::Display for TaskPoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPoolError::Build(e) => write!(f, "Failed to build isolated task pool: {e}"),
        }
    }
}

#[cfg(feature = "parallel")]
impl std::error::Error for TaskPoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskPoolError::Build(e) => Some(e),
        }
    }
}

/// A private thread pool reserved for isolated work.
///
/// Because the pool is not shared with the application's ambient
/// scheduler, its workers can only steal sub-tasks spawned by the work
/// currently running inside it, never unrelated outer tasks. An
/// outer-pool worker that calls [`run`](Isolation::run) parks until the
/// work completes instead of stealing.
///
/// One instance is expected to be constructed by the application's
/// top-level lifecycle and handed by reference to the caches that need
/// it; dropping it joins the workers.
#[cfg(feature = "parallel")]
pub struct IsolatedPool {
    pool: rayon::ThreadPool,
}

#[cfg(feature = "parallel")]
impl IsolatedPool {
    /// Builds the pool described by `desc`.
    pub fn new(desc: PoolDesc) -> Result<Self, TaskPoolError> {
        let prefix = desc.thread_name_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(desc.worker_threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()
            .map_err(TaskPoolError::Build)?;

        log::debug!(
            "Isolated task pool '{}' initialized with {} threads.",
            desc.thread_name_prefix,
            pool.current_num_threads()
        );
        Ok(Self { pool })
    }

    /// Number of worker threads backing this pool.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(feature = "parallel")]
impl Isolation for IsolatedPool {
    fn run(&self, work: &mut (dyn FnMut() + Send)) {
        // `install` migrates the work onto a pool worker and parks the
        // caller until it finishes; nested parallel_for calls inside the
        // work are serviced by this pool, not the caller's.
        self.pool.install(|| work());
    }
}

#[cfg(feature = "parallel")]
impl fmt::Debug for IsolatedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolatedPool")
            .field("threads", &self.thread_count())
            .finish()
    }
}
