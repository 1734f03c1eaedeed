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

//! # Veldra Core
//!
//! Foundational synchronization and task-parallelism primitives shared by
//! every Veldra subsystem: the deferred-cache lock used by evaluation
//! caches, the spinlock guarding short critical sections, and the
//! range-partitioning / task-isolation layer the cache composes with.

#![warn(missing_docs)]

pub mod sync;
pub mod task;

pub use sync::DeferredCache;
pub use task::{parallel_for, CallerThread, Isolation};

#[cfg(feature = "parallel")]
pub use task::{IsolatedPool, PoolDesc, TaskPoolError};
