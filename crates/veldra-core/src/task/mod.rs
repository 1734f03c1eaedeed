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

//! Task parallelism.
//!
//! [`parallel_for`] partitions an index range across worker threads, and
//! the [`isolate`] module supplies the strategies that keep blocking
//! callers from being drafted into unrelated scheduler work. With the
//! `parallel` feature disabled everything here degrades to synchronous
//! execution on the calling thread.

pub mod isolate;
pub mod parallel_for;

pub use isolate::{CallerThread, Isolation};
pub use parallel_for::parallel_for;

#[cfg(feature = "parallel")]
pub use isolate::{IsolatedPool, PoolDesc, TaskPoolError};
