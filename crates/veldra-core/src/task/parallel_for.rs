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

//! Chunked parallel iteration over an index range.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Invokes `op` once per chunk of `range`, covering every index exactly
/// once with contiguous, non-overlapping chunks of at least `grain`
/// indices each.
///
/// With the `parallel` feature the chunks are distributed across the
/// current rayon context (the thread pool the calling thread belongs
/// to, or the global one). A call made from inside
/// [`IsolatedPool::run`](crate::task::IsolatedPool) is therefore
/// serviced entirely by the isolated pool. Without the feature the whole
/// range runs on the calling thread as a single chunk.
///
/// There is no ordering guarantee between chunk invocations, and `op`
/// must be safe to invoke concurrently with itself on disjoint ranges.
/// A range shorter than `2 * grain` always runs as a single chunk, and
/// an empty range invokes `op` zero times. A `grain` of `0` is treated
/// as `1`.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use veldra_core::task::parallel_for;
///
/// let sum = AtomicU64::new(0);
/// parallel_for(0..10_000, 512, |chunk| {
///     let partial: u64 = chunk.map(|i| i as u64).sum();
///     sum.fetch_add(partial, Ordering::Relaxed);
/// });
/// assert_eq!(sum.load(Ordering::Relaxed), 49_995_000);
/// ```
pub fn parallel_for<F>(range: Range<usize>, grain: usize, op: F)
where
    F: Fn(Range<usize>) + Send + Sync,
{
    if range.is_empty() {
        return;
    }
    run_chunked(range, grain.max(1), &op);
}

#[cfg(feature = "parallel")]
fn run_chunked<F>(range: Range<usize>, grain: usize, op: &F)
where
    F: Fn(Range<usize>) + Send + Sync,
{
    let len = range.len();
    if len <= grain {
        op(range);
        return;
    }

    // Balanced partition: chunk_count * grain <= len, so every chunk
    // holds at least `grain` indices even after the remainder is spread
    // over the leading chunks.
    let chunk_count = len / grain;
    let base = len / chunk_count;
    let remainder = len % chunk_count;

    (0..chunk_count).into_par_iter().for_each(|index| {
        let begin = range.start + index * base + index.min(remainder);
        let size = base + usize::from(index < remainder);
        op(begin..begin + size);
    });
}

#[cfg(not(feature = "parallel"))]
fn run_chunked<F>(range: Range<usize>, _grain: usize, op: &F)
where
    F: Fn(Range<usize>) + Send + Sync,
{
    op(range);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn collect_chunks(range: Range<usize>, grain: usize) -> Vec<Range<usize>> {
        let chunks = Mutex::new(Vec::new());
        parallel_for(range, grain, |chunk| {
            chunks.lock().unwrap().push(chunk);
        });
        let mut chunks = chunks.into_inner().unwrap();
        chunks.sort_by_key(|chunk| chunk.start);
        chunks
    }

    #[test]
    fn empty_range_invokes_nothing() {
        let calls = AtomicUsize::new(0);
        parallel_for(5..5, 4, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn short_range_is_a_single_chunk() {
        let chunks = collect_chunks(0..7, 8);
        assert_eq!(chunks, vec![0..7]);
    }

    #[test]
    fn chunks_are_contiguous_and_cover_the_range() {
        for (start, end, grain) in [(0, 100, 10), (3, 250, 7), (0, 10, 3), (90, 91, 1)] {
            let chunks = collect_chunks(start..end, grain);

            let mut expected_start = start;
            for chunk in &chunks {
                assert_eq!(chunk.start, expected_start, "gap or overlap in chunks");
                expected_start = chunk.end;
            }
            assert_eq!(expected_start, end, "range not fully covered");
        }
    }

    #[test]
    fn every_chunk_meets_the_grain_size() {
        for (len, grain) in [(100, 10), (10, 3), (1_000, 64), (17, 5)] {
            let chunks = collect_chunks(0..len, grain);
            for chunk in &chunks {
                assert!(
                    chunk.len() >= grain,
                    "chunk {chunk:?} smaller than grain {grain}"
                );
            }
        }
    }

    #[test]
    fn zero_grain_is_treated_as_one() {
        let chunks = collect_chunks(0..4, 0);
        let covered: usize = chunks.iter().map(|chunk| chunk.len()).sum();
        assert_eq!(covered, 4);
    }

    #[test]
    fn each_index_visited_exactly_once() {
        const LEN: usize = 10_000;
        let visits: Vec<AtomicUsize> = (0..LEN).map(|_| AtomicUsize::new(0)).collect();

        parallel_for(0..LEN, 128, |chunk| {
            for index in chunk {
                visits[index].fetch_add(1, Ordering::Relaxed);
            }
        });

        assert!(visits.iter().all(|v| v.load(Ordering::Relaxed) == 1));
    }
}
