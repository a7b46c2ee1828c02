// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Scratch-state pooling.
//!
//! Every `marshal`/`unmarshal` call borrows its buffers from a process-wide
//! pool and returns them on the way out — on success, on error, and on
//! unwind, via a drop guard. The pool is split into segments indexed by a
//! per-thread counter so concurrent callers usually touch different locks.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Number of pool segments; enough that steady-state parallelism rarely
/// contends on one lock.
const NUM_SEGMENTS: usize = 16;

static THREAD_COUNTER: AtomicU64 = AtomicU64::new(0);

thread_local! {
    /// The segment this thread borrows from. A plain incrementing counter
    /// spreads threads evenly.
    static SEGMENT_INDEX: Cell<usize> = Cell::new(
        (THREAD_COUNTER.fetch_add(1, Ordering::Relaxed) as usize) % NUM_SEGMENTS
    );
}

struct Segment<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Default> Segment<T> {
    fn take(&self) -> T {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    fn put(&self, item: T) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }
}

/// A segmented free list of reusable scratch objects.
pub(crate) struct Pool<T> {
    segments: [Segment<T>; NUM_SEGMENTS],
}

impl<T: Default> Pool<T> {
    pub(crate) fn new() -> Pool<T> {
        Pool {
            segments: std::array::from_fn(|_| Segment {
                items: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Borrows a scratch object, runs `handler`, and returns the object to
    /// its segment afterwards — including when `handler` unwinds.
    pub(crate) fn borrow_mut<R>(&self, handler: impl FnOnce(&mut T) -> R) -> R {
        let segment = &self.segments[SEGMENT_INDEX.with(|idx| idx.get())];
        let mut guard = Returned {
            segment,
            item: Some(segment.take()),
        };
        match guard.item.as_mut() {
            Some(item) => handler(item),
            // The slot is only emptied by Drop.
            None => unreachable!(),
        }
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Pool::new()
    }
}

struct Returned<'a, T: Default> {
    segment: &'a Segment<T>,
    item: Option<T>,
}

impl<T: Default> Drop for Returned<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.segment.put(item);
        }
    }
}
