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

use std::sync::{Condvar, Mutex, PoisonError};

/// Compile-time flag: set `TAGWIRE_DEBUG=1` in the environment at build time
/// to print a trace line for every field visited by the record walks.
pub const ENABLE_DEBUG_OUTPUT: bool = option_env!("TAGWIRE_DEBUG").is_some();

/// A one-shot latch holding a value that is set exactly once.
///
/// Forward-reference coder stubs park on `wait` until the thread compiling
/// the real coder publishes it through `set`. After the first `set`, `wait`
/// returns immediately with a clone of the value.
pub struct Latch<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T: Clone> Latch<T> {
    pub fn new() -> Latch<T> {
        Latch {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Publishes the value and wakes every parked waiter. Later calls
    /// overwrite the slot; the publish guard relies on this to replace a
    /// poisoned placeholder if compilation is retried.
    pub fn set(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(value);
        self.ready.notify_all();
    }

    /// Blocks until a value has been published, then returns a clone of it.
    pub fn wait(&self) -> T {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(value) = slot.as_ref() {
                return value.clone();
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl<T: Clone> Default for Latch<T> {
    fn default() -> Self {
        Latch::new()
    }
}
