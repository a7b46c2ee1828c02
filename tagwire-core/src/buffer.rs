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

//! Byte buffers crossing the engine/driver boundary.
//!
//! [`Writer`] accumulates encoded output; tag drivers append the final
//! syntactic form of each field to it. [`Reader`] is the working buffer of a
//! decode call: it owns a private copy of the caller's input and exposes
//! cursor-based consumption, so a driver may freely advance it without side
//! effects on caller memory.

/// Growable output buffer.
#[derive(Default)]
pub struct Writer {
    bf: Vec<u8>,
}

impl Writer {
    /// Returns a copy of the accumulated bytes.
    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    /// Borrows the accumulated bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    /// Clears the buffer, keeping its capacity for reuse.
    pub fn reset(&mut self) {
        self.bf.clear();
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }
}

/// Cursor-based working buffer for decoding.
///
/// The engine strips configured framing and separators through the same
/// cursor the driver advances, so consumption is always observable to both
/// sides. Consumed bytes are never handed out again.
#[derive(Default)]
pub struct Reader {
    data: Vec<u8>,
    cursor: usize,
}

impl Reader {
    /// Replaces the contents with a private copy of `src` and rewinds.
    pub fn load(&mut self, src: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(src);
        self.cursor = 0;
    }

    /// Borrows the unconsumed bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// Consumes up to `n` bytes.
    pub fn advance(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.data.len());
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes().starts_with(prefix)
    }

    /// Consumes `prefix` if the unconsumed bytes start with it.
    pub fn strip_prefix(&mut self, prefix: &[u8]) -> bool {
        if self.starts_with(prefix) {
            self.advance(prefix.len());
            true
        } else {
            false
        }
    }

    /// Consumes leading space bytes.
    pub fn trim_leading_spaces(&mut self) {
        while self.bytes().first() == Some(&b' ') {
            self.advance(1);
        }
    }
}
