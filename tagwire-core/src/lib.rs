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

//! # Tagwire Core
//!
//! This is the core implementation of the tagwire format engine: a library
//! that converts between in-memory structured values and a byte-oriented
//! external representation, where the surface syntax of that representation
//! is supplied by a pluggable tag driver.
//!
//! ## Architecture
//!
//! The core library is organized into several key modules:
//!
//! - **`engine`**: the public entry points, `marshal` and `unmarshal`
//! - **`tag`**: the contract a tag driver implements, plus the whole-value
//!   `Marshal`/`Unmarshal` capability traits
//! - **`coder`**: per-kind encoder/decoder implementations and the `Reflect`
//!   trait that ties a type to them
//! - **`resolver`**: the process-wide coder and field-table caches, per-call
//!   state, and scratch pooling
//! - **`buffer`**: the byte buffers crossing the engine/driver boundary
//! - **`config`**: record framing and field separation configuration
//! - **`error`**: error handling and result types
//!
//! ## Key Concepts
//!
//! ### Division of labor
//!
//! The engine owns the walk: it enumerates a record's fields from metadata
//! generated by `#[derive(Record)]`, compiles an encoder and a decoder per
//! concrete type, caches them safely under concurrent first use, writes
//! record framing and field separators, and skips empty `omitempty` fields.
//! The driver owns only the per-field byte-level transform — rendering a
//! field's pre-serialized bytes into final syntax on encode, and carving the
//! next field's raw bytes out of the working buffer on decode.
//!
//! ### Coder compilation
//!
//! Coders are compiled once per `(driver type, value type)` pair and
//! published to process-wide caches. Self-referential types compile through
//! a forward-reference stub parked on a one-shot latch, so a record may
//! contain optional pointers to itself without deadlocking, even when two
//! threads trigger the first compilation at once.
//!
//! ### Annotations
//!
//! Fields carry per-driver annotations, `#[tag(driver_name = "value")]`.
//! The driver parses its own annotation values into a meta payload the
//! engine threads back into every per-field encode and decode call.
//!
//! ## Usage
//!
//! This crate is typically used through the higher-level `tagwire` crate,
//! which re-exports the public API together with the derive macro. The
//! example below sketches the shape of a driver; see the `tagwire` crate
//! documentation for a complete one.
//!
//! ```rust
//! use tagwire_core::buffer::{Reader, Writer};
//! use tagwire_core::config::Config;
//! use tagwire_core::engine::Engine;
//! use tagwire_core::error::Error;
//! use tagwire_core::tag::TagDriver;
//!
//! struct Verbatim;
//!
//! impl TagDriver for Verbatim {
//!     type Meta = ();
//!
//!     fn name(&self) -> &'static str {
//!         "verbatim"
//!     }
//!
//!     fn encode(
//!         &self,
//!         _field_name: &str,
//!         _meta: Option<&()>,
//!         data: &[u8],
//!         out: &mut Writer,
//!     ) -> Result<(), Error> {
//!         out.write_bytes(data);
//!         Ok(())
//!     }
//!
//!     fn decode(
//!         &self,
//!         _field_name: &str,
//!         _meta: Option<&()>,
//!         buf: &mut Reader,
//!         out: &mut Writer,
//!     ) -> Result<(), Error> {
//!         let taken = out.write_bytes(buf.bytes());
//!         buf.advance(taken);
//!         Ok(())
//!     }
//! }
//!
//! let engine = Engine::new(Verbatim, Config::default());
//! let bytes = engine.marshal(&42i64).unwrap();
//! assert_eq!(bytes, b"42");
//! ```

pub mod buffer;
pub mod coder;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod tag;
pub mod util;
