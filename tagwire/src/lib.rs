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

//! # Tagwire
//!
//! Tagwire converts between in-memory structured values and a byte-oriented
//! external representation whose surface syntax — JSON-like, CSV-like,
//! key=value, anything byte-oriented — is supplied by a pluggable **tag
//! driver**. The engine owns the hard parts: enumerating record fields from
//! derived metadata, compiling an encoder and a decoder per concrete type,
//! caching them safely under concurrent first use, supporting
//! self-referential types, record framing, field separators and empty-value
//! omission. A driver only transforms individual field bytes.
//!
//! ## Quick start
//!
//! Derive [`Record`] for your structs, implement [`TagDriver`] for your
//! syntax (or use an existing driver), and bind both into an [`Engine`]:
//!
//! ```rust
//! use tagwire::{Config, Engine, Error, Reader, TagDriver, Writer};
//! use tagwire_derive::Record;
//!
//! // A minimal comma/brace syntax: values are written verbatim and read
//! // up to the next delimiter.
//! struct Commas;
//!
//! impl TagDriver for Commas {
//!     type Meta = ();
//!
//!     fn name(&self) -> &'static str {
//!         "commas"
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
//!         let bytes = buf.bytes();
//!         let end = bytes
//!             .iter()
//!             .position(|b| *b == b',' || *b == b'}')
//!             .unwrap_or(bytes.len());
//!         out.write_bytes(&bytes[..end]);
//!         buf.advance(end);
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Record, Debug, PartialEq, Default)]
//! struct Point {
//!     #[tag(commas = "x")]
//!     pub x: i64,
//!     #[tag(commas = "y")]
//!     pub y: i64,
//! }
//!
//! let engine = Engine::new(
//!     Commas,
//!     Config {
//!         struct_opener: b"{".to_vec(),
//!         struct_closer: b"}".to_vec(),
//!         unwrap_when_decoding: true,
//!         value_separator: b",".to_vec(),
//!         remove_separator_when_decoding: true,
//!     },
//! );
//!
//! let point = Point { x: 1, y: 2 };
//! let bytes = engine.marshal(&point).unwrap();
//! assert_eq!(bytes, b"{1,2}");
//!
//! let mut decoded = Point::default();
//! engine.unmarshal(&bytes, &mut decoded).unwrap();
//! assert_eq!(decoded, point);
//! ```
//!
//! ## Annotations
//!
//! Fields carry one annotation per driver, keyed by the driver's name:
//! `#[tag(commas = "x,omitempty")]`. The driver's
//! [`parse`](TagDriver::parse) turns the value into its own meta payload
//! and decides whether empty values are omitted; [`skip`](TagDriver::skip)
//! can hide a field from the engine entirely.
//!
//! ## Whole-value overrides
//!
//! Types that implement [`Marshal`]/[`Unmarshal`] bypass the kind-based
//! coders end to end, subject to the driver's per-value
//! [`is_marshaller`](TagDriver::is_marshaller)/
//! [`is_unmarshaler`](TagDriver::is_unmarshaler) hooks.

pub use tagwire_core::buffer::{Reader, Writer};
pub use tagwire_core::coder::{Reflect, ReflectDefault};
pub use tagwire_core::config::Config;
pub use tagwire_core::engine::Engine;
pub use tagwire_core::error::Error;
pub use tagwire_core::tag::{Marshal, TagDriver, Unmarshal};
pub use tagwire_core::{bail, ensure};

/// Derive macro generating record metadata; see the crate docs of
/// `tagwire-derive` for the attribute grammar.
pub use tagwire_derive::Record;
