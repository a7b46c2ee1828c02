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

//! # Tagwire Derive Macros
//!
//! This crate provides the `#[derive(Record)]` procedural macro for the
//! tagwire format engine. Rust has no runtime reflection, so the macro
//! generates the static per-field metadata — names, visibility, annotations,
//! accessors, embedded-record plumbing — that the engine's introspector
//! walks at runtime.
//!
//! ## Field attributes
//!
//! - `#[tag(driver_name = "value")]` attaches an annotation for the driver
//!   whose [`name`] matches the key. A field may carry one annotation per
//!   driver. The value's grammar belongs to the driver; by convention a
//!   trailing `,omitempty` asks for empty-value omission.
//! - `#[embed]` flattens a field whose type also derives `Record` into the
//!   enclosing record's frame. One level of `Option<…>`/`Box<…>` indirection
//!   is resolved automatically.
//!
//! Non-`pub` fields without `#[embed]` are invisible to the engine.
//!
//! [`name`]: https://docs.rs/tagwire-core/latest/tagwire_core/tag/trait.TagDriver.html#tymethod.name
//!
//! ## Example
//!
//! ```rust, ignore
//! use tagwire_derive::Record;
//!
//! #[derive(Record, Debug, PartialEq, Default)]
//! struct Point {
//!     #[tag(csv = "x")]
//!     pub x: i64,
//!     #[tag(csv = "y,omitempty")]
//!     pub y: i64,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derive macro generating the engine-facing metadata for a record type.
///
/// Implements `Reflect`, `ReflectDefault` and `Record` for the annotated
/// struct. Only non-generic structs with named fields (or no fields) are
/// supported.
#[proc_macro_derive(Record, attributes(tag, embed))]
pub fn proc_macro_derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record(&input)
}
