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

//! The contract between the engine and a tag driver.
//!
//! A tag driver owns the surface syntax of one external format: it parses the
//! per-field annotations keyed by its [`name`](TagDriver::name), renders the
//! engine's pre-serialized field bytes into their final form, and locates raw
//! field bytes inside the working buffer while decoding. Everything else —
//! walking records, compiling and caching coders, framing, separators,
//! empty-value omission — is the engine's job.

use std::any::Any;

use crate::buffer::{Reader, Writer};
use crate::error::Error;

/// Whole-value encode override.
///
/// A type implementing `Marshal` replaces the engine's kind-based encoder
/// end to end, provided the driver accepts the value through
/// [`TagDriver::is_marshaller`]. The produced bytes still pass through the
/// driver's [`encode`](TagDriver::encode) for syntactic framing.
pub trait Marshal {
    fn marshal(&self) -> Result<Vec<u8>, Error>;
}

/// Whole-value decode override, the counterpart of [`Marshal`].
pub trait Unmarshal {
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// A pluggable format syntax.
///
/// Minimal drivers implement [`name`](TagDriver::name),
/// [`encode`](TagDriver::encode) and [`decode`](TagDriver::decode); the
/// remaining methods have no-op defaults.
///
/// Drivers of the same Rust type share the engine's process-wide coder and
/// field-table caches, so [`skip`](TagDriver::skip) and
/// [`parse`](TagDriver::parse) must be pure functions of the annotation
/// value.
pub trait TagDriver: Send + Sync + 'static {
    /// Driver-defined payload parsed out of a field annotation.
    type Meta: Default + Send + Sync + 'static;

    /// The annotation key looked up on record fields; also the prefix of the
    /// engine's error messages.
    fn name(&self) -> &'static str;

    /// When true, the annotated field is omitted entirely, in both
    /// directions.
    fn skip(&self, tag_value: &str) -> bool {
        let _ = tag_value;
        false
    }

    /// Parses an annotation value into `meta`, returning whether the field
    /// should be skipped on encode when its value is empty.
    fn parse(&self, tag_value: &str, meta: &mut Self::Meta) -> Result<bool, Error> {
        let _ = (tag_value, meta);
        Ok(false)
    }

    /// Appends the final syntactic form of one field to `out`. `data` holds
    /// the engine's pre-serialized field bytes (decimal digits, raw string
    /// bytes, ...).
    fn encode(
        &self,
        field_name: &str,
        meta: Option<&Self::Meta>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error>;

    /// Locates the next field's raw bytes inside the working buffer.
    ///
    /// The driver writes the field's value bytes to `out` and advances `buf`
    /// past everything it consumed, including any terminator its syntax
    /// uses. Configured separators are stripped by the engine, not the
    /// driver. Writing nothing to `out` marks the field absent; the engine
    /// leaves it at its current value and moves on.
    ///
    /// A field whose payload the driver cannot delimit — a nested framed
    /// record — is announced by writing a presence marker to `out` while
    /// leaving `buf` untouched; the engine's compiled decoder for that field
    /// then consumes the record from the working buffer itself.
    fn decode(
        &self,
        field_name: &str,
        meta: Option<&Self::Meta>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error>;

    /// Accepts or declines the whole-value encode override for one value.
    /// Declining makes the field contribute no bytes.
    fn is_marshaller<'a>(&self, v: &'a dyn Marshal) -> Option<&'a dyn Marshal> {
        let _ = v;
        None
    }

    /// Accepts or declines the whole-value decode override for one value.
    /// Declining leaves the target at its current value.
    fn is_unmarshaler<'a>(&self, v: &'a mut dyn Unmarshal) -> Option<&'a mut dyn Unmarshal> {
        let _ = v;
        None
    }
}

/// Object-safe view of a [`TagDriver`] with the meta type erased, so compiled
/// coders stay driver-generic and a single engine type serves every driver.
pub(crate) trait ErasedTag: Send + Sync {
    fn tag_name(&self) -> &'static str;
    fn skip_value(&self, tag_value: &str) -> bool;
    fn parse_value(&self, tag_value: &str) -> Result<(bool, Box<dyn Any + Send + Sync>), Error>;
    fn encode_field(
        &self,
        field_name: &str,
        meta: Option<&(dyn Any + Send + Sync)>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error>;
    fn decode_field(
        &self,
        field_name: &str,
        meta: Option<&(dyn Any + Send + Sync)>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error>;
    fn marshaller<'a>(&self, v: &'a dyn Marshal) -> Option<&'a dyn Marshal>;
    fn unmarshaler<'a>(&self, v: &'a mut dyn Unmarshal) -> Option<&'a mut dyn Unmarshal>;
}

impl<D: TagDriver> ErasedTag for D {
    fn tag_name(&self) -> &'static str {
        self.name()
    }

    fn skip_value(&self, tag_value: &str) -> bool {
        self.skip(tag_value)
    }

    fn parse_value(&self, tag_value: &str) -> Result<(bool, Box<dyn Any + Send + Sync>), Error> {
        let mut meta = D::Meta::default();
        let omit_empty = self.parse(tag_value, &mut meta)?;
        Ok((omit_empty, Box::new(meta)))
    }

    fn encode_field(
        &self,
        field_name: &str,
        meta: Option<&(dyn Any + Send + Sync)>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error> {
        self.encode(field_name, downcast_meta::<D>(meta)?, data, out)
    }

    fn decode_field(
        &self,
        field_name: &str,
        meta: Option<&(dyn Any + Send + Sync)>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error> {
        self.decode(field_name, downcast_meta::<D>(meta)?, buf, out)
    }

    fn marshaller<'a>(&self, v: &'a dyn Marshal) -> Option<&'a dyn Marshal> {
        self.is_marshaller(v)
    }

    fn unmarshaler<'a>(&self, v: &'a mut dyn Unmarshal) -> Option<&'a mut dyn Unmarshal> {
        self.is_unmarshaler(v)
    }
}

fn downcast_meta<D: TagDriver>(
    meta: Option<&(dyn Any + Send + Sync)>,
) -> Result<Option<&D::Meta>, Error> {
    match meta {
        None => Ok(None),
        Some(meta) => match meta.downcast_ref::<D::Meta>() {
            Some(meta) => Ok(Some(meta)),
            None => Err(Error::type_error(
                "annotation meta does not belong to this driver",
            )),
        },
    }
}
