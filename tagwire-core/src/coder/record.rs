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

//! The record kind.
//!
//! `#[derive(Record)]` generates a static [`RawField`] table describing a
//! struct's fields; the introspector in [`crate::resolver::fields`] combines
//! it with the driver's annotation handling into a cached field table, and
//! the walks below drive encoding and decoding against that table: framing,
//! separators, empty-value omission, embedded flattening, and delegation to
//! the driver for each leaf field.

use std::sync::Arc;

use crate::coder::{CoderPair, Reflect};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::fields::{cached_fields, FieldAccess, FieldTable};
use crate::resolver::DriverHandle;
use crate::util::ENABLE_DEBUG_OUTPUT;

/// A type whose fields the engine can enumerate. Implemented by
/// `#[derive(Record)]`.
pub trait Record: Reflect {
    fn record_name() -> &'static str
    where
        Self: Sized;

    fn record_fields() -> &'static [RawField]
    where
        Self: Sized;
}

/// Borrows one field out of its record, erased.
pub type GetFn = fn(&dyn Reflect) -> Result<&dyn Reflect, Error>;

/// Mutable counterpart of [`GetFn`].
pub type GetMutFn = fn(&mut dyn Reflect) -> Result<&mut dyn Reflect, Error>;

/// Compiles the coders of one field's declared type.
pub type CodersFn = fn(&DriverHandle) -> Result<CoderPair, Error>;

/// Builds the cached field table of an embedded record type.
pub type FieldTableFn = fn(&DriverHandle) -> Result<Arc<FieldTable>, Error>;

/// Resolves one level of pointer indirection on an embedded field,
/// returning `None` when the pointer is unset.
pub type EmbedGetFn = fn(&dyn Reflect) -> Result<Option<&dyn Reflect>, Error>;

/// Mutable counterpart of [`EmbedGetFn`].
pub type EmbedGetMutFn = fn(&mut dyn Reflect) -> Result<Option<&mut dyn Reflect>, Error>;

/// Synthesizes a zero instance of an embedded record.
pub type SynthFn = fn() -> Box<dyn Reflect>;

/// One field of a record, as declared. Produced by the derive; consumed by
/// the introspector.
pub struct RawField {
    /// Positional index within the record.
    pub index: usize,
    /// Declared field name, handed verbatim to the tag driver.
    pub name: &'static str,
    /// Declared type, for error messages.
    pub type_name: &'static str,
    /// Whether the field is `pub`. Non-exported, non-embedded fields are
    /// invisible to the engine.
    pub exported: bool,
    /// `(driver name, annotation value)` pairs from `#[tag(...)]`.
    pub annotations: &'static [(&'static str, &'static str)],
    pub access: RawAccess,
}

pub enum RawAccess {
    Leaf {
        get: GetFn,
        get_mut: GetMutFn,
        coders: CodersFn,
    },
    Embedded(&'static EmbedShape),
}

/// How to reach through an embedded/flattened field.
pub struct EmbedShape {
    pub fields: FieldTableFn,
    pub get: EmbedGetFn,
    pub get_mut: EmbedGetMutFn,
    pub synthesize: SynthFn,
    /// Embedded record type name, for the nil-pointer diagnostic.
    pub target: &'static str,
}

/// Builds the cached encoder for a derived record type.
pub fn record_encoder<S: Record>(driver: &DriverHandle) -> Result<crate::coder::EncoderFn, Error> {
    let table = cached_fields::<S>(driver)?;
    Ok(Arc::new(move |s: &mut EncodeState, v: &dyn Reflect| {
        encode_record(s, &table, v, true)
    }))
}

/// Builds the cached decoder for a derived record type.
pub fn record_decoder<S: Record>(driver: &DriverHandle) -> Result<crate::coder::DecoderFn, Error> {
    let table = cached_fields::<S>(driver)?;
    Ok(Arc::new(move |s: &mut DecodeState, v: &mut dyn Reflect| {
        let framed = s.wrap_on_decode();
        decode_record(s, &table, v, framed)
    }))
}

/// Walks a record value against its field table, appending output through
/// the driver. Embedded sub-records recurse with `framed` off so their
/// fields land in the enclosing frame.
pub(crate) fn encode_record(
    s: &mut EncodeState,
    table: &FieldTable,
    v: &dyn Reflect,
    framed: bool,
) -> Result<(), Error> {
    s.set_struct(table.name());
    if framed {
        s.write_opener();
    }

    let mut sep = false;
    for field in table.fields() {
        s.set_field(field);
        if ENABLE_DEBUG_OUTPUT {
            println!(
                "write field:\tstruct={}\tfield={}\tout_len={}",
                table.name(),
                field.name(),
                s.out_len()
            );
        }
        match field.access() {
            FieldAccess::Embedded { shape, table: sub } => {
                if sep {
                    s.write_separator();
                }
                sep = s.separate();
                match (shape.get)(v)? {
                    Some(inner) => encode_record(s, sub, inner, false)?,
                    None => {
                        // An unset embedded pointer still contributes a full
                        // set of zero-valued fields.
                        let zero = (shape.synthesize)();
                        encode_record(s, sub, zero.as_ref(), false)?;
                    }
                }
            }
            FieldAccess::Leaf { get, encoder, .. } => {
                let value = (get)(v)?;
                if field.omit_empty() && value.is_empty_value() {
                    continue;
                }
                if sep {
                    s.write_separator();
                }
                sep = s.separate();
                (encoder)(s, value)?;
            }
        }
    }

    if framed {
        s.write_closer();
    }
    Ok(())
}

/// Consumes the working buffer against a field table, filling the target in
/// place. Stops early when the buffer runs out or the closing frame begins;
/// fields not reached keep their current values.
pub(crate) fn decode_record(
    s: &mut DecodeState,
    table: &FieldTable,
    v: &mut dyn Reflect,
    framed: bool,
) -> Result<(), Error> {
    s.set_struct(table.name());
    if framed && !s.strip_opener() {
        return Err(Error::invalid_format(s.tag_name()));
    }

    let mut sep = false;
    for field in table.fields() {
        s.set_field(field);
        s.trim_spaces();
        if s.buffer_is_empty() || (framed && s.at_closer()) {
            break;
        }
        if sep && !s.strip_separator() {
            return Err(Error::invalid_format(s.tag_name()));
        }
        sep = s.remove_separator();
        if ENABLE_DEBUG_OUTPUT {
            println!(
                "read field:\tstruct={}\tfield={}\tremaining={}",
                table.name(),
                field.name(),
                s.buffer_len()
            );
        }
        match field.access() {
            FieldAccess::Embedded { shape, table: sub } => match (shape.get_mut)(v)? {
                Some(inner) => decode_record(s, sub, inner, false)?,
                None => {
                    return Err(Error::nil_embedded_pointer(s.tag_name(), shape.target));
                }
            },
            FieldAccess::Leaf {
                get_mut, decoder, ..
            } => {
                s.extract_field()?;
                if s.field_bytes().is_empty() {
                    continue;
                }
                let target = (get_mut)(v)?;
                (decoder)(s, target)?;
            }
        }
    }

    if framed && !s.strip_closer() {
        return Err(Error::invalid_format(s.tag_name()));
    }
    Ok(())
}
