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

//! Whole-value [`Marshal`]/[`Unmarshal`] capability detection and the
//! override coders built from it.
//!
//! Whether a concrete type carries a capability is decided where the type is
//! concrete: the derive expands `MarshalProbe::<Self>::CAST`, which resolves
//! to the inherent constant when the bound holds and to the trait fallback
//! otherwise. The driver keeps per-value veto power through its
//! `is_marshaller`/`is_unmarshaler` hooks.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::coder::{DecoderFn, EncoderFn, Reflect};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::tag::{Marshal, Unmarshal};

/// Recovers the [`Marshal`] view of an erased value of one concrete type.
pub type MarshalCast = fn(&dyn Reflect) -> Option<&dyn Marshal>;

/// Recovers the [`Unmarshal`] view of an erased value of one concrete type.
pub type UnmarshalCast = fn(&mut dyn Reflect) -> Option<&mut dyn Unmarshal>;

fn cast_marshal<T: Marshal + Reflect>(v: &dyn Reflect) -> Option<&dyn Marshal> {
    v.as_any().downcast_ref::<T>().map(|c| c as &dyn Marshal)
}

fn cast_unmarshal<T: Unmarshal + Reflect>(v: &mut dyn Reflect) -> Option<&mut dyn Unmarshal> {
    v.as_any_mut()
        .downcast_mut::<T>()
        .map(|c| c as &mut dyn Unmarshal)
}

/// Capability probe resolved at the concrete type.
#[doc(hidden)]
pub struct MarshalProbe<T: ?Sized>(pub PhantomData<T>);

impl<T: Marshal + Reflect> MarshalProbe<T> {
    pub const CAST: Option<MarshalCast> = Some(cast_marshal::<T>);
}

/// Fallback for types without the [`Marshal`] capability.
#[doc(hidden)]
pub trait NoMarshalCapability {
    const CAST: Option<MarshalCast> = None;
}

impl<T: ?Sized> NoMarshalCapability for MarshalProbe<T> {}

/// Capability probe resolved at the concrete type.
#[doc(hidden)]
pub struct UnmarshalProbe<T: ?Sized>(pub PhantomData<T>);

impl<T: Unmarshal + Reflect> UnmarshalProbe<T> {
    pub const CAST: Option<UnmarshalCast> = Some(cast_unmarshal::<T>);
}

/// Fallback for types without the [`Unmarshal`] capability.
#[doc(hidden)]
pub trait NoUnmarshalCapability {
    const CAST: Option<UnmarshalCast> = None;
}

impl<T: ?Sized> NoUnmarshalCapability for UnmarshalProbe<T> {}

/// Builds the override encoder for a type carrying the [`Marshal`]
/// capability. If the driver declines the value at run time, the field
/// contributes no bytes.
pub(crate) fn marshaller_encoder(cast: MarshalCast) -> EncoderFn {
    Arc::new(move |s: &mut EncodeState, v: &dyn Reflect| {
        let value = match cast(v) {
            Some(value) => value,
            None => return Err(Error::type_error("capability cast hit a foreign value")),
        };
        let accepted = match s.override_marshal(value) {
            Some(accepted) => accepted,
            None => return Ok(()),
        };
        let payload = accepted.marshal()?;
        s.encode_field(&payload)
    })
}

/// Builds the override decoder for a type carrying the [`Unmarshal`]
/// capability. If the driver declines the value at run time, the target
/// keeps its current value.
pub(crate) fn unmarshaler_decoder(cast: UnmarshalCast) -> DecoderFn {
    Arc::new(move |s: &mut DecodeState, v: &mut dyn Reflect| {
        let value = match cast(v) {
            Some(value) => value,
            None => return Err(Error::type_error("capability cast hit a foreign value")),
        };
        match s.override_unmarshal(value) {
            Some(accepted) => accepted.unmarshal(s.field_bytes()),
            None => Ok(()),
        }
    })
}
