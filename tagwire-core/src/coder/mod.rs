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

//! Per-kind coder implementations.
//!
//! Every codable type implements [`Reflect`]; each kind of type lives in its
//! own module and supplies the default encoder/decoder for that kind. The
//! compiler in [`crate::resolver`] memoizes the result per
//! `(driver type, value type)` pair and layers the whole-value capability
//! overrides on top.

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::DriverHandle;

pub mod capability;
pub mod record;

mod any;
mod bool;
mod boxed;
mod float;
mod map;
mod number;
mod option;
mod seq;
mod string;

pub use capability::{MarshalCast, UnmarshalCast};

/// Compiled encoder for one concrete type. Receives the per-call encode
/// state and the value as an erased reference.
pub type EncoderFn = Arc<dyn Fn(&mut EncodeState<'_>, &dyn Reflect) -> Result<(), Error> + Send + Sync>;

/// Compiled decoder for one concrete type, writing into the target in place.
pub type DecoderFn =
    Arc<dyn Fn(&mut DecodeState<'_>, &mut dyn Reflect) -> Result<(), Error> + Send + Sync>;

/// The `(encoder, decoder)` pair compiled for one concrete type.
#[derive(Clone)]
pub struct CoderPair {
    pub encoder: EncoderFn,
    pub decoder: DecoderFn,
}

/// A value the engine can walk.
///
/// Leaf kinds are implemented here; records derive it. The `make_*`
/// constructors are invoked once per `(driver type, value type)` pair by the
/// compiler, which caches the result; everything that must be decided per
/// type — not per value — happens inside them.
pub trait Reflect: Any {
    /// Builds the kind-default encoder for this type.
    fn make_encoder(driver: &DriverHandle) -> Result<EncoderFn, Error>
    where
        Self: Sized;

    /// Builds the kind-default decoder for this type.
    fn make_decoder(driver: &DriverHandle) -> Result<DecoderFn, Error>
    where
        Self: Sized;

    /// Cached coders for the value's dynamic type. Every implementation
    /// forwards to [`crate::resolver::type_coders`]; the method exists so
    /// boxed dynamic values can dispatch on their runtime type.
    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error>;

    /// Whether the value is empty for `omitempty` purposes: false, zero,
    /// zero length, or unset.
    fn is_empty_value(&self) -> bool;

    /// Whole-value encode override probe. Overridden by the derive with a
    /// capability probe; `None` means the kind-default encoder is used.
    fn marshal_cast() -> Option<MarshalCast>
    where
        Self: Sized,
    {
        None
    }

    /// Whole-value decode override probe, the counterpart of
    /// [`marshal_cast`](Reflect::marshal_cast).
    fn unmarshal_cast() -> Option<UnmarshalCast>
    where
        Self: Sized,
    {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The type's name for error messages.
    fn dyn_type_name(&self) -> &'static str;
}

/// Zero-value synthesis, used to allocate into unset optionals and to encode
/// through unset embedded pointers.
pub trait ReflectDefault {
    fn reflect_default() -> Self
    where
        Self: Sized;
}

/// Recovers the concrete type behind an erased value reference.
pub fn concrete<T: Reflect>(v: &dyn Reflect) -> Result<&T, Error> {
    match v.as_any().downcast_ref::<T>() {
        Some(c) => Ok(c),
        None => Err(Error::type_error(format!(
            "cannot cast value of type {} to {}",
            v.dyn_type_name(),
            std::any::type_name::<T>()
        ))),
    }
}

/// Mutable counterpart of [`concrete`].
pub fn concrete_mut<T: Reflect>(v: &mut dyn Reflect) -> Result<&mut T, Error> {
    let name = v.dyn_type_name();
    match v.as_any_mut().downcast_mut::<T>() {
        Some(c) => Ok(c),
        None => Err(Error::type_error(format!(
            "cannot cast value of type {} to {}",
            name,
            std::any::type_name::<T>()
        ))),
    }
}

/// Encoder for kinds the engine reserves: reports the unsupported-type
/// sentinel through the call context on first use.
pub(crate) fn unsupported_encoder() -> EncoderFn {
    Arc::new(|s: &mut EncodeState, _| Err(s.fail(Error::UnsupportedType)))
}

/// Decoder counterpart of [`unsupported_encoder`]. Returns the sentinel
/// directly so the top level wraps it with field context.
pub(crate) fn unsupported_decoder() -> DecoderFn {
    Arc::new(|_: &mut DecodeState, _| Err(Error::UnsupportedType))
}
