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

//! The pointer/optional kind.
//!
//! Encoding an unset optional synthesizes the zero value of the target and
//! encodes that; a self-referential record must therefore mark its
//! back-pointer `omitempty` (an unset, non-omitted back-pointer would
//! synthesize zero records without end). Decoding into an unset optional
//! allocates a fresh default, decodes into it, and keeps the allocation only
//! if the decoded value is non-empty.

use std::any::Any;
use std::sync::Arc;

use crate::coder::{concrete, concrete_mut, CoderPair, DecoderFn, EncoderFn, Reflect, ReflectDefault};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::{decoder_for, encoder_for, type_coders, DriverHandle};

impl<T: Reflect + ReflectDefault> Reflect for Option<T> {
    fn make_encoder(driver: &DriverHandle) -> Result<EncoderFn, Error> {
        let inner = encoder_for::<T>(driver)?;
        Ok(Arc::new(move |s: &mut EncodeState, v: &dyn Reflect| {
            match concrete::<Option<T>>(v)? {
                Some(value) => inner(s, value),
                None => {
                    let zero = T::reflect_default();
                    inner(s, &zero)
                }
            }
        }))
    }

    fn make_decoder(driver: &DriverHandle) -> Result<DecoderFn, Error> {
        let inner = decoder_for::<T>(driver)?;
        Ok(Arc::new(move |s: &mut DecodeState, v: &mut dyn Reflect| {
            let target = concrete_mut::<Option<T>>(v)?;
            match target {
                Some(value) => inner(s, value),
                None => {
                    let mut fresh = T::reflect_default();
                    inner(s, &mut fresh)?;
                    if !fresh.is_empty_value() {
                        *target = Some(fresh);
                    }
                    Ok(())
                }
            }
        }))
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<Option<T>>(driver)
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        std::any::type_name::<Option<T>>()
    }
}

impl<T> ReflectDefault for Option<T> {
    fn reflect_default() -> Self {
        None
    }
}
