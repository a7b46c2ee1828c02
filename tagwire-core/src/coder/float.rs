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

//! Float kinds, rendered with `ryu` (shortest representation that parses
//! back to the same value at the declared width).

use std::any::Any;
use std::sync::Arc;

use crate::coder::{concrete, concrete_mut, CoderPair, DecoderFn, EncoderFn, Reflect, ReflectDefault};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::{type_coders, DriverHandle};

macro_rules! impl_float_reflect {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
                Ok(Arc::new(|s: &mut EncodeState, v: &dyn Reflect| {
                    let n = *concrete::<$ty>(v)?;
                    let mut scratch = ryu::Buffer::new();
                    s.encode_field(scratch.format(n).as_bytes())
                }))
            }

            fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
                Ok(Arc::new(|s: &mut DecodeState, v: &mut dyn Reflect| {
                    let parsed = s.field_text()?.parse::<$ty>()?;
                    *concrete_mut::<$ty>(v)? = parsed;
                    Ok(())
                }))
            }

            fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
                type_coders::<$ty>(driver)
            }

            fn is_empty_value(&self) -> bool {
                *self == 0.0
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn dyn_type_name(&self) -> &'static str {
                stringify!($ty)
            }
        }

        impl ReflectDefault for $ty {
            fn reflect_default() -> Self {
                0.0
            }
        }
    )*};
}

impl_float_reflect!(f32, f64);
