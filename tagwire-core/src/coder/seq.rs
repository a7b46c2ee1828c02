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

//! Sequence kinds. `Vec<u8>` is the byte-sequence kind and moves bytes
//! verbatim; sequences of any other element are reserved and compile to the
//! unsupported-type coders.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::coder::{
    concrete, concrete_mut, unsupported_decoder, unsupported_encoder, CoderPair, DecoderFn,
    EncoderFn, Reflect, ReflectDefault,
};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::{type_coders, DriverHandle};

impl<T: 'static> Reflect for Vec<T> {
    fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
        if TypeId::of::<T>() != TypeId::of::<u8>() {
            return Ok(unsupported_encoder());
        }
        Ok(Arc::new(|s: &mut EncodeState, v: &dyn Reflect| {
            let bytes = concrete::<Vec<u8>>(v)?;
            s.encode_field(bytes)
        }))
    }

    fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
        if TypeId::of::<T>() != TypeId::of::<u8>() {
            return Ok(unsupported_decoder());
        }
        Ok(Arc::new(|s: &mut DecodeState, v: &mut dyn Reflect| {
            let target = concrete_mut::<Vec<u8>>(v)?;
            target.clear();
            target.extend_from_slice(s.field_bytes());
            Ok(())
        }))
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<Vec<T>>(driver)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        std::any::type_name::<Vec<T>>()
    }
}

impl<T> ReflectDefault for Vec<T> {
    fn reflect_default() -> Self {
        Vec::new()
    }
}
