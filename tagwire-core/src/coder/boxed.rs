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

//! `Box<T>` is a pointer that is always set: both directions dereference
//! once and recurse into the target type's coder.

use std::any::Any;
use std::sync::Arc;

use crate::coder::{concrete, concrete_mut, CoderPair, DecoderFn, EncoderFn, Reflect, ReflectDefault};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::{decoder_for, encoder_for, type_coders, DriverHandle};

impl<T: Reflect + ReflectDefault> Reflect for Box<T> {
    fn make_encoder(driver: &DriverHandle) -> Result<EncoderFn, Error> {
        let inner = encoder_for::<T>(driver)?;
        Ok(Arc::new(move |s: &mut EncodeState, v: &dyn Reflect| {
            let boxed = concrete::<Box<T>>(v)?;
            inner(s, &**boxed)
        }))
    }

    fn make_decoder(driver: &DriverHandle) -> Result<DecoderFn, Error> {
        let inner = decoder_for::<T>(driver)?;
        Ok(Arc::new(move |s: &mut DecodeState, v: &mut dyn Reflect| {
            let boxed = concrete_mut::<Box<T>>(v)?;
            inner(s, &mut **boxed)
        }))
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<Box<T>>(driver)
    }

    fn is_empty_value(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        std::any::type_name::<Box<T>>()
    }
}

impl<T: ReflectDefault> ReflectDefault for Box<T> {
    fn reflect_default() -> Self {
        Box::new(T::reflect_default())
    }
}
