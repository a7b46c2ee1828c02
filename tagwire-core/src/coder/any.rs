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

//! The dynamic kind: `Box<dyn Reflect>` dispatches on the runtime type of
//! its contents, in place in both directions.
//!
//! The zero value of a dynamic box is `Box::new(())`, and the unit type's
//! coders surface the nil-dynamic-value sentinel. An
//! `Option<Box<dyn Reflect>>` field therefore reports nil-dynamic-value
//! whenever it is unset and visited: the optional coder synthesizes the zero
//! box on encode and allocates it on decode, and either way the unit inside
//! is the next thing asked to code itself.

use std::any::Any;
use std::sync::Arc;

use crate::coder::{concrete, concrete_mut, CoderPair, DecoderFn, EncoderFn, Reflect, ReflectDefault};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::{type_coders, DriverHandle};

impl Reflect for Box<dyn Reflect> {
    fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
        Ok(Arc::new(|s: &mut EncodeState, v: &dyn Reflect| {
            let boxed = concrete::<Box<dyn Reflect>>(v)?;
            let inner: &dyn Reflect = &**boxed;
            let pair = inner.dyn_coders(s.driver())?;
            (pair.encoder)(s, inner)
        }))
    }

    fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
        Ok(Arc::new(|s: &mut DecodeState, v: &mut dyn Reflect| {
            let boxed = concrete_mut::<Box<dyn Reflect>>(v)?;
            let pair = (**boxed).dyn_coders(s.driver())?;
            (pair.decoder)(s, &mut **boxed)
        }))
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<Box<dyn Reflect>>(driver)
    }

    fn is_empty_value(&self) -> bool {
        // A dynamic box is empty only when it holds the nil unit, never
        // because of the value inside it.
        (**self).as_any().is::<()>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        "Box<dyn Reflect>"
    }
}

impl ReflectDefault for Box<dyn Reflect> {
    fn reflect_default() -> Self {
        Box::new(())
    }
}

impl Reflect for () {
    fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
        Ok(Arc::new(|s: &mut EncodeState, _: &dyn Reflect| {
            Err(s.fail(Error::NilDynamicValue))
        }))
    }

    fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
        Ok(Arc::new(|s: &mut DecodeState, _: &mut dyn Reflect| {
            Err(s.fail(Error::NilDynamicValue))
        }))
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<()>(driver)
    }

    fn is_empty_value(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        "()"
    }
}

impl ReflectDefault for () {
    fn reflect_default() -> Self {}
}
