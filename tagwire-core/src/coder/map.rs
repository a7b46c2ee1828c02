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

//! Associative containers and fixed-size arrays are reserved kinds: they
//! participate in record walks only far enough to report the
//! unsupported-type sentinel when actually visited.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use crate::coder::{
    unsupported_decoder, unsupported_encoder, CoderPair, DecoderFn, EncoderFn, Reflect,
    ReflectDefault,
};
use crate::error::Error;
use crate::resolver::{type_coders, DriverHandle};

macro_rules! impl_reserved_map {
    ($($container:ident),* $(,)?) => {$(
        impl<K: 'static, V: 'static> Reflect for $container<K, V> {
            fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
                Ok(unsupported_encoder())
            }

            fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
                Ok(unsupported_decoder())
            }

            fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
                type_coders::<$container<K, V>>(driver)
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
                std::any::type_name::<$container<K, V>>()
            }
        }
    )*};
}

impl_reserved_map!(HashMap, BTreeMap);

impl<K: 'static, V: 'static> ReflectDefault for HashMap<K, V> {
    fn reflect_default() -> Self {
        HashMap::new()
    }
}

impl<K: Ord + 'static, V: 'static> ReflectDefault for BTreeMap<K, V> {
    fn reflect_default() -> Self {
        BTreeMap::new()
    }
}

impl<T: 'static, const N: usize> Reflect for [T; N] {
    fn make_encoder(_driver: &DriverHandle) -> Result<EncoderFn, Error> {
        Ok(unsupported_encoder())
    }

    fn make_decoder(_driver: &DriverHandle) -> Result<DecoderFn, Error> {
        Ok(unsupported_decoder())
    }

    fn dyn_coders(&self, driver: &DriverHandle) -> Result<CoderPair, Error> {
        type_coders::<[T; N]>(driver)
    }

    fn is_empty_value(&self) -> bool {
        N == 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_type_name(&self) -> &'static str {
        std::any::type_name::<[T; N]>()
    }
}
