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

//! The engine: one tag driver bound to one configuration.
//!
//! An [`Engine`] is cheap to keep around, `Send + Sync`, and concurrently
//! reusable; distinct values may be processed from any number of threads at
//! once. A single target value must not be shared with other threads for
//! the duration of a call.

use std::sync::OnceLock;

use crate::buffer::{Reader, Writer};
use crate::coder::Reflect;
use crate::config::{Config, EngineOpts};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::pool::Pool;
use crate::resolver::{decoder_for, encoder_for, DriverHandle};
use crate::tag::TagDriver;

const MARSHAL_ERROR: &str = "encode data from";
const UNMARSHAL_ERROR: &str = "decode data into";

#[derive(Default)]
struct EncodeScratch {
    out: Writer,
}

#[derive(Default)]
struct DecodeScratch {
    work: Reader,
    tmp: Writer,
}

fn encode_pool() -> &'static Pool<EncodeScratch> {
    static POOL: OnceLock<Pool<EncodeScratch>> = OnceLock::new();
    POOL.get_or_init(Pool::new)
}

fn decode_pool() -> &'static Pool<DecodeScratch> {
    static POOL: OnceLock<Pool<DecodeScratch>> = OnceLock::new();
    POOL.get_or_init(Pool::new)
}

/// A format engine bound to one tag driver and one configuration.
///
/// # Examples
///
/// ```rust, ignore
/// use tagwire_core::config::Config;
/// use tagwire_core::engine::Engine;
///
/// let engine = Engine::new(MyDriver, Config {
///     struct_opener: b"{".to_vec(),
///     struct_closer: b"}".to_vec(),
///     unwrap_when_decoding: true,
///     value_separator: b",".to_vec(),
///     remove_separator_when_decoding: true,
/// });
/// let bytes = engine.marshal(&point)?;
/// let mut decoded = Point::default();
/// engine.unmarshal(&bytes, &mut decoded)?;
/// ```
pub struct Engine {
    driver: DriverHandle,
    opts: EngineOpts,
    tag_name: &'static str,
}

impl Engine {
    /// Binds `driver` and `config` into an engine. The driver's type — not
    /// the instance — keys the process-wide coder caches, so all engines
    /// over one driver type share compiled coders.
    pub fn new<D: TagDriver>(driver: D, config: Config) -> Engine {
        let tag_name = driver.name();
        Engine {
            driver: DriverHandle::new(driver),
            opts: EngineOpts::from(config),
            tag_name,
        }
    }

    /// Encodes `value` and returns the encoded bytes.
    ///
    /// On error nothing of the partial output is observable.
    pub fn marshal<T: Reflect>(&self, value: &T) -> Result<Vec<u8>, Error> {
        encode_pool().borrow_mut(|scratch| {
            scratch.out.reset();
            let mut state = EncodeState::new(
                &self.driver,
                &self.opts,
                &mut scratch.out,
                std::any::type_name::<T>(),
            );
            let encoder = encoder_for::<T>(&self.driver)?;
            match encoder(&mut state, value) {
                Ok(()) => Ok(state.out.dump()),
                Err(err) => {
                    state.out.reset();
                    Err(state.ctx.surface_encode(self.tag_name, MARSHAL_ERROR, err))
                }
            }
        })
    }

    /// Decodes `data` into `value` in place.
    ///
    /// The input is copied into a private working buffer first, so the
    /// caller's slice is never mutated. On error the target keeps whatever
    /// state decoding reached; callers are expected to discard it.
    pub fn unmarshal<T: Reflect>(&self, data: &[u8], value: &mut T) -> Result<(), Error> {
        decode_pool().borrow_mut(|scratch| {
            scratch.work.load(data);
            // Stage the whole input for non-record targets; record walks
            // re-stage per field through the driver.
            scratch.tmp.reset();
            scratch.tmp.write_bytes(data);
            let mut state = DecodeState::new(
                &self.driver,
                &self.opts,
                &mut scratch.work,
                &mut scratch.tmp,
                std::any::type_name::<T>(),
            );
            let decoder = decoder_for::<T>(&self.driver)?;
            match decoder(&mut state, value) {
                Ok(()) => Ok(()),
                Err(err) => Err(state
                    .ctx
                    .surface_decode(self.tag_name, UNMARSHAL_ERROR, err)),
            }
        })
    }
}
