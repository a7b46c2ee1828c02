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

//! The coder compiler and its process-wide caches.
//!
//! Coders are compiled once per `(driver type, value type)` pair and shared
//! forever after. Self-referential types bootstrap through a forward
//! reference: before compiling, a stub that parks on a one-shot latch is
//! published under the key, so any recursive or racing lookup finds a
//! callable entry immediately. When the real coder is ready it replaces the
//! stub and releases the latch. A guard makes the replacement unconditional:
//! if compilation fails or panics, a poisoned coder that reports the failure
//! is published instead, so no stub waits forever.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::coder::{capability, CoderPair, DecoderFn, EncoderFn, Reflect};
use crate::error::Error;
use crate::tag::{ErasedTag, TagDriver};
use crate::util::Latch;

/// A tag driver bound for compilation: the erased driver plus its type
/// identity, which keys every cache.
#[derive(Clone)]
pub struct DriverHandle {
    tag: Arc<dyn ErasedTag>,
    key: TypeId,
}

impl DriverHandle {
    pub(crate) fn new<D: TagDriver>(driver: D) -> DriverHandle {
        DriverHandle {
            tag: Arc::new(driver),
            key: TypeId::of::<D>(),
        }
    }

    /// The driver's annotation key and error-message prefix.
    pub fn name(&self) -> &'static str {
        self.tag.tag_name()
    }

    pub(crate) fn tag(&self) -> &dyn ErasedTag {
        &*self.tag
    }

    pub(crate) fn key(&self) -> TypeId {
        self.key
    }
}

type CoderKey = (TypeId, TypeId);

fn encoder_cache() -> &'static RwLock<HashMap<CoderKey, EncoderFn>> {
    static CACHE: OnceLock<RwLock<HashMap<CoderKey, EncoderFn>>> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

fn decoder_cache() -> &'static RwLock<HashMap<CoderKey, DecoderFn>> {
    static CACHE: OnceLock<RwLock<HashMap<CoderKey, DecoderFn>>> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// Returns the cached `(encoder, decoder)` pair for `T` under this driver,
/// compiling on first use.
pub fn type_coders<T: Reflect>(driver: &DriverHandle) -> Result<CoderPair, Error> {
    Ok(CoderPair {
        encoder: encoder_for::<T>(driver)?,
        decoder: decoder_for::<T>(driver)?,
    })
}

/// Returns the cached encoder for `T` under this driver, compiling on first
/// use.
pub fn encoder_for<T: Reflect>(driver: &DriverHandle) -> Result<EncoderFn, Error> {
    let key = (driver.key, TypeId::of::<T>());
    if let Some(found) = lookup(encoder_cache(), key) {
        return Ok(found);
    }

    let latch: Arc<Latch<EncoderFn>> = Arc::new(Latch::new());
    let stub: EncoderFn = {
        let latch = latch.clone();
        Arc::new(move |s, v| (latch.wait())(s, v))
    };
    if let Some(winner) = publish_stub(encoder_cache(), key, stub) {
        return Ok(winner);
    }

    let guard = Publish {
        key,
        latch,
        cache: encoder_cache,
        poison: poisoned_encoder,
        type_name: std::any::type_name::<T>(),
        done: false,
    };
    let real = compile_encoder::<T>(driver)?;
    guard.publish(real.clone());
    Ok(real)
}

/// Returns the cached decoder for `T` under this driver, compiling on first
/// use.
pub fn decoder_for<T: Reflect>(driver: &DriverHandle) -> Result<DecoderFn, Error> {
    let key = (driver.key, TypeId::of::<T>());
    if let Some(found) = lookup(decoder_cache(), key) {
        return Ok(found);
    }

    let latch: Arc<Latch<DecoderFn>> = Arc::new(Latch::new());
    let stub: DecoderFn = {
        let latch = latch.clone();
        Arc::new(move |s, v| (latch.wait())(s, v))
    };
    if let Some(winner) = publish_stub(decoder_cache(), key, stub) {
        return Ok(winner);
    }

    let guard = Publish {
        key,
        latch,
        cache: decoder_cache,
        poison: poisoned_decoder,
        type_name: std::any::type_name::<T>(),
        done: false,
    };
    let real = compile_decoder::<T>(driver)?;
    guard.publish(real.clone());
    Ok(real)
}

fn compile_encoder<T: Reflect>(driver: &DriverHandle) -> Result<EncoderFn, Error> {
    if let Some(cast) = T::marshal_cast() {
        return Ok(capability::marshaller_encoder(cast));
    }
    T::make_encoder(driver)
}

fn compile_decoder<T: Reflect>(driver: &DriverHandle) -> Result<DecoderFn, Error> {
    if let Some(cast) = T::unmarshal_cast() {
        return Ok(capability::unmarshaler_decoder(cast));
    }
    T::make_decoder(driver)
}

fn lookup<F: Clone>(cache: &RwLock<HashMap<CoderKey, F>>, key: CoderKey) -> Option<F> {
    cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned()
}

/// Installs the stub under `key` unless another thread got there first, in
/// which case that entry (their stub or the finished coder) wins.
fn publish_stub<F: Clone>(
    cache: &RwLock<HashMap<CoderKey, F>>,
    key: CoderKey,
    stub: F,
) -> Option<F> {
    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = map.get(&key) {
        return Some(existing.clone());
    }
    map.insert(key, stub);
    None
}

fn poisoned_encoder(type_name: &'static str) -> EncoderFn {
    Arc::new(move |s, _| {
        Err(s.fail(Error::type_error(format!(
            "encoder for {type_name} failed to compile"
        ))))
    })
}

fn poisoned_decoder(type_name: &'static str) -> DecoderFn {
    Arc::new(move |_, _| {
        Err(Error::type_error(format!(
            "decoder for {type_name} failed to compile"
        )))
    })
}

/// Guarantees the stub published by the compiling thread is replaced exactly
/// once: by the real coder on success, by a poisoned coder if compilation
/// returns early or unwinds.
struct Publish<F: Clone + 'static> {
    key: CoderKey,
    latch: Arc<Latch<F>>,
    cache: fn() -> &'static RwLock<HashMap<CoderKey, F>>,
    poison: fn(&'static str) -> F,
    type_name: &'static str,
    done: bool,
}

impl<F: Clone + 'static> Publish<F> {
    fn publish(mut self, real: F) {
        self.store(real);
        self.done = true;
    }

    fn store(&self, coder: F) {
        (self.cache)()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.key, coder.clone());
        self.latch.set(coder);
    }
}

impl<F: Clone + 'static> Drop for Publish<F> {
    fn drop(&mut self) {
        if !self.done {
            self.store((self.poison)(self.type_name));
        }
    }
}
