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

//! Per-call encode and decode state.
//!
//! A state object borrows the engine's driver binding and framing options
//! plus the pooled scratch buffers, and tracks the call context: which
//! struct and field the walk is visiting, the parsed annotation meta for the
//! current field, and an error recorded out of band by coders that form
//! their own diagnostics.

use std::any::Any;
use std::sync::Arc;

use crate::buffer::{Reader, Writer};
use crate::config::EngineOpts;
use crate::error::Error;
use crate::resolver::fields::FieldInfo;
use crate::resolver::DriverHandle;
use crate::tag::{Marshal, Unmarshal};

/// Where the walk currently is, for error framing.
pub(crate) struct CallContext {
    pub(crate) struct_name: &'static str,
    pub(crate) field_name: &'static str,
    pub(crate) field_type: &'static str,
    pub(crate) value_type: &'static str,
    pub(crate) meta: Option<Arc<dyn Any + Send + Sync>>,
    pub(crate) err: Option<Error>,
}

impl CallContext {
    fn new(value_type: &'static str) -> CallContext {
        CallContext {
            struct_name: "",
            field_name: "",
            field_type: "",
            value_type,
            meta: None,
            err: None,
        }
    }

    fn set_field(&mut self, field: &FieldInfo) {
        self.field_name = field.name();
        self.field_type = field.type_name();
        self.meta = field.meta().cloned();
    }

    fn take_recorded(&mut self) -> Error {
        match self.err.take() {
            Some(err) => err,
            None => Error::message("call aborted without a recorded error"),
        }
    }

    /// Wraps a non-sentinel error with the call context, unwrapping one
    /// prior layer first so wrapping never nests.
    fn wrap(&self, tag: &'static str, verb: &'static str, err: Error) -> Error {
        let source = Box::new(err.unwrap_once());
        if self.struct_name.is_empty() {
            Error::Value {
                tag,
                verb,
                type_name: self.current_type(),
                source,
            }
        } else {
            Error::Field {
                tag,
                verb,
                record: self.struct_name,
                field: self.field_name,
                type_name: self.current_type(),
                source,
            }
        }
    }

    fn current_type(&self) -> &'static str {
        if self.field_name.is_empty() {
            self.value_type
        } else {
            self.field_type
        }
    }

    pub(crate) fn surface_encode(&mut self, tag: &'static str, verb: &'static str, err: Error) -> Error {
        match err {
            Error::Aborted => self.take_recorded(),
            other => self.wrap(tag, verb, other),
        }
    }

    pub(crate) fn surface_decode(&mut self, tag: &'static str, verb: &'static str, err: Error) -> Error {
        match err {
            Error::Aborted => self.take_recorded(),
            err @ Error::InvalidFormat(_) => err,
            err @ Error::NilEmbeddedPointer { .. } => err,
            other => self.wrap(tag, verb, other),
        }
    }
}

/// State threaded through one `marshal` call.
pub struct EncodeState<'a> {
    driver: &'a DriverHandle,
    opts: &'a EngineOpts,
    pub(crate) out: &'a mut Writer,
    pub(crate) ctx: CallContext,
}

impl<'a> EncodeState<'a> {
    pub(crate) fn new(
        driver: &'a DriverHandle,
        opts: &'a EngineOpts,
        out: &'a mut Writer,
        value_type: &'static str,
    ) -> EncodeState<'a> {
        EncodeState {
            driver,
            opts,
            out,
            ctx: CallContext::new(value_type),
        }
    }

    /// The driver binding, for coders that dispatch on runtime types.
    pub fn driver(&self) -> &DriverHandle {
        self.driver
    }

    /// Hands the pre-serialized bytes of the current field to the driver,
    /// which appends the final syntactic form to the output.
    pub fn encode_field(&mut self, data: &[u8]) -> Result<(), Error> {
        self.driver
            .tag()
            .encode_field(self.ctx.field_name, self.ctx.meta.as_deref(), data, self.out)
    }

    /// Records a fully formed error in the context and returns the abort
    /// sentinel for propagation.
    pub fn fail(&mut self, err: Error) -> Error {
        self.ctx.err = Some(err);
        Error::Aborted
    }

    pub(crate) fn override_marshal<'v>(&self, v: &'v dyn Marshal) -> Option<&'v dyn Marshal> {
        self.driver.tag().marshaller(v)
    }

    pub(crate) fn set_struct(&mut self, name: &'static str) {
        self.ctx.struct_name = name;
    }

    pub(crate) fn set_field(&mut self, field: &FieldInfo) {
        self.ctx.set_field(field);
    }

    pub(crate) fn write_opener(&mut self) {
        self.out.write_bytes(&self.opts.opener);
    }

    pub(crate) fn write_closer(&mut self) {
        self.out.write_bytes(&self.opts.closer);
    }

    pub(crate) fn write_separator(&mut self) {
        self.out.write_bytes(&self.opts.separator);
    }

    pub(crate) fn separate(&self) -> bool {
        self.opts.separate
    }

    pub(crate) fn out_len(&self) -> usize {
        self.out.len()
    }
}

/// State threaded through one `unmarshal` call. `work` owns a private copy
/// of the caller's input; `tmp` receives the raw bytes the driver extracts
/// for the field being decoded.
pub struct DecodeState<'a> {
    driver: &'a DriverHandle,
    opts: &'a EngineOpts,
    pub(crate) work: &'a mut Reader,
    pub(crate) tmp: &'a mut Writer,
    pub(crate) ctx: CallContext,
}

impl<'a> DecodeState<'a> {
    pub(crate) fn new(
        driver: &'a DriverHandle,
        opts: &'a EngineOpts,
        work: &'a mut Reader,
        tmp: &'a mut Writer,
        value_type: &'static str,
    ) -> DecodeState<'a> {
        DecodeState {
            driver,
            opts,
            work,
            tmp,
            ctx: CallContext::new(value_type),
        }
    }

    /// The driver binding, for coders that dispatch on runtime types.
    pub fn driver(&self) -> &DriverHandle {
        self.driver
    }

    /// The raw bytes the driver extracted for the current field.
    pub fn field_bytes(&self) -> &[u8] {
        self.tmp.bytes()
    }

    /// The extracted field bytes as UTF-8 text.
    pub fn field_text(&self) -> Result<&str, Error> {
        Ok(std::str::from_utf8(self.tmp.bytes())?)
    }

    /// Records a fully formed error in the context and returns the abort
    /// sentinel for propagation.
    pub fn fail(&mut self, err: Error) -> Error {
        self.ctx.err = Some(err);
        Error::Aborted
    }

    pub(crate) fn override_unmarshal<'v>(
        &self,
        v: &'v mut dyn Unmarshal,
    ) -> Option<&'v mut dyn Unmarshal> {
        self.driver.tag().unmarshaler(v)
    }

    /// Asks the driver to locate the current field's raw bytes in the
    /// working buffer and stage them in `tmp`.
    pub(crate) fn extract_field(&mut self) -> Result<(), Error> {
        self.tmp.reset();
        self.driver.tag().decode_field(
            self.ctx.field_name,
            self.ctx.meta.as_deref(),
            self.work,
            self.tmp,
        )
    }

    pub(crate) fn tag_name(&self) -> &'static str {
        self.driver.name()
    }

    pub(crate) fn set_struct(&mut self, name: &'static str) {
        self.ctx.struct_name = name;
    }

    pub(crate) fn set_field(&mut self, field: &FieldInfo) {
        self.ctx.set_field(field);
    }

    pub(crate) fn wrap_on_decode(&self) -> bool {
        self.opts.wrap
    }

    pub(crate) fn remove_separator(&self) -> bool {
        self.opts.remove_separator
    }

    pub(crate) fn trim_spaces(&mut self) {
        self.work.trim_leading_spaces();
    }

    pub(crate) fn buffer_is_empty(&self) -> bool {
        self.work.is_empty()
    }

    pub(crate) fn buffer_len(&self) -> usize {
        self.work.len()
    }

    pub(crate) fn at_closer(&self) -> bool {
        !self.opts.closer.is_empty() && self.work.starts_with(&self.opts.closer)
    }

    pub(crate) fn strip_opener(&mut self) -> bool {
        self.work.strip_prefix(&self.opts.opener)
    }

    pub(crate) fn strip_closer(&mut self) -> bool {
        self.work.strip_prefix(&self.opts.closer)
    }

    pub(crate) fn strip_separator(&mut self) -> bool {
        self.work.strip_prefix(&self.opts.separator)
    }
}
