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

//! Error handling for the engine, the tag drivers and the leaf parsers.
//!
//! Errors fall into three groups:
//!
//! - **Sentinels** that callers are expected to match on:
//!   [`Error::UnsupportedType`], [`Error::NilDynamicValue`],
//!   [`Error::NilEmbeddedPointer`] and [`Error::InvalidFormat`].
//! - **Leaf parser errors** converted from the standard library's numeric,
//!   boolean and UTF-8 parsers via `From`.
//! - **Context wrappers** ([`Error::Value`], [`Error::Field`]) added exactly
//!   once at the top of a `marshal`/`unmarshal` call, carrying the driver
//!   name, the operation and the struct/field the engine was visiting.
//!
//! Use the static constructor functions rather than building variants by
//! hand; they honor the `TAGWIRE_PANIC_ON_ERROR` debugging switch.

use std::borrow::Cow;

use thiserror::Error;

/// Compile-time flag: set `TAGWIRE_PANIC_ON_ERROR=1` in the environment at
/// build time to panic at the exact place an error is constructed. Together
/// with `RUST_BACKTRACE=1` this pinpoints the error source.
pub const PANIC_ON_ERROR: bool = option_env!("TAGWIRE_PANIC_ON_ERROR").is_some();

/// Error type for every fallible operation in the engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The engine has no coder for this kind of type.
    #[error("cannot support type")]
    UnsupportedType,

    /// A boxed dynamic value holds nothing and carries no type information
    /// to encode or decode with.
    #[error("dynamic value is nil")]
    NilDynamicValue,

    /// An embedded record pointer was unset while decoding into it.
    #[error("{tag}: cannot set embedded pointer to unset record: {target}")]
    NilEmbeddedPointer {
        tag: &'static str,
        target: &'static str,
    },

    /// Required framing or separator bytes were missing while decoding.
    #[error("{0}: the raw data has an invalid format for an object value")]
    InvalidFormat(&'static str),

    /// A field annotation failed to parse. The message carries the full
    /// driver/field context and is reported whenever the field is visited.
    #[error("{0}")]
    InvalidTag(Cow<'static, str>),

    /// A downcast between the erased and the concrete representation failed.
    #[error("{0}")]
    TypeError(Cow<'static, str>),

    /// Free-form error, typically produced by a tag driver.
    #[error("{0}")]
    Message(Cow<'static, str>),

    /// A non-sentinel error wrapped with call context outside of any field.
    #[error("{tag}: cannot {verb} value of type {type_name}: {source}")]
    Value {
        tag: &'static str,
        verb: &'static str,
        type_name: &'static str,
        source: Box<Error>,
    },

    /// A non-sentinel error wrapped with the struct field being visited.
    #[error("{tag}: cannot {verb} struct field {record}.{field} of type {type_name}: {source}")]
    Field {
        tag: &'static str,
        verb: &'static str,
        record: &'static str,
        field: &'static str,
        type_name: &'static str,
        source: Box<Error>,
    },

    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error(transparent)]
    ParseBool(#[from] std::str::ParseBoolError),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// Internal sentinel: the real error is already fully formed in the call
    /// context and the top level must surface it without wrapping.
    #[doc(hidden)]
    #[error("error already recorded in the call context")]
    Aborted,
}

impl Error {
    /// Creates a free-form [`Error::Message`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn message<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Message(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TypeError`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::TypeError(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidTag`] carrying a preformatted message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_tag<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidTag(s.into());
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidFormat`] for the named driver.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_format(tag: &'static str) -> Self {
        let err = Error::InvalidFormat(tag);
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NilEmbeddedPointer`] for the named driver and
    /// embedded record type.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn nil_embedded_pointer(tag: &'static str, target: &'static str) -> Self {
        let err = Error::NilEmbeddedPointer { tag, target };
        if PANIC_ON_ERROR {
            panic!("TAGWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Unwraps one layer of context wrapping, if present.
    ///
    /// Context wrapping is applied at most once per call; re-wrapping an
    /// already wrapped error goes through this first so nested duplication
    /// cannot occur.
    pub fn unwrap_once(self) -> Error {
        match self {
            Error::Value { source, .. } | Error::Field { source, .. } => *source,
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns early with an [`enum@Error`].
///
/// ```
/// use tagwire_core::ensure;
/// use tagwire_core::error::Error;
///
/// fn check(n: i32) -> Result<(), Error> {
///     ensure!(n > 0, "value must be positive");
///     ensure!(n < 10, "value {} too large", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::message($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::message(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
///
/// ```
/// use tagwire_core::bail;
/// use tagwire_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::message($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::message(format!($fmt, $($arg)*)))
    };
}
