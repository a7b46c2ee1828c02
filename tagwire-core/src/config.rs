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

/// Configuration for an [`Engine`](crate::engine::Engine).
///
/// All byte strings may be empty, which means "nothing in that slot". The
/// configuration is consumed at engine construction and immutable afterward.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Bytes written before each record on encode.
    pub struct_opener: Vec<u8>,
    /// Bytes written after each record on encode.
    pub struct_closer: Vec<u8>,
    /// When set, decoding requires and strips the opener/closer around each
    /// record; a missing frame is an invalid-format error.
    pub unwrap_when_decoding: bool,
    /// Bytes written between consecutive non-omitted fields on encode.
    pub value_separator: Vec<u8>,
    /// When set, decoding requires and strips the separator between
    /// consecutive fields; a missing separator is an invalid-format error.
    pub remove_separator_when_decoding: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Framing state precomputed once at engine construction.
pub(crate) struct EngineOpts {
    pub(crate) opener: Vec<u8>,
    pub(crate) closer: Vec<u8>,
    pub(crate) separator: Vec<u8>,
    /// Decode requires and strips frames.
    pub(crate) wrap: bool,
    /// Encode writes separators between fields.
    pub(crate) separate: bool,
    /// Decode requires and strips separators.
    pub(crate) remove_separator: bool,
}

impl From<Config> for EngineOpts {
    fn from(cfg: Config) -> EngineOpts {
        let framed = !cfg.struct_opener.is_empty() || !cfg.struct_closer.is_empty();
        let separated = !cfg.value_separator.is_empty();
        EngineOpts {
            wrap: framed && cfg.unwrap_when_decoding,
            separate: separated,
            remove_separator: separated && cfg.remove_separator_when_decoding,
            opener: cfg.struct_opener,
            closer: cfg.struct_closer,
            separator: cfg.value_separator,
        }
    }
}
