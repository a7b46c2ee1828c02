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

mod test_helpers;

use tagwire_core::engine::Engine;
use tagwire_core::error::Error;
use tagwire_derive::Record;
use test_helpers::{framed_config, plain_config, ShapeTag, SplitTag};

#[derive(Record, Debug, PartialEq)]
struct Pair {
    #[tag(split = "x")]
    pub x: i64,
    #[tag(split = "y")]
    pub y: i64,
}

// A missing opening frame is an invalid-format error carrying the driver
// name.
#[test]
fn test_missing_opener_is_invalid_format() {
    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Pair { x: 0, y: 0 };
    let err = engine.unmarshal(b"1,2}", &mut target).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
    assert_eq!(
        err.to_string(),
        "split: the raw data has an invalid format for an object value"
    );
}

#[test]
fn test_missing_closer_is_invalid_format() {
    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Pair { x: 0, y: 0 };
    let err = engine.unmarshal(b"{1,2", &mut target).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[test]
fn test_missing_separator_is_invalid_format() {
    #[derive(Record, Debug, PartialEq)]
    struct Trio {
        #[tag(shape = "int")]
        pub a: i64,
        #[tag(shape = "bool")]
        pub b: bool,
    }

    let mut config = plain_config();
    config.value_separator = b";".to_vec();
    config.remove_separator_when_decoding = true;
    let engine = Engine::new(ShapeTag, config);
    let mut target = Trio { a: 0, b: false };
    let err = engine.unmarshal(b"1true", &mut target).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

// An overflowing literal surfaces the integer parser's error wrapped with
// the struct field context.
#[test]
fn test_overflow_is_wrapped_with_field_context() {
    #[derive(Record, Debug, PartialEq)]
    struct Narrow {
        #[tag(split = "n")]
        pub n: i8,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Narrow { n: 0 };
    let err = engine.unmarshal(b"{300}", &mut target).unwrap_err();
    let message = err.to_string();
    assert!(
        message.starts_with("split: cannot decode data into struct field Narrow.n of type i8:"),
        "unexpected message: {message}"
    );
}

// Sequences of non-byte elements are reserved and refuse to encode.
#[test]
fn test_unsupported_sequence_kind() {
    #[derive(Record, Debug, PartialEq)]
    struct Holder {
        #[tag(split = "xs")]
        pub xs: Vec<i32>,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let err = engine.marshal(&Holder { xs: vec![1] }).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType));
    assert_eq!(err.to_string(), "cannot support type");
}

#[test]
fn test_unsupported_map_kind_on_decode() {
    use std::collections::HashMap;

    #[derive(Record, Debug, PartialEq)]
    struct Holder {
        #[tag(split = "m")]
        pub m: HashMap<String, i32>,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Holder { m: HashMap::new() };
    let err = engine.unmarshal(b"{zzz}", &mut target).unwrap_err();
    // Decoding wraps the sentinel with the field being visited.
    assert!(err
        .to_string()
        .contains("cannot decode data into struct field Holder.m"));
}

// A malformed annotation poisons the field: the record still introspects,
// and the parse failure is reported when the field is visited.
#[test]
fn test_broken_annotation_is_reported_on_use() {
    #[derive(Record, Debug, PartialEq)]
    struct Odd {
        #[tag(shape = "bogus")]
        pub field: i64,
    }

    let engine = Engine::new(ShapeTag, plain_config());
    let err = engine.marshal(&Odd { field: 1 }).unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("tag bogus of struct field Odd.field"),
        "unexpected message: {message}"
    );

    // The driver has no meta for the poisoned field and extracts with its
    // default shape; any non-empty extraction reaches the poisoned decoder.
    let mut target = Odd { field: 0 };
    let err = engine.unmarshal(b"abc", &mut target).unwrap_err();
    assert!(err.to_string().contains("tag bogus of struct field"));
}

// The engine stays usable after an error: pooled scratch is released and
// the next call starts clean.
#[test]
fn test_engine_recovers_after_error() {
    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Pair { x: 0, y: 0 };
    assert!(engine.unmarshal(b"oops", &mut target).is_err());

    let value = Pair { x: 4, y: 5 };
    let bytes = engine.marshal(&value).unwrap();
    assert_eq!(bytes, b"{4,5}");
    let mut decoded = Pair { x: 0, y: 0 };
    engine.unmarshal(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}
