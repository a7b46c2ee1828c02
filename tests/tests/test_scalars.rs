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
use tagwire_derive::Record;
use test_helpers::{assert_roundtrip, framed_config, plain_config, ShapeTag, SplitTag};

// Unframed, unseparated scalars: the encoded form is the bare concatenation
// of the field values.
#[test]
fn test_scalar_concatenation() {
    #[derive(Record, Debug, PartialEq)]
    struct Msg {
        #[tag(shape = "int")]
        pub a: i64,
        #[tag(shape = "text")]
        pub b: String,
        #[tag(shape = "bool")]
        pub c: bool,
    }

    let engine = Engine::new(ShapeTag, plain_config());
    let msg = Msg {
        a: 42,
        b: String::from("hi"),
        c: true,
    };
    assert_roundtrip(&engine, &msg, b"42hitrue");
}

#[test]
fn test_signed_and_unsigned_widths() {
    #[derive(Record, Debug, PartialEq)]
    struct Extremes {
        #[tag(split = "a")]
        pub a: i64,
        #[tag(split = "b")]
        pub b: u64,
        #[tag(split = "c")]
        pub c: i8,
        #[tag(split = "d")]
        pub d: u16,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Extremes {
        a: i64::MIN,
        b: u64::MAX,
        c: -128,
        d: 65535,
    };
    assert_roundtrip(
        &engine,
        &value,
        b"{-9223372036854775808,18446744073709551615,-128,65535}",
    );
}

#[test]
fn test_floats_round_trip() {
    #[derive(Record, Debug, PartialEq)]
    struct Floats {
        #[tag(split = "x")]
        pub x: f64,
        #[tag(split = "y")]
        pub y: f32,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Floats { x: -0.25, y: 3.5 };
    assert_roundtrip(&engine, &value, b"{-0.25,3.5}");
}

#[test]
fn test_byte_sequence_verbatim() {
    #[derive(Record, Debug, PartialEq)]
    struct Blob {
        #[tag(shape = "bytes")]
        pub data: Vec<u8>,
    }

    let engine = Engine::new(ShapeTag, plain_config());
    let value = Blob {
        data: b"raw payload".to_vec(),
    };
    assert_roundtrip(&engine, &value, b"raw payload");
}

// A bare scalar can be marshalled directly; there is no field context, so
// the driver sees an empty field name and no meta. Decoding a bare scalar
// parses the whole input.
#[test]
fn test_top_level_scalars() {
    let engine = Engine::new(ShapeTag, plain_config());
    assert_eq!(engine.marshal(&-7i32).unwrap(), b"-7");
    assert_eq!(engine.marshal(&String::from("abc")).unwrap(), b"abc");
    assert_eq!(engine.marshal(&true).unwrap(), b"true");

    let mut n = 0i32;
    engine.unmarshal(b"-7", &mut n).unwrap();
    assert_eq!(n, -7);
    let mut text = String::new();
    engine.unmarshal(b"abc", &mut text).unwrap();
    assert_eq!(text, "abc");
}

// Nested (non-embedded) record fields frame themselves inside the outer
// record.
#[test]
fn test_nested_record_field() {
    #[derive(Record, Debug, PartialEq)]
    struct Pair {
        #[tag(split = "x")]
        pub x: i64,
        #[tag(split = "y")]
        pub y: i64,
    }

    #[derive(Record, Debug, PartialEq)]
    struct Wrap {
        #[tag(split = "id")]
        pub id: i64,
        #[tag(split = "rec")]
        pub pair: Pair,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Wrap {
        id: 1,
        pair: Pair { x: 2, y: 3 },
    };
    assert_roundtrip(&engine, &value, b"{1,{2,3}}");
}
