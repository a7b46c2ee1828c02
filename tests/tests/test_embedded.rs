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
use test_helpers::{assert_roundtrip, framed_config, SplitTag};

#[derive(Record, Debug, PartialEq)]
struct Inner {
    #[tag(split = "a")]
    pub a: i64,
    #[tag(split = "b")]
    pub b: i64,
}

// Embedded fields are flattened: one frame, the inner fields inline with
// the outer ones. The embedded field itself need not be public.
#[test]
fn test_embedded_record_is_flattened() {
    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        inner: Inner,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Outer {
        inner: Inner { a: 1, b: 2 },
        z: 9,
    };
    assert_roundtrip(&engine, &value, b"{1,2,9}");
}

#[test]
fn test_boxed_embedded_record() {
    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        inner: Box<Inner>,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Outer {
        inner: Box::new(Inner { a: 3, b: 4 }),
        z: 5,
    };
    assert_roundtrip(&engine, &value, b"{3,4,5}");
}

// Encoding through an unset embedded pointer synthesizes a zero record, so
// the frame still carries the full field complement.
#[test]
fn test_unset_embedded_pointer_encodes_zeros() {
    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        inner: Option<Inner>,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let bytes = engine.marshal(&Outer { inner: None, z: 9 }).unwrap();
    assert_eq!(bytes, b"{0,0,9}");
}

// Decoding through an unset embedded pointer is an error: there is no
// record to write into.
#[test]
fn test_unset_embedded_pointer_fails_decode() {
    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        inner: Option<Inner>,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let mut target = Outer { inner: None, z: 0 };
    let err = engine.unmarshal(b"{1,2,9}", &mut target).unwrap_err();
    assert!(matches!(err, Error::NilEmbeddedPointer { .. }));
    assert!(err.to_string().contains("Inner"));
}

#[test]
fn test_set_embedded_pointer_round_trips() {
    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        inner: Option<Inner>,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Outer {
        inner: Some(Inner { a: 7, b: 8 }),
        z: 9,
    };
    let bytes = engine.marshal(&value).unwrap();
    assert_eq!(bytes, b"{7,8,9}");

    let mut decoded = Outer {
        inner: Some(Inner { a: 0, b: 0 }),
        z: 0,
    };
    engine.unmarshal(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}

// An embedded record with no usable fields is dropped from the outer
// record's field walk entirely.
#[test]
fn test_empty_embedded_record_is_dropped() {
    #[derive(Record, Debug, PartialEq)]
    struct Nothing {}

    #[derive(Record, Debug, PartialEq)]
    struct Outer {
        #[embed]
        nothing: Nothing,
        #[tag(split = "z")]
        pub z: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let value = Outer {
        nothing: Nothing {},
        z: 9,
    };
    assert_roundtrip(&engine, &value, b"{9}");
}

// Private fields without an annotation never reach the driver.
#[test]
fn test_private_fields_are_invisible() {
    #[derive(Record, Debug, PartialEq)]
    struct Mixed {
        #[tag(split = "a")]
        pub a: i64,
        hidden: i64,
        #[tag(split = "b")]
        pub b: i64,
    }

    let engine = Engine::new(SplitTag, framed_config());
    let bytes = engine
        .marshal(&Mixed {
            a: 1,
            hidden: 99,
            b: 2,
        })
        .unwrap();
    assert_eq!(bytes, b"{1,2}");
}
