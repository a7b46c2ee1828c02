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

use std::sync::Arc;
use std::thread;

use tagwire_core::engine::Engine;
use tagwire_derive::Record;
use test_helpers::{assert_roundtrip, framed_config, SplitTag};

// A self-referential record. The back-pointer is marked omitempty so a
// chain terminates instead of synthesizing zero nodes without end.
#[derive(Record, Debug, PartialEq)]
struct Node {
    #[tag(split = "v")]
    pub v: i64,
    #[tag(split = "rec,omitempty")]
    pub next: Option<Box<Node>>,
}

fn chain(values: &[i64]) -> Option<Box<Node>> {
    let mut next = None;
    for v in values.iter().rev() {
        next = Some(Box::new(Node { v: *v, next }));
    }
    next
}

#[test]
fn test_two_node_chain_round_trips() {
    let engine = Engine::new(SplitTag, framed_config());
    let list = Node {
        v: 1,
        next: chain(&[2]),
    };
    assert_roundtrip(&engine, &list, b"{1,{2}}");
}

#[test]
fn test_longer_chain_round_trips() {
    let engine = Engine::new(SplitTag, framed_config());
    let list = Node {
        v: 1,
        next: chain(&[2, 3, 4]),
    };
    assert_roundtrip(&engine, &list, b"{1,{2,{3,{4}}}}");
}

// Compiling the coders of a self-referential type from many threads at once
// must neither deadlock nor hand anyone a half-built coder.
#[test]
fn test_concurrent_first_compile() {
    let engine = Arc::new(Engine::new(SplitTag, framed_config()));
    thread::scope(|s| {
        for _ in 0..8 {
            let engine = engine.clone();
            s.spawn(move || {
                let list = Node {
                    v: 10,
                    next: chain(&[20, 30]),
                };
                let bytes = engine.marshal(&list).unwrap();
                assert_eq!(bytes, b"{10,{20,{30}}}");
                let mut decoded = Node { v: 0, next: None };
                engine.unmarshal(&bytes, &mut decoded).unwrap();
                assert_eq!(decoded, list);
            });
        }
    });
}
