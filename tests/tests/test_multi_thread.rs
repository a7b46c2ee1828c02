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
use test_helpers::{framed_config, SplitTag};

#[derive(Record, Debug, PartialEq)]
struct Job {
    #[tag(split = "id")]
    pub id: u64,
    #[tag(split = "name")]
    pub name: String,
    #[tag(split = "done")]
    pub done: bool,
}

// One engine shared across threads, each round-tripping its own values.
#[test]
fn test_shared_engine_round_trips() {
    let engine = Arc::new(Engine::new(SplitTag, framed_config()));
    thread::scope(|s| {
        for t in 0..8u64 {
            let engine = engine.clone();
            s.spawn(move || {
                for i in 0..50u64 {
                    let job = Job {
                        id: t * 1000 + i,
                        name: format!("job{t}x{i}"),
                        done: i % 2 == 0,
                    };
                    let bytes = engine.marshal(&job).unwrap();
                    let mut decoded = Job {
                        id: 0,
                        name: String::new(),
                        done: false,
                    };
                    engine.unmarshal(&bytes, &mut decoded).unwrap();
                    assert_eq!(decoded, job);
                }
            });
        }
    });
}

// Two engines over the same driver type share compiled coders; their
// configurations stay independent because framing is read per call.
#[test]
fn test_engines_share_coders_not_config() {
    let framed = Engine::new(SplitTag, framed_config());
    let mut separated_only = framed_config();
    separated_only.struct_opener.clear();
    separated_only.struct_closer.clear();
    separated_only.unwrap_when_decoding = false;
    let bare = Engine::new(SplitTag, separated_only);

    let job = Job {
        id: 7,
        name: String::from("seven"),
        done: true,
    };
    assert_eq!(framed.marshal(&job).unwrap(), b"{7,seven,true}");
    assert_eq!(bare.marshal(&job).unwrap(), b"7,seven,true");
}
