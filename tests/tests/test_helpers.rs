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

//! Shared drivers and helpers for the integration tests. Each test file
//! pulls this in with `mod test_helpers;`.

#![allow(dead_code)]

use tagwire_core::buffer::{Reader, Writer};
use tagwire_core::coder::{Reflect, ReflectDefault};
use tagwire_core::config::Config;
use tagwire_core::engine::Engine;
use tagwire_core::error::Error;
use tagwire_core::tag::{Marshal, TagDriver, Unmarshal};

/// Framed, comma-separated configuration: `{a,b,c}`.
pub fn framed_config() -> Config {
    Config {
        struct_opener: b"{".to_vec(),
        struct_closer: b"}".to_vec(),
        unwrap_when_decoding: true,
        value_separator: b",".to_vec(),
        remove_separator_when_decoding: true,
    }
}

/// No framing, no separators.
pub fn plain_config() -> Config {
    Config::default()
}

/// Round-trips `value` through `engine`, asserting the encoded bytes on the
/// way.
pub fn assert_roundtrip<T>(engine: &Engine, value: &T, expect: &[u8])
where
    T: Reflect + ReflectDefault + PartialEq + std::fmt::Debug,
{
    let bytes = engine.marshal(value).expect("marshal");
    assert_eq!(bytes, expect, "encoded bytes mismatch");
    let mut decoded = T::reflect_default();
    engine.unmarshal(&bytes, &mut decoded).expect("unmarshal");
    assert_eq!(&decoded, value, "round-trip mismatch");
}

fn scan_until_delimiter(buf: &mut Reader, out: &mut Writer) {
    let bytes = buf.bytes();
    let end = bytes
        .iter()
        .position(|b| matches!(b, b',' | b'}'))
        .unwrap_or(bytes.len());
    let mut value = &bytes[..end];
    while value.first() == Some(&b' ') {
        value = &value[1..];
    }
    while value.last() == Some(&b' ') {
        value = &value[..value.len() - 1];
    }
    out.write_bytes(value);
    buf.advance(end);
}

/// Annotation payload of [`SplitTag`] and [`OverrideTag`].
#[derive(Default)]
pub struct SplitMeta {
    /// The field holds a nested framed record; announce it with a presence
    /// marker and let the engine consume the frame.
    pub nested: bool,
}

fn parse_split(tag_value: &str, meta: &mut SplitMeta) -> bool {
    let mut omit_empty = false;
    for token in tag_value.split(',') {
        match token {
            "rec" => meta.nested = true,
            "omitempty" => omit_empty = true,
            // Any other token is the field's label, which this syntax does
            // not use.
            _ => {}
        }
    }
    omit_empty
}

fn decode_split(meta: Option<&SplitMeta>, buf: &mut Reader, out: &mut Writer) {
    if meta.is_some_and(|m| m.nested) {
        if buf.starts_with(b"{") {
            out.write_u8(b'{');
        }
        return;
    }
    scan_until_delimiter(buf, out);
}

/// Round-trip driver for framed/separated configurations: values are
/// written verbatim and read up to the next `,` or `}`.
pub struct SplitTag;

impl TagDriver for SplitTag {
    type Meta = SplitMeta;

    fn name(&self) -> &'static str {
        "split"
    }

    fn parse(&self, tag_value: &str, meta: &mut SplitMeta) -> Result<bool, Error> {
        Ok(parse_split(tag_value, meta))
    }

    fn encode(
        &self,
        _field_name: &str,
        _meta: Option<&SplitMeta>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error> {
        out.write_bytes(data);
        Ok(())
    }

    fn decode(
        &self,
        _field_name: &str,
        meta: Option<&SplitMeta>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error> {
        decode_split(meta, buf, out);
        Ok(())
    }
}

/// [`SplitTag`] plus acceptance of the whole-value overrides.
pub struct OverrideTag;

impl TagDriver for OverrideTag {
    type Meta = SplitMeta;

    fn name(&self) -> &'static str {
        "over"
    }

    fn parse(&self, tag_value: &str, meta: &mut SplitMeta) -> Result<bool, Error> {
        Ok(parse_split(tag_value, meta))
    }

    fn encode(
        &self,
        _field_name: &str,
        _meta: Option<&SplitMeta>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error> {
        out.write_bytes(data);
        Ok(())
    }

    fn decode(
        &self,
        _field_name: &str,
        meta: Option<&SplitMeta>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error> {
        decode_split(meta, buf, out);
        Ok(())
    }

    fn is_marshaller<'a>(&self, v: &'a dyn Marshal) -> Option<&'a dyn Marshal> {
        Some(v)
    }

    fn is_unmarshaler<'a>(&self, v: &'a mut dyn Unmarshal) -> Option<&'a mut dyn Unmarshal> {
        Some(v)
    }
}

/// Lexical shape of a field under [`ShapeTag`].
#[derive(Clone, Copy, Default)]
pub enum Shape {
    Int,
    Uint,
    Float,
    Bool,
    #[default]
    Text,
    Bytes,
}

/// Round-trip driver for unseparated configurations: the annotation names
/// the field's lexical shape and decoding scans exactly that shape.
pub struct ShapeTag;

impl TagDriver for ShapeTag {
    type Meta = Shape;

    fn name(&self) -> &'static str {
        "shape"
    }

    fn parse(&self, tag_value: &str, meta: &mut Shape) -> Result<bool, Error> {
        let mut omit_empty = false;
        let mut tokens = tag_value.split(',');
        match tokens.next() {
            Some("int") => *meta = Shape::Int,
            Some("uint") => *meta = Shape::Uint,
            Some("float") => *meta = Shape::Float,
            Some("bool") => *meta = Shape::Bool,
            Some("text") => *meta = Shape::Text,
            Some("bytes") => *meta = Shape::Bytes,
            other => {
                return Err(Error::message(format!(
                    "unknown field shape {:?}",
                    other.unwrap_or("")
                )))
            }
        }
        for token in tokens {
            if token == "omitempty" {
                omit_empty = true;
            }
        }
        Ok(omit_empty)
    }

    fn encode(
        &self,
        _field_name: &str,
        _meta: Option<&Shape>,
        data: &[u8],
        out: &mut Writer,
    ) -> Result<(), Error> {
        out.write_bytes(data);
        Ok(())
    }

    fn decode(
        &self,
        _field_name: &str,
        meta: Option<&Shape>,
        buf: &mut Reader,
        out: &mut Writer,
    ) -> Result<(), Error> {
        let shape = meta.copied().unwrap_or_default();
        let bytes = buf.bytes();
        let end = match shape {
            Shape::Int => scan_signed(bytes),
            Shape::Uint => scan_digits(bytes, 0),
            Shape::Float => scan_float(bytes),
            Shape::Bool => scan_bool(bytes),
            Shape::Text => scan_text(bytes),
            Shape::Bytes => bytes.len(),
        };
        out.write_bytes(&bytes[..end]);
        buf.advance(end);
        Ok(())
    }
}

fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    end
}

fn scan_signed(bytes: &[u8]) -> usize {
    let signed = matches!(bytes.first(), Some(b'+') | Some(b'-'));
    let start = usize::from(signed);
    let end = scan_digits(bytes, start);
    // A lone sign is not a number.
    if end == start {
        0
    } else {
        end
    }
}

fn scan_float(bytes: &[u8]) -> usize {
    let mut end = 0;
    while bytes
        .get(end)
        .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        end += 1;
    }
    end
}

fn scan_bool(bytes: &[u8]) -> usize {
    if bytes.starts_with(b"true") {
        4
    } else if bytes.starts_with(b"false") {
        5
    } else {
        0
    }
}

fn scan_text(bytes: &[u8]) -> usize {
    let mut end = 0;
    loop {
        let rest = &bytes[end..];
        if rest.starts_with(b"true") || rest.starts_with(b"false") {
            break;
        }
        match rest.first() {
            Some(b) if b.is_ascii_alphabetic() => end += 1,
            _ => break,
        }
    }
    end
}
