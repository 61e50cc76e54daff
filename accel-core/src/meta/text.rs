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

use crate::error::Error;
use crate::types::{Endian, TextEncoding};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::borrow::Cow;

const ASCII_REPLACEMENT: u8 = b'?';

#[inline(always)]
fn put_u16(endian: Endian, buf: &mut [u8], unit: u16) {
    match endian {
        Endian::Little => LittleEndian::write_u16(buf, unit),
        Endian::Big => BigEndian::write_u16(buf, unit),
    }
}

#[inline(always)]
fn get_u16(endian: Endian, buf: &[u8]) -> u16 {
    match endian {
        Endian::Little => LittleEndian::read_u16(buf),
        Endian::Big => BigEndian::read_u16(buf),
    }
}

/// Encodes `s`, borrowing when the in-memory UTF-8 bytes are already the wire form.
pub fn encode_str(s: &str, encoding: TextEncoding, endian: Endian) -> Cow<'_, [u8]> {
    match encoding {
        TextEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
        TextEncoding::Ascii if s.is_ascii() => Cow::Borrowed(s.as_bytes()),
        TextEncoding::Ascii => Cow::Owned(
            s.chars()
                .map(|c| if c.is_ascii() { c as u8 } else { ASCII_REPLACEMENT })
                .collect(),
        ),
        TextEncoding::Unicode => {
            let mut out = vec![0u8; s.encode_utf16().count() * 2];
            for (unit, slot) in s.encode_utf16().zip(out.chunks_exact_mut(2)) {
                put_u16(endian, slot, unit);
            }
            Cow::Owned(out)
        }
    }
}

pub fn decode_str(bytes: &[u8], encoding: TextEncoding, endian: Endian) -> Result<String, Error> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::text_decode(format!("malformed UTF-8: {}", e))),
        TextEncoding::Ascii => {
            if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(Error::text_decode(format!(
                    "byte 0x{:02x} at {} is not ASCII",
                    bytes[pos], pos
                )));
            }
            // all bytes are ASCII and therefore valid UTF-8
            String::from_utf8(bytes.to_vec()).map_err(|e| Error::text_decode(e.to_string()))
        }
        TextEncoding::Unicode => {
            if bytes.len() % 2 != 0 {
                return Err(Error::text_decode(format!(
                    "UTF-16 payload has odd length {}",
                    bytes.len()
                )));
            }
            let units = bytes.chunks_exact(2).map(|c| get_u16(endian, c));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|e| Error::text_decode(format!("malformed UTF-16: {}", e)))
        }
    }
}

/// Writes `c` into `buf` and returns the used prefix.
pub fn encode_char(c: char, encoding: TextEncoding, endian: Endian, buf: &mut [u8; 4]) -> &[u8] {
    match encoding {
        TextEncoding::Utf8 => c.encode_utf8(buf).as_bytes(),
        TextEncoding::Ascii => {
            buf[0] = if c.is_ascii() { c as u8 } else { ASCII_REPLACEMENT };
            &buf[..1]
        }
        TextEncoding::Unicode => {
            let mut units = [0u16; 2];
            let n = c.encode_utf16(&mut units).len();
            for (i, unit) in units[..n].iter().enumerate() {
                put_u16(endian, &mut buf[i * 2..i * 2 + 2], *unit);
            }
            &buf[..n * 2]
        }
    }
}

pub fn decode_char(bytes: &[u8], encoding: TextEncoding, endian: Endian) -> Result<char, Error> {
    let s = decode_str(bytes, encoding, endian)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::text_decode(format!(
            "expected exactly one character in {} bytes",
            bytes.len()
        ))),
    }
}
