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

//! Record-level writer and reader.
//!
//! A record is `[VarUint serial_index]? tag payload?`. The writer only ever
//! appends; nested values are encoded into a scratch writer from the same
//! allocator and copied behind their length prefix.

use crate::config::DEFAULT_INITIAL_BUFFER_SIZE;
use crate::error::Error;
use crate::memory::{NativeMemory, SlabAllocator};
use crate::meta::tag::{self, Integral, Tag};
use crate::meta::text;
use crate::types::{Category, Endian, Float128, NumberFormat, TextEncoding};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io;
use std::sync::Arc;

macro_rules! endian_call {
    ($endian:expr, $method:ident($($arg:expr),*)) => {
        match $endian {
            Endian::Little => LittleEndian::$method($($arg),*),
            Endian::Big => BigEndian::$method($($arg),*),
        }
    };
}

pub struct Writer {
    memory: NativeMemory,
    endian: Endian,
}

impl Default for Writer {
    fn default() -> Self {
        Writer::with_capacity(
            SlabAllocator::shared(),
            DEFAULT_INITIAL_BUFFER_SIZE,
            Endian::Little,
        )
    }
}

impl Writer {
    pub fn with_capacity(allocator: Arc<SlabAllocator>, size: usize, endian: Endian) -> Writer {
        Writer {
            memory: NativeMemory::allocate(allocator, size),
            endian,
        }
    }

    pub fn try_with_capacity(
        allocator: Arc<SlabAllocator>,
        size: usize,
        endian: Endian,
    ) -> Result<Writer, Error> {
        Ok(Writer {
            memory: NativeMemory::try_allocate(allocator, size)?,
            endian,
        })
    }

    /// An empty writer sharing this writer's allocator and byte order.
    pub fn scratch(&self, size: usize) -> Writer {
        Writer::with_capacity(self.memory.allocator().clone(), size, self.endian)
    }

    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.memory.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn to_owned_bytes(&self) -> Vec<u8> {
        self.memory.as_slice().to_vec()
    }

    pub fn write_all_to<W: io::Write>(&self, mut sink: W) -> io::Result<()> {
        sink.write_all(self.memory.as_slice())
    }

    /// Copies the written bytes into `dst`, returning the count.
    pub fn copy_to_slice(&self, dst: &mut [u8]) -> Result<usize, Error> {
        let src = self.memory.as_slice();
        if dst.len() < src.len() {
            return Err(Error::invalid_data(format!(
                "destination holds {} bytes, {} needed",
                dst.len(),
                src.len()
            )));
        }
        dst[..src.len()].copy_from_slice(src);
        Ok(src.len())
    }

    /// Returns the region to its allocator. Dropping the writer does the same.
    pub fn dispose(self) {}

    pub fn reserve(&mut self, additional: usize) {
        self.memory.reserve(additional);
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.memory.push(value);
    }

    #[inline(always)]
    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.memory.extend_from_slice(v);
        v.len()
    }

    pub fn write_var_uint32(&mut self, value: u32) {
        if value < 0x80 {
            self.write_u8(value as u8);
        } else if value < 0x4000 {
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (value >> 7) as u8;
            self.write_bytes(&[u1, u2]);
        } else if value < 0x200000 {
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (value >> 14) as u8;
            self.write_bytes(&[u1, u2, u3]);
        } else if value < 0x10000000 {
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (((value >> 14) as u8) & 0x7F) | 0x80;
            let u4 = (value >> 21) as u8;
            self.write_bytes(&[u1, u2, u3, u4]);
        } else {
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (((value >> 14) as u8) & 0x7F) | 0x80;
            let u4 = (((value >> 21) as u8) & 0x7F) | 0x80;
            let u5 = (value >> 28) as u8;
            self.write_bytes(&[u1, u2, u3, u4, u5]);
        }
    }

    pub fn write_var_uint64(&mut self, mut value: u64) {
        if value <= u32::MAX as u64 {
            return self.write_var_uint32(value as u32);
        }
        let mut buf = [0u8; 10];
        let mut n = 0;
        while value >= 0x80 {
            buf[n] = (value as u8) | 0x80;
            value >>= 7;
            n += 1;
        }
        buf[n] = value as u8;
        self.write_bytes(&buf[..=n]);
    }

    #[inline(always)]
    pub fn write_index(&mut self, serial_index: u32) {
        self.write_var_uint32(serial_index);
    }

    #[inline(always)]
    pub fn write_tag(&mut self, tag: Tag) {
        self.write_u8(tag.byte());
    }

    /// The null tag of an absent nullable value.
    #[inline(always)]
    pub fn write_null(&mut self) {
        self.write_tag(Tag::NULL);
    }

    #[inline(always)]
    pub fn write_default(&mut self) {
        self.write_tag(Tag::DEFAULT);
    }

    pub fn write_integer<T: Integral>(&mut self, value: T, format: NumberFormat) {
        let tag = tag::classify_integer(value, format);
        self.write_tag(tag);
        let width = tag.width();
        if width == 0 {
            return;
        }
        let mut buf = [0u8; 16];
        let bits = value.widen();
        if T::SIGNED {
            endian_call!(self.endian, write_int128(&mut buf[..width], bits as i128, width));
        } else {
            endian_call!(self.endian, write_uint128(&mut buf[..width], bits, width));
        }
        self.write_bytes(&buf[..width]);
    }

    pub fn write_f32(&mut self, value: f32) {
        let tag = tag::classify_f32(value);
        self.write_tag(tag);
        if tag.has_payload() {
            let mut buf = [0u8; 4];
            endian_call!(self.endian, write_f32(&mut buf, value));
            self.write_bytes(&buf);
        }
    }

    pub fn write_f64(&mut self, value: f64) {
        let tag = tag::classify_f64(value);
        self.write_tag(tag);
        if tag.has_payload() {
            let mut buf = [0u8; 8];
            endian_call!(self.endian, write_f64(&mut buf, value));
            self.write_bytes(&buf);
        }
    }

    pub fn write_f128(&mut self, value: Float128) {
        let tag = tag::classify_f128(value);
        self.write_tag(tag);
        if tag.has_payload() {
            let mut buf = [0u8; 16];
            endian_call!(self.endian, write_u128(&mut buf, value.bits));
            self.write_bytes(&buf);
        }
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) {
        self.write_tag(tag::classify_bool(value));
    }

    pub fn write_char(&mut self, value: char, encoding: TextEncoding) {
        let tag = tag::classify_char(value, encoding);
        self.write_tag(tag);
        if tag.has_payload() {
            let mut buf = [0u8; 4];
            let bytes = text::encode_char(value, encoding, self.endian, &mut buf);
            self.write_bytes(bytes);
        }
    }

    pub fn write_str(&mut self, value: &str, encoding: TextEncoding) {
        let tag = tag::classify_str(Some(value));
        self.write_tag(tag);
        if tag.has_payload() {
            let bytes = text::encode_str(value, encoding, self.endian);
            self.write_var_uint32(bytes.len() as u32);
            self.write_bytes(&bytes);
        }
    }

    /// Writes `payload` as one length-prefixed record, or the default tag when empty.
    pub fn write_length_prefixed(&mut self, payload: &[u8]) {
        if payload.is_empty() {
            self.write_default();
            return;
        }
        self.write_tag(Tag::LENGTH_PREFIXED);
        self.write_var_uint32(payload.len() as u32);
        self.write_bytes(payload);
    }

    /// Encodes a sub-record through `body` and writes it length-prefixed.
    pub fn write_nested<F>(&mut self, body: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Writer) -> Result<(), Error>,
    {
        let mut inner = self.scratch(DEFAULT_INITIAL_BUFFER_SIZE);
        body(&mut inner)?;
        self.write_length_prefixed(inner.as_slice());
        Ok(())
    }
}

/// Cursor over a byte range holding a sequence of records.
///
/// The reader only moves forward; it is exhausted once the cursor reaches
/// the end of its range.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'bf> {
    bf: &'bf [u8],
    cursor: usize,
    end: usize,
    endian: Endian,
}

impl<'bf> Reader<'bf> {
    pub fn new(bf: &'bf [u8], endian: Endian) -> Reader<'bf> {
        Reader {
            bf,
            cursor: 0,
            end: bf.len(),
            endian,
        }
    }

    pub fn with_range(
        bf: &'bf [u8],
        start: usize,
        length: usize,
        endian: Endian,
    ) -> Result<Reader<'bf>, Error> {
        let end = start
            .checked_add(length)
            .filter(|end| *end <= bf.len())
            .ok_or_else(|| Error::truncated_stream(start, length, bf.len()))?;
        Ok(Reader {
            bf,
            cursor: start,
            end,
            endian,
        })
    }

    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    #[inline(always)]
    pub fn has_next(&self) -> bool {
        self.cursor < self.end
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        !self.has_next()
    }

    #[inline(always)]
    fn check_bound(&self, n: usize) -> Result<(), Error> {
        if n > self.end - self.cursor {
            return Err(Error::truncated_stream(self.cursor, n, self.end));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'bf [u8], Error> {
        self.check_bound(len)?;
        let s = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(s)
    }

    #[inline(always)]
    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.check_bound(len)?;
        self.cursor += len;
        Ok(())
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.check_bound(1)?;
        let b = self.bf[self.cursor];
        self.cursor += 1;
        Ok(b)
    }

    pub fn read_var_uint32(&mut self) -> Result<u32, Error> {
        let mut result = 0u32;
        for i in 0..5 {
            let b = self.read_u8()? as u32;
            if i == 4 {
                if b > 0x0F {
                    return Err(Error::invalid_data("VarUint32 overflows 32 bits"));
                }
                return Ok(result | (b << 28));
            }
            result |= (b & 0x7F) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        Ok(result)
    }

    pub fn read_var_uint64(&mut self) -> Result<u64, Error> {
        let mut result = 0u64;
        for i in 0..10 {
            let b = self.read_u8()? as u64;
            if i == 9 {
                if b > 0x01 {
                    return Err(Error::invalid_data("VarUint64 overflows 64 bits"));
                }
                return Ok(result | (b << 63));
            }
            result |= (b & 0x7F) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        Ok(result)
    }

    /// Reads the serial index of the next record, or `None` at the end of the range.
    pub fn next_index(&mut self) -> Result<Option<u32>, Error> {
        if !self.has_next() {
            return Ok(None);
        }
        self.read_var_uint32().map(Some)
    }

    pub fn peek_tag(&self) -> Result<Tag, Error> {
        self.check_bound(1)?;
        Tag::from_byte(self.bf[self.cursor])
    }

    pub fn read_tag(&mut self) -> Result<Tag, Error> {
        let tag = self.peek_tag()?;
        self.cursor += 1;
        Ok(tag)
    }

    /// Skips one record's tag and payload. The serial index, if any, must
    /// already have been consumed.
    pub fn skip_next(&mut self) -> Result<(), Error> {
        let tag = self.read_tag()?;
        if !tag.has_payload() {
            return Ok(());
        }
        match tag.category() {
            Category::LengthPrefixed => {
                let len = self.read_var_uint32()? as usize;
                self.skip(len)
            }
            category => self.skip(category.width()),
        }
    }

    /// Reads `width` payload bytes as a sign- or zero-extended integer.
    fn read_payload_bits(&mut self, width: usize, signed: bool) -> Result<u128, Error> {
        let bytes = self.read_bytes(width)?;
        Ok(if signed {
            endian_call!(self.endian, read_int128(bytes, width)) as u128
        } else {
            endian_call!(self.endian, read_uint128(bytes, width))
        })
    }

    pub fn read_integer<T: Integral>(&mut self) -> Result<T, Error> {
        let tag = self.read_tag()?;
        if !tag.has_payload() {
            return match tag.category() {
                Category::Missing => Ok(T::ZERO),
                category => Err(Error::invalid_tag(format!(
                    "{:?} without payload is not an integer",
                    category
                ))),
            };
        }
        let category = tag.category();
        if !category.is_fixed() {
            return Err(Error::invalid_tag(format!(
                "expected a fixed-width integer, found {:?}",
                category
            )));
        }
        let bits = self.read_payload_bits(category.width(), T::SIGNED)?;
        T::narrow(bits).ok_or_else(|| {
            Error::invalid_data(format!(
                "integer {:#x} in {:?} does not fit {}",
                bits,
                category,
                std::any::type_name::<T>()
            ))
        })
    }

    fn expect_fixed(&mut self, expected: &[Category], what: &str) -> Result<Option<Category>, Error> {
        let tag = self.read_tag()?;
        if !tag.has_payload() && tag.category() == Category::Missing {
            return Ok(None);
        }
        let category = tag.category();
        if tag.has_payload() && expected.contains(&category) {
            return Ok(Some(category));
        }
        Err(Error::invalid_tag(format!("expected {}, found {:?}", what, tag)))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        match self.expect_fixed(&[Category::Fixed32], "float32")? {
            None => Ok(0.0),
            Some(_) => Ok(endian_call!(self.endian, read_f32(self.read_bytes(4)?))),
        }
    }

    /// Accepts a float32 payload and widens it.
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        match self.expect_fixed(&[Category::Fixed64, Category::Fixed32], "float64")? {
            None => Ok(0.0),
            Some(Category::Fixed32) => {
                Ok(endian_call!(self.endian, read_f32(self.read_bytes(4)?)) as f64)
            }
            Some(_) => Ok(endian_call!(self.endian, read_f64(self.read_bytes(8)?))),
        }
    }

    pub fn read_f128(&mut self) -> Result<Float128, Error> {
        match self.expect_fixed(&[Category::Fixed128], "float128")? {
            None => Ok(Float128::ZERO),
            Some(_) => Ok(Float128::from_bits(endian_call!(
                self.endian,
                read_u128(self.read_bytes(16)?)
            ))),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let tag = self.read_tag()?;
        if tag == Tag::TRUE {
            return Ok(true);
        }
        match tag.category() {
            Category::Missing => Ok(false),
            // an explicit one-byte payload is accepted as well
            Category::Fixed8 if tag.has_payload() => Ok(self.read_u8()? != 0),
            _ => Err(Error::invalid_tag(format!("expected boolean, found {:?}", tag))),
        }
    }

    pub fn read_char(&mut self, encoding: TextEncoding) -> Result<char, Error> {
        let tag = self.read_tag()?;
        if !tag.has_payload() {
            return match tag.category() {
                Category::Missing => Ok('\0'),
                _ => Err(Error::invalid_tag(format!("expected char, found {:?}", tag))),
            };
        }
        let width = tag.width();
        if width == 0 || width > 4 {
            return Err(Error::invalid_tag(format!("expected char, found {:?}", tag)));
        }
        let bytes = self.read_bytes(width)?;
        text::decode_char(bytes, encoding, self.endian)
    }

    /// Returns the payload of a length-prefixed record, `None` for the null
    /// tag and an empty slice for the default tag.
    pub fn read_length_prefixed(&mut self) -> Result<Option<&'bf [u8]>, Error> {
        let tag = self.read_tag()?;
        if tag.is_null() {
            return Ok(None);
        }
        if !tag.has_payload() && tag.category() == Category::Missing {
            return Ok(Some(&[]));
        }
        if tag != Tag::LENGTH_PREFIXED {
            return Err(Error::invalid_tag(format!(
                "expected LengthPrefixed, found {:?}",
                tag
            )));
        }
        let len = self.read_var_uint32()? as usize;
        self.read_bytes(len).map(Some)
    }

    /// Reads a string record; the null tag yields `None`.
    pub fn read_string_opt(&mut self, encoding: TextEncoding) -> Result<Option<String>, Error> {
        match self.read_length_prefixed()? {
            None => Ok(None),
            Some(bytes) => text::decode_str(bytes, encoding, self.endian).map(Some),
        }
    }

    /// Reads a string record; the null tag yields the empty string.
    pub fn read_string(&mut self, encoding: TextEncoding) -> Result<String, Error> {
        Ok(self.read_string_opt(encoding)?.unwrap_or_default())
    }

    /// A reader over the payload of the next length-prefixed record. Null and
    /// default records yield an exhausted reader.
    pub fn read_nested(&mut self) -> Result<Reader<'bf>, Error> {
        let start = self.cursor;
        let payload = self.read_length_prefixed()?.unwrap_or(&[]);
        let offset = self.cursor - payload.len();
        if payload.is_empty() {
            return Reader::with_range(self.bf, start, 0, self.endian);
        }
        Reader::with_range(self.bf, offset, payload.len(), self.endian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(endian: Endian) -> Writer {
        Writer::with_capacity(SlabAllocator::shared(), 8, endian)
    }

    #[test]
    fn var_uint_boundaries() {
        let mut w = Writer::default();
        let values = [0u32, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0FFF_FFFF, 0x1000_0000, u32::MAX];
        for v in values {
            w.write_var_uint32(v);
        }
        w.write_var_uint64(u64::MAX);
        w.write_var_uint64(1 << 35);
        let bytes = w.to_owned_bytes();
        let mut r = Reader::new(&bytes, Endian::Little);
        for v in values {
            assert_eq!(r.read_var_uint32().unwrap(), v);
        }
        assert_eq!(r.read_var_uint64().unwrap(), u64::MAX);
        assert_eq!(r.read_var_uint64().unwrap(), 1 << 35);
        assert!(r.is_exhausted());
    }

    #[test]
    fn variant_integer_payload_is_raw_width() {
        let mut w = writer(Endian::Little);
        w.write_index(1);
        w.write_integer(300i32, NumberFormat::Variant);
        assert_eq!(w.as_slice(), &[0x01, 0x02, 0x2C, 0x01]);

        let mut w = writer(Endian::Big);
        w.write_integer(300i32, NumberFormat::Variant);
        assert_eq!(w.as_slice(), &[0x02, 0x01, 0x2C]);
    }

    #[test]
    fn negative_values_sign_extend() {
        let mut w = writer(Endian::Little);
        w.write_integer(-2i64, NumberFormat::Variant);
        w.write_integer(-300i32, NumberFormat::Fixed);
        let bytes = w.to_owned_bytes();
        assert_eq!(&bytes[..2], &[0x01, 0xFE]);
        let mut r = Reader::new(&bytes, Endian::Little);
        assert_eq!(r.read_integer::<i64>().unwrap(), -2);
        assert_eq!(r.read_integer::<i32>().unwrap(), -300);
    }

    #[test]
    fn narrowing_is_range_checked() {
        let mut w = writer(Endian::Little);
        w.write_integer(70_000u32, NumberFormat::Fixed);
        let bytes = w.to_owned_bytes();
        assert!(matches!(
            Reader::new(&bytes, Endian::Little).read_integer::<u16>(),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(Reader::new(&bytes, Endian::Little).read_integer::<u64>().unwrap(), 70_000);
    }

    #[test]
    fn truncated_payload_is_reported() {
        let bytes = [0x04u8, 0x01, 0x02];
        let mut r = Reader::new(&bytes, Endian::Little);
        assert!(matches!(r.read_integer::<i32>(), Err(Error::TruncatedStream(..))));

        let bytes = [0x0Fu8, 0x05, b'a'];
        let mut r = Reader::new(&bytes, Endian::Little);
        assert!(matches!(r.skip_next(), Err(Error::TruncatedStream(..))));
    }

    #[test]
    fn skip_next_consumes_exactly_one_record() {
        let mut w = writer(Endian::Little);
        w.write_integer(123_456i64, NumberFormat::Fixed);
        w.write_bool(true);
        w.write_str("skipped", TextEncoding::Utf8);
        w.write_f64(0.0);
        w.write_char('x', TextEncoding::Unicode);
        w.write_u8(0x2A);
        let bytes = w.to_owned_bytes();
        let mut r = Reader::new(&bytes, Endian::Little);
        for _ in 0..5 {
            r.skip_next().unwrap();
        }
        assert_eq!(r.read_u8().unwrap(), 0x2A);
        assert!(r.is_exhausted());
    }

    #[test]
    fn strings_distinguish_null_and_empty() {
        let mut w = writer(Endian::Little);
        w.write_null();
        w.write_str("", TextEncoding::Utf8);
        w.write_str("hi", TextEncoding::Ascii);
        let bytes = w.to_owned_bytes();
        assert_eq!(bytes, vec![0x00, 0x10, 0x0F, 0x02, b'h', b'i']);
        let mut r = Reader::new(&bytes, Endian::Little);
        assert_eq!(r.read_string_opt(TextEncoding::Utf8).unwrap(), None);
        assert_eq!(r.read_string_opt(TextEncoding::Utf8).unwrap(), Some(String::new()));
        assert_eq!(r.read_string(TextEncoding::Ascii).unwrap(), "hi");
    }

    #[test]
    fn nested_records_get_their_own_range() {
        let mut w = writer(Endian::Little);
        w.write_nested(|inner| {
            inner.write_index(1);
            inner.write_integer(7u8, NumberFormat::Fixed);
            Ok(())
        })
        .unwrap();
        w.write_nested(|_| Ok(())).unwrap();
        w.write_bool(true);
        let bytes = w.to_owned_bytes();
        assert_eq!(bytes, vec![0x0F, 0x03, 0x01, 0x01, 0x07, 0x10, 0x21]);

        let mut r = Reader::new(&bytes, Endian::Little);
        let mut sub = r.read_nested().unwrap();
        assert_eq!(sub.next_index().unwrap(), Some(1));
        assert_eq!(sub.read_integer::<u8>().unwrap(), 7);
        assert_eq!(sub.next_index().unwrap(), None);
        let empty = r.read_nested().unwrap();
        assert!(empty.is_exhausted());
        assert!(r.read_bool().unwrap());
    }

    #[test]
    fn with_range_is_bounds_checked() {
        let bytes = [0u8; 4];
        assert!(Reader::with_range(&bytes, 2, 2, Endian::Little).is_ok());
        assert!(matches!(
            Reader::with_range(&bytes, 3, 2, Endian::Little),
            Err(Error::TruncatedStream(..))
        ));
    }

    #[test]
    fn growth_keeps_previous_bytes() {
        let mut w = writer(Endian::Little);
        for i in 0..1000u32 {
            w.write_var_uint32(i);
        }
        let bytes = w.to_owned_bytes();
        let mut r = Reader::new(&bytes, Endian::Little);
        for i in 0..1000u32 {
            assert_eq!(r.read_var_uint32().unwrap(), i);
        }
        let mut out = vec![0u8; bytes.len()];
        assert_eq!(w.copy_to_slice(&mut out).unwrap(), bytes.len());
        assert!(w.copy_to_slice(&mut [0u8; 2]).is_err());
        w.dispose();
    }
}
