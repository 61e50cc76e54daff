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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{AccelDefault, Serializer};
use crate::types::{FieldOptions, NumberFormat, WireKind};
use crate::util::EPOCH;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use std::mem;
use std::time::Duration;
use uuid::Uuid;

const NANOS_PER_SEC: u128 = 1_000_000_000;

impl Serializer for NaiveDateTime {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        let dt = self.and_utc();
        let micros = dt.timestamp() * 1_000_000 + dt.timestamp_subsec_micros() as i64;
        context.writer.write_integer(micros, options.number);
        Ok(())
    }

    fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
        let micros = context.reader.read_integer::<i64>()?;
        EPOCH
            .and_time(NaiveTime::default())
            .checked_add_signed(TimeDelta::microseconds(micros))
            .ok_or_else(|| Error::invalid_data(format!("timestamp {}us is out of range", micros)))
    }

    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        WireKind::integer(64, options.number)
    }

    fn accel_reserved_space() -> usize {
        mem::size_of::<i64>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

const INSTANT_INDEX: u32 = 1;
const OFFSET_INDEX: u32 = 2;

/// One length-prefixed record holding the UTC instant at index 1 and the
/// offset in seconds east of UTC at index 2.
impl Serializer for DateTime<FixedOffset> {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        context.write_nested_sized(Self::accel_reserved_space(), |context| {
            context.writer.write_index(INSTANT_INDEX);
            self.naive_utc().accel_write(context, options)?;
            context.writer.write_index(OFFSET_INDEX);
            context
                .writer
                .write_integer(self.offset().local_minus_utc(), options.number);
            Ok(())
        })
    }

    fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
        context.read_nested(|context| {
            let mut instant = NaiveDateTime::accel_default();
            let mut offset_secs = 0i32;
            while let Some(index) = context.reader.next_index()? {
                match index {
                    INSTANT_INDEX => instant = NaiveDateTime::accel_read(context, options)?,
                    OFFSET_INDEX => offset_secs = context.reader.read_integer::<i32>()?,
                    _ => context.reader.skip_next()?,
                }
            }
            let offset = FixedOffset::east_opt(offset_secs).ok_or_else(|| {
                Error::invalid_data(format!("utc offset of {}s is out of range", offset_secs))
            })?;
            Ok(offset.from_utc_datetime(&instant))
        })
    }

    fn accel_wire_kind(_: &FieldOptions) -> WireKind {
        WireKind::Complex
    }

    fn accel_reserved_space() -> usize {
        2 + NaiveDateTime::accel_reserved_space() + 1 + mem::size_of::<i32>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Always a fixed 128-bit record; the nil id is the default.
impl Serializer for Uuid {
    fn accel_write(&self, context: &mut WriteContext, _: &FieldOptions) -> Result<(), Error> {
        context.writer.write_integer(self.as_u128(), NumberFormat::Fixed);
        Ok(())
    }

    fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
        Ok(Uuid::from_u128(context.reader.read_integer::<u128>()?))
    }

    fn accel_wire_kind(_: &FieldOptions) -> WireKind {
        WireKind::integer(128, NumberFormat::Fixed)
    }

    fn accel_reserved_space() -> usize {
        mem::size_of::<u128>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Serializer for NaiveDate {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        let days_since_epoch = self.signed_duration_since(EPOCH).num_days();
        context.writer.write_integer(days_since_epoch as i32, options.number);
        Ok(())
    }

    fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
        let days = context.reader.read_integer::<i32>()?;
        EPOCH
            .checked_add_signed(TimeDelta::days(days as i64))
            .ok_or_else(|| Error::invalid_data(format!("date {} days from epoch is out of range", days)))
    }

    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        WireKind::integer(32, options.number)
    }

    fn accel_reserved_space() -> usize {
        mem::size_of::<i32>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Written as whole nanoseconds in an `i128`, which covers the full `TimeDelta` range.
impl Serializer for TimeDelta {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        let nanos = self.num_seconds() as i128 * NANOS_PER_SEC as i128 + self.subsec_nanos() as i128;
        context.writer.write_integer(nanos, options.number);
        Ok(())
    }

    fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
        let nanos = context.reader.read_integer::<i128>()?;
        let secs = nanos.div_euclid(NANOS_PER_SEC as i128);
        let subsec = nanos.rem_euclid(NANOS_PER_SEC as i128) as u32;
        i64::try_from(secs)
            .ok()
            .and_then(|secs| TimeDelta::new(secs, subsec))
            .ok_or_else(|| Error::invalid_data(format!("duration of {}ns is out of range", nanos)))
    }

    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        WireKind::integer(128, options.number)
    }

    fn accel_reserved_space() -> usize {
        mem::size_of::<i128>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Serializer for Duration {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        context.writer.write_integer(self.as_nanos(), options.number);
        Ok(())
    }

    fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
        let nanos = context.reader.read_integer::<u128>()?;
        let secs = u64::try_from(nanos / NANOS_PER_SEC)
            .map_err(|_| Error::invalid_data(format!("duration of {}ns overflows", nanos)))?;
        Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
    }

    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        WireKind::integer(128, options.number)
    }

    fn accel_reserved_space() -> usize {
        mem::size_of::<u128>() + 1
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl AccelDefault for NaiveDateTime {
    fn accel_default() -> Self {
        NaiveDateTime::default()
    }
}

impl AccelDefault for DateTime<FixedOffset> {
    fn accel_default() -> Self {
        DateTime::<FixedOffset>::default()
    }
}

impl AccelDefault for Uuid {
    fn accel_default() -> Self {
        Uuid::nil()
    }
}

impl AccelDefault for NaiveDate {
    fn accel_default() -> Self {
        NaiveDate::default()
    }
}

impl AccelDefault for TimeDelta {
    fn accel_default() -> Self {
        TimeDelta::zero()
    }
}

impl AccelDefault for Duration {
    fn accel_default() -> Self {
        Duration::ZERO
    }
}
