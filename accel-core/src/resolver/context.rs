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

use crate::buffer::{Reader, Writer};
use crate::config::{Config, DEFAULT_INITIAL_BUFFER_SIZE};
use crate::error::Error;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::Serializer;

pub struct WriteContext<'se> {
    pub writer: &'se mut Writer,
    registry: &'se TypeRegistry,
    config: &'se Config,
}

impl<'se> WriteContext<'se> {
    pub fn new(
        registry: &'se TypeRegistry,
        config: &'se Config,
        writer: &'se mut Writer,
    ) -> WriteContext<'se> {
        WriteContext {
            writer,
            registry,
            config,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'se TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> &'se Config {
        self.config
    }

    /// Encodes whatever `body` writes as one length-prefixed record.
    pub fn write_nested<F>(&mut self, body: F) -> Result<(), Error>
    where
        F: FnOnce(&mut WriteContext<'se>) -> Result<(), Error>,
    {
        self.write_nested_sized(DEFAULT_INITIAL_BUFFER_SIZE, body)
    }

    pub fn write_nested_sized<F>(&mut self, size_hint: usize, body: F) -> Result<(), Error>
    where
        F: FnOnce(&mut WriteContext<'se>) -> Result<(), Error>,
    {
        let mut scratch = self.writer.scratch(size_hint);
        std::mem::swap(&mut *self.writer, &mut scratch);
        let result = body(self);
        std::mem::swap(&mut *self.writer, &mut scratch);
        result?;
        self.writer.write_length_prefixed(scratch.as_slice());
        Ok(())
    }

    /// Encodes `value` through its registry binding.
    pub fn encode<T: Serializer>(&mut self, value: &T) -> Result<(), Error> {
        let registry = self.registry;
        registry.encode(value, self)
    }
}

pub struct ReadContext<'de, 'bf: 'de> {
    pub reader: Reader<'bf>,
    registry: &'de TypeRegistry,
    config: &'de Config,
    current_depth: u32,
}

impl<'de, 'bf: 'de> ReadContext<'de, 'bf> {
    pub fn new(
        registry: &'de TypeRegistry,
        config: &'de Config,
        reader: Reader<'bf>,
    ) -> ReadContext<'de, 'bf> {
        ReadContext {
            reader,
            registry,
            config,
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'de TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> &'de Config {
        self.config
    }

    #[inline(always)]
    pub fn depth(&self) -> u32 {
        self.current_depth
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.config.max_depth() {
            return Err(Error::depth_exceed(format!(
                "Maximum nesting depth ({}) exceeded. Current depth: {}.",
                self.config.max_depth(),
                self.current_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    /// Runs `body` over the payload of the next length-prefixed record.
    ///
    /// Null and default records give `body` an exhausted reader. The outer
    /// reader resumes after the record whether or not `body` consumed it all.
    pub fn read_nested<R, F>(&mut self, body: F) -> Result<R, Error>
    where
        F: FnOnce(&mut ReadContext<'de, 'bf>) -> Result<R, Error>,
    {
        let sub = self.reader.read_nested()?;
        self.inc_depth()?;
        let outer = std::mem::replace(&mut self.reader, sub);
        let result = body(self);
        self.reader = outer;
        self.dec_depth();
        result
    }

    /// Decodes a `T` through its registry binding.
    pub fn decode<T: Serializer>(&mut self) -> Result<T, Error> {
        let registry = self.registry;
        registry.decode(self)
    }
}
