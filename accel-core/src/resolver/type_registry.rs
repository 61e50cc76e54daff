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

use super::context::{ReadContext, WriteContext};
use super::dispatch::FieldDispatch;
use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::serializer::{Serializer, StructSerializer};
use crate::types::{FieldOptions, Float128, TypeShape};
use crate::util::Spinlock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub type EncodeFn = fn(&dyn Any, &mut WriteContext, &TypeBinding) -> Result<(), Error>;
pub type DecodeFn = fn(&mut ReadContext, &TypeBinding) -> Result<Box<dyn Any>, Error>;

#[derive(Clone, Copy)]
pub struct Harness {
    encode_fn: EncodeFn,
    decode_fn: DecodeFn,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("encode_fn", &(self.encode_fn as *const ()))
            .field("decode_fn", &(self.decode_fn as *const ()))
            .finish()
    }
}

impl Harness {
    pub fn new(encode_fn: EncodeFn, decode_fn: DecodeFn) -> Harness {
        Harness {
            encode_fn,
            decode_fn,
        }
    }

    #[inline(always)]
    pub fn get_encode_fn(&self) -> EncodeFn {
        self.encode_fn
    }

    #[inline(always)]
    pub fn get_decode_fn(&self) -> DecodeFn {
        self.decode_fn
    }
}

/// Downcasts an erased value handed to an [`EncodeFn`].
pub fn downcast_value<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(|| {
        Error::unregistered_type(format!(
            "binding for {} received a value of another type",
            std::any::type_name::<T>()
        ))
    })
}

fn encode_value<T: Serializer>(
    value: &dyn Any,
    context: &mut WriteContext,
    _: &TypeBinding,
) -> Result<(), Error> {
    downcast_value::<T>(value)?.accel_write(context, &FieldOptions::DEFAULT)
}

fn decode_value<T: Serializer>(
    context: &mut ReadContext,
    _: &TypeBinding,
) -> Result<Box<dyn Any>, Error> {
    Ok(Box::new(T::accel_read(context, &FieldOptions::DEFAULT)?))
}

/// Everything the registry knows about one Rust type.
#[derive(Debug)]
pub struct TypeBinding {
    type_name: &'static str,
    shape: TypeShape,
    descriptor: Option<Arc<TypeDescriptor>>,
    dispatch: Option<FieldDispatch>,
    harness: Harness,
}

impl TypeBinding {
    /// A binding that writes `T` as one un-indexed record.
    pub fn for_value<T: Serializer>() -> TypeBinding {
        TypeBinding {
            type_name: std::any::type_name::<T>(),
            shape: T::accel_shape(),
            descriptor: None,
            dispatch: None,
            harness: Harness::new(encode_value::<T>, decode_value::<T>),
        }
    }

    /// A descriptor-driven binding for a derived struct.
    pub fn for_struct<T: StructSerializer>() -> Result<TypeBinding, Error> {
        let type_name = std::any::type_name::<T>();
        let options = T::accel_type_options();
        let descriptor = TypeDescriptor::new(type_name, T::accel_fields())?
            .with_strict(options.strict)
            .with_approx_byte_size(options.initial_size);
        if let Some(field) = descriptor
            .fields()
            .iter()
            .find(|f| matches!(f.shape, TypeShape::Array { rank } if rank > 1))
        {
            return Err(Error::not_supported(format!(
                "field `{}` of {} is a multi-dimensional array",
                field.name, type_name
            )));
        }
        if T::accel_construct().is_none() {
            return Err(Error::not_supported(format!(
                "{} cannot be default-constructed for decoding",
                type_name
            )));
        }
        Ok(TypeBinding::with_descriptor(
            type_name,
            descriptor,
            Harness::new(
                crate::serializer::struct_::encode_struct::<T>,
                crate::serializer::struct_::decode_struct::<T>,
            ),
        ))
    }

    /// A binding with caller-supplied procedures and field list.
    pub fn with_descriptor(
        type_name: &'static str,
        descriptor: TypeDescriptor,
        harness: Harness,
    ) -> TypeBinding {
        let dispatch = FieldDispatch::build(&descriptor);
        TypeBinding {
            type_name,
            shape: TypeShape::Struct,
            descriptor: Some(Arc::new(descriptor)),
            dispatch: Some(dispatch),
            harness,
        }
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    #[inline(always)]
    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        self.descriptor.as_ref()
    }

    pub fn require_descriptor(&self) -> Result<&TypeDescriptor, Error> {
        self.descriptor.as_deref().ok_or_else(|| {
            Error::unregistered_type(format!("{} has no field descriptor", self.type_name))
        })
    }

    #[inline(always)]
    pub fn dispatch(&self) -> Option<&FieldDispatch> {
        self.dispatch.as_ref()
    }

    #[inline(always)]
    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Writer size hint for one value of this type.
    pub fn approx_byte_size(&self) -> usize {
        self.descriptor
            .as_ref()
            .map(|d| d.approx_byte_size() as usize)
            .unwrap_or(crate::config::DEFAULT_INITIAL_BUFFER_SIZE)
    }

    pub fn encode(&self, value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
        (self.harness.encode_fn)(value, context, self)
    }

    pub fn decode<T: 'static>(&self, context: &mut ReadContext) -> Result<T, Error> {
        let boxed = (self.harness.decode_fn)(context, self)?;
        boxed.downcast::<T>().map(|b| *b).map_err(|_| {
            Error::unregistered_type(format!(
                "binding {} produced a value other than {}",
                self.type_name,
                std::any::type_name::<T>()
            ))
        })
    }
}

/// Process-wide table from Rust type to binding, behind one coarse lock.
///
/// Bindings are built outside the lock and inserted afterwards; a racing
/// builder of the same type keeps whichever binding landed first.
pub struct TypeRegistry {
    bindings: Spinlock<HashMap<TypeId, Arc<TypeBinding>>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

macro_rules! builtin_bindings {
    ($($ty:ty),* $(,)?) => {
        vec![$((TypeId::of::<$ty>(), Arc::new(TypeBinding::for_value::<$ty>()))),*]
    };
}

impl TypeRegistry {
    /// A registry pre-populated with every primitive and well-known type.
    pub fn new() -> TypeRegistry {
        let builtins: Vec<(TypeId, Arc<TypeBinding>)> = builtin_bindings!(
            bool,
            i8,
            i16,
            i32,
            i64,
            i128,
            isize,
            u8,
            u16,
            u32,
            u64,
            u128,
            usize,
            f32,
            f64,
            Float128,
            char,
            String,
            std::time::Duration,
            chrono::NaiveDate,
            chrono::NaiveDateTime,
            chrono::Duration,
            chrono::DateTime<chrono::FixedOffset>,
            uuid::Uuid,
        );
        TypeRegistry {
            bindings: Spinlock::new(builtins.into_iter().collect()),
        }
    }

    /// Looks up an existing binding without resolving.
    pub fn binding_of<T: 'static>(&self) -> Option<Arc<TypeBinding>> {
        self.binding_by_id(TypeId::of::<T>())
    }

    pub fn binding_by_id(&self, type_id: TypeId) -> Option<Arc<TypeBinding>> {
        self.bindings.lock().get(&type_id).cloned()
    }

    pub fn has_binding(&self, type_id: TypeId) -> bool {
        self.bindings.lock().contains_key(&type_id)
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.has_binding(TypeId::of::<T>())
    }

    pub fn fields_of<T: 'static>(&self) -> Option<Arc<TypeDescriptor>> {
        self.binding_of::<T>()?.descriptor().cloned()
    }

    /// Binds `T` to caller-supplied procedures.
    ///
    /// Registering the same descriptor twice is a no-op; a different
    /// descriptor for an already bound type is rejected.
    pub fn register<T: 'static>(
        &self,
        descriptor: TypeDescriptor,
        encode_fn: EncodeFn,
        decode_fn: DecodeFn,
    ) -> Result<(), Error> {
        let binding = TypeBinding::with_descriptor(
            std::any::type_name::<T>(),
            descriptor,
            Harness::new(encode_fn, decode_fn),
        );
        self.insert_checked(TypeId::of::<T>(), binding)
    }

    /// Binds a derived struct ahead of first use.
    pub fn register_struct<T: StructSerializer>(&self) -> Result<(), Error> {
        let binding = TypeBinding::for_struct::<T>().map_err(Error::enhance_type_error::<T>)?;
        self.insert_checked(TypeId::of::<T>(), binding)
    }

    fn insert_checked(&self, type_id: TypeId, binding: TypeBinding) -> Result<(), Error> {
        let mut bindings = self.bindings.lock();
        if let Some(existing) = bindings.get(&type_id) {
            if existing.descriptor.as_deref() == binding.descriptor.as_deref() {
                return Ok(());
            }
            return Err(Error::duplicate_registration(format!(
                "{} is already bound to a different descriptor",
                binding.type_name
            )));
        }
        debug!(type_name = binding.type_name, "registered binding");
        bindings.insert(type_id, Arc::new(binding));
        Ok(())
    }

    /// Returns the binding of `T`, building and memoizing it on first use.
    ///
    /// Resolution goes exact type, then arrays, then generic shapes, then the
    /// struct's derived field schema.
    pub fn resolve<T: Serializer>(&self) -> Result<Arc<TypeBinding>, Error> {
        let type_id = TypeId::of::<T>();
        if let Some(binding) = self.binding_by_id(type_id) {
            return Ok(binding);
        }
        let binding = match T::accel_shape() {
            TypeShape::Array { rank } if rank > 1 => {
                return Err(Error::not_supported(format!(
                    "{} is a multi-dimensional array",
                    std::any::type_name::<T>()
                )));
            }
            TypeShape::Struct => match T::accel_struct_binding() {
                Some(binding) => binding.map_err(Error::enhance_type_error::<T>)?,
                None => {
                    return Err(Error::unregistered_type(format!(
                        "{} has neither a registration nor a derived field schema",
                        std::any::type_name::<T>()
                    )));
                }
            },
            TypeShape::Primitive
            | TypeShape::Array { .. }
            | TypeShape::List
            | TypeShape::Map
            | TypeShape::Nullable => TypeBinding::for_value::<T>(),
        };
        trace!(type_name = binding.type_name, shape = ?binding.shape, "resolved binding");
        let mut bindings = self.bindings.lock();
        Ok(bindings
            .entry(type_id)
            .or_insert_with(|| Arc::new(binding))
            .clone())
    }

    pub fn encode<T: Serializer>(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        self.resolve::<T>()?.encode(value.as_any(), context)
    }

    pub fn decode<T: Serializer>(&self, context: &mut ReadContext) -> Result<T, Error> {
        self.resolve::<T>()?.decode::<T>(context)
    }

    /// Encodes a type that is only known through [`register`](Self::register).
    pub fn encode_registered<T: 'static>(
        &self,
        value: &T,
        context: &mut WriteContext,
    ) -> Result<(), Error> {
        self.lookup::<T>()?.encode(value, context)
    }

    pub fn decode_registered<T: 'static>(&self, context: &mut ReadContext) -> Result<T, Error> {
        self.lookup::<T>()?.decode::<T>(context)
    }

    fn lookup<T: 'static>(&self) -> Result<Arc<TypeBinding>, Error> {
        self.binding_of::<T>().ok_or_else(|| {
            Error::unregistered_type(format!(
                "no binding registered for {}",
                std::any::type_name::<T>()
            ))
        })
    }
}
