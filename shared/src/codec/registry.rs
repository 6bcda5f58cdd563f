use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    marker::PhantomData,
    rc::Rc,
    sync::Arc,
};

use log::{debug, info};

use relay_sync_serde::Buffer;

use crate::codec::{error::CodecError, standard, Codec};

// Every stored value is an `Arc<dyn Codec<Value = T>>` for the `T` it is keyed by.
type ErasedCodec = Box<dyn Any + Send + Sync>;

trait CodecFactory {
    fn type_name(&self) -> &'static str;
    fn create(&self, resolver: &mut CodecResolver) -> Result<ErasedCodec, CodecError>;
}

struct TypedFactory<C, F> {
    factory: F,
    phantom: PhantomData<fn() -> C>,
}

impl<C, F> CodecFactory for TypedFactory<C, F>
where
    C: Codec,
    F: Fn(&mut CodecResolver) -> Result<C, CodecError>,
{
    fn type_name(&self) -> &'static str {
        type_name::<C::Value>()
    }

    fn create(&self, resolver: &mut CodecResolver) -> Result<ErasedCodec, CodecError> {
        let codec: Arc<dyn Codec<Value = C::Value>> = Arc::new((self.factory)(resolver)?);
        Ok(Box::new(codec))
    }
}

fn downcast<T: 'static>(codec: &ErasedCodec) -> Result<Arc<dyn Codec<Value = T>>, CodecError> {
    codec
        .downcast_ref::<Arc<dyn Codec<Value = T>>>()
        .cloned()
        .ok_or(CodecError::MissingCodec {
            type_name: type_name::<T>(),
        })
}

// CodecRegistryBuilder

/// Collects codec factories before a session starts
///
/// `new()` pre-registers the standard codecs (all numeric primitives,
/// `bool`, `Vector2`, `Vector3`, `Color`, `ObjectId`). Registering a
/// type twice, including one of the standard types, is rejected.
pub struct CodecRegistryBuilder {
    factories: HashMap<TypeId, Rc<dyn CodecFactory>>,
}

impl Default for CodecRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistryBuilder {
    pub fn new() -> Self {
        let mut builder = Self::empty();
        builder.add_standard_codecs();
        builder
    }

    /// A builder without the standard codecs
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a factory producing the codec for `C::Value`
    ///
    /// The factory runs once, during [`build`](Self::build), and may ask the
    /// resolver for the codecs of the structure's fields.
    pub fn register<C, F>(&mut self, factory: F) -> Result<&mut Self, CodecError>
    where
        C: Codec,
        F: Fn(&mut CodecResolver) -> Result<C, CodecError> + 'static,
    {
        let type_id = TypeId::of::<C::Value>();
        if self.factories.contains_key(&type_id) {
            return Err(CodecError::DuplicateCodec {
                type_name: type_name::<C::Value>(),
            });
        }
        self.factories.insert(
            type_id,
            Rc::new(TypedFactory {
                factory,
                phantom: PhantomData,
            }),
        );
        Ok(self)
    }

    /// Registers a stateless codec instance
    pub fn register_codec<C: Codec + Clone>(&mut self, codec: C) -> Result<&mut Self, CodecError> {
        self.register(move |_| Ok(codec.clone()))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolves every registered factory and freezes the result
    ///
    /// Because every codec is constructed here, a structure codec whose field
    /// type has no codec fails now with [`CodecError::MissingCodec`] rather
    /// than on first use.
    pub fn build(self) -> Result<CodecRegistry, CodecError> {
        let mut resolver = CodecResolver {
            factories: self.factories,
            resolved: HashMap::new(),
            resolving: Vec::new(),
        };

        let pending: Vec<(TypeId, &'static str)> = resolver
            .factories
            .iter()
            .map(|(type_id, factory)| (*type_id, factory.type_name()))
            .collect();
        for (type_id, name) in pending {
            resolver.resolve(type_id, name)?;
        }

        info!("Codec registry built with {} codecs", resolver.resolved.len());

        Ok(CodecRegistry {
            codecs: resolver.resolved,
        })
    }

    fn add_standard_codecs(&mut self) {
        let inserts: [(TypeId, Rc<dyn CodecFactory>); 15] = [
            standard_entry::<standard::PrimitiveCodec<bool>>(),
            standard_entry::<standard::PrimitiveCodec<u8>>(),
            standard_entry::<standard::PrimitiveCodec<i8>>(),
            standard_entry::<standard::PrimitiveCodec<u16>>(),
            standard_entry::<standard::PrimitiveCodec<i16>>(),
            standard_entry::<standard::PrimitiveCodec<u32>>(),
            standard_entry::<standard::PrimitiveCodec<i32>>(),
            standard_entry::<standard::PrimitiveCodec<u64>>(),
            standard_entry::<standard::PrimitiveCodec<i64>>(),
            standard_entry::<standard::PrimitiveCodec<f32>>(),
            standard_entry::<standard::PrimitiveCodec<f64>>(),
            standard_entry::<standard::Vector2Codec>(),
            standard_entry::<standard::Vector3Codec>(),
            standard_entry::<standard::ColorCodec>(),
            standard_entry::<standard::ObjectIdCodec>(),
        ];
        self.factories.extend(inserts);
    }
}

fn default_factory<C: Default>(_: &mut CodecResolver) -> Result<C, CodecError> {
    Ok(C::default())
}

fn standard_entry<C: Codec + Default>() -> (TypeId, Rc<dyn CodecFactory>) {
    (
        TypeId::of::<C::Value>(),
        Rc::new(TypedFactory {
            factory: default_factory::<C>,
            phantom: PhantomData::<fn() -> C>,
        }),
    )
}

// CodecResolver

/// Handed to codec factories during [`CodecRegistryBuilder::build`] so a
/// structure codec can capture the codecs of its fields
pub struct CodecResolver {
    factories: HashMap<TypeId, Rc<dyn CodecFactory>>,
    resolved: HashMap<TypeId, ErasedCodec>,
    resolving: Vec<TypeId>,
}

impl CodecResolver {
    pub fn get<T: 'static>(&mut self) -> Result<Arc<dyn Codec<Value = T>>, CodecError> {
        let codec = self.resolve(TypeId::of::<T>(), type_name::<T>())?;
        downcast::<T>(codec)
    }

    fn resolve(&mut self, type_id: TypeId, name: &'static str) -> Result<&ErasedCodec, CodecError> {
        if !self.resolved.contains_key(&type_id) {
            let Some(factory) = self.factories.get(&type_id).cloned() else {
                return Err(CodecError::MissingCodec { type_name: name });
            };
            if self.resolving.contains(&type_id) {
                return Err(CodecError::CyclicCodec { type_name: name });
            }

            self.resolving.push(type_id);
            let created = factory.create(self);
            self.resolving.pop();

            debug!("Resolved codec for {}", name);
            self.resolved.insert(type_id, created?);
        }

        self.resolved
            .get(&type_id)
            .ok_or(CodecError::MissingCodec { type_name: name })
    }
}

// CodecRegistry

/// Frozen type → codec table, shared across the session via `Arc`
pub struct CodecRegistry {
    codecs: HashMap<TypeId, ErasedCodec>,
}

impl CodecRegistry {
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::new()
    }

    pub fn get<T: 'static>(&self) -> Result<Arc<dyn Codec<Value = T>>, CodecError> {
        let Some(codec) = self.codecs.get(&TypeId::of::<T>()) else {
            return Err(CodecError::MissingCodec {
                type_name: type_name::<T>(),
            });
        };
        downcast::<T>(codec)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Encodes `value` at the write cursor. On failure the buffer is
    /// truncated back to its previous size, so a half-written structure
    /// never leaks into the payload.
    pub fn encode<T: 'static>(&self, value: &T, buffer: &mut Buffer) -> Result<(), CodecError> {
        let codec = self.get::<T>()?;
        let mark = buffer.size();
        if let Err(error) = codec.encode(value, buffer) {
            buffer.truncate(mark);
            return Err(error.into());
        }
        Ok(())
    }

    pub fn decode<T: 'static>(&self, buffer: &mut Buffer) -> Result<T, CodecError> {
        let codec = self.get::<T>()?;
        Ok(codec.decode(buffer)?)
    }
}
