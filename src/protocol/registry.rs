use crate::error::{constants, ProtocolError, Result};
use crate::protocol::envelope::Packet;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

type FactoryFn<T> = dyn Fn(&[u8]) -> Result<T> + Send + Sync + 'static;

/// Table of type tags to payload factories.
///
/// Populated once at startup, then shared read-only (for example behind a
/// `static` or an `Arc`). Lookups need no locking because registration takes
/// `&mut self`.
pub struct TypeRegistry<T> {
    factories: HashMap<Cow<'static, str>, Box<FactoryFn<T>>>,
}

impl<T> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeRegistry<T> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory rebuilding a value from payload bytes.
    ///
    /// # Errors
    /// `DuplicateType` if the tag is already present, `RangeError` for an empty tag.
    pub fn register<F>(&mut self, type_tag: impl Into<Cow<'static, str>>, factory: F) -> Result<()>
    where
        F: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        let type_tag = type_tag.into();
        if type_tag.is_empty() {
            return Err(ProtocolError::RangeError(
                constants::ERR_EMPTY_TYPE_TAG.to_string(),
            ));
        }
        if self.factories.contains_key(&type_tag) {
            return Err(ProtocolError::DuplicateType(type_tag.into_owned()));
        }

        debug!(type_tag = %type_tag, "Registered packet type");
        self.factories.insert(type_tag, Box::new(factory));
        Ok(())
    }

    /// Register a [`Packet`] under its own tag, wrapping decoded values with `wrap`.
    pub fn register_packet<P, F>(&mut self, wrap: F) -> Result<()>
    where
        P: Packet + 'static,
        F: Fn(P) -> T + Send + Sync + 'static,
        T: 'static,
    {
        self.register(P::TYPE_TAG, move |payload| {
            P::decode_payload(payload).map(&wrap)
        })
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|tag| tag.as_ref())
    }

    /// Rebuild a value from its tag and payload.
    ///
    /// # Errors
    /// `UnknownType` if the tag was never registered, `ConstructionFailed` if
    /// the factory rejects the payload.
    pub fn construct(&self, type_tag: &str, payload: &[u8]) -> Result<T> {
        let factory = self
            .factories
            .get(type_tag)
            .ok_or_else(|| ProtocolError::UnknownType(type_tag.to_string()))?;

        factory(payload).map_err(|e| ProtocolError::ConstructionFailed {
            type_tag: type_tag.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.type_tags().collect();
        tags.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &tags).finish()
    }
}
