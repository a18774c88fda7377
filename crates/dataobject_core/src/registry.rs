//! Data object facade: handler registry and declared-property side table.
//!
//! # Responsibility
//! - Resolve a `TypeHandler` for any runtime type.
//! - Own declared-property metadata keyed by stable type identity.
//! - Expose clone/set/from/equals as the single entry point.
//!
//! # Invariants
//! - Resolution order: registered handler, then declared properties, else
//!   `NoHandler`. A registered handler always wins over structural handling.
//! - Registry lookup is by exact type key, never by compatibility.
//! - The registry is caller-owned; writes need `&mut self`, so concurrent
//!   readers are excluded by the borrow rules.

use crate::error::{DataObjectError, DataObjectResult};
use crate::handler::date_handler::DateTypeHandler;
use crate::handler::structured_handler::StructuredObjectHandler;
use crate::handler::TypeHandler;
use crate::model::property::{DeclaredType, PropertyDescriptor, TypeSchema};
use crate::model::value::{TypeKey, Value};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Type-dispatched clone/set/equals service.
pub struct DataObjects {
    handlers: BTreeMap<TypeKey, Arc<dyn TypeHandler>>,
    properties: BTreeMap<TypeKey, Vec<PropertyDescriptor>>,
    structured: StructuredObjectHandler,
}

impl Default for DataObjects {
    fn default() -> Self {
        Self::new()
    }
}

impl DataObjects {
    /// Creates a service seeded with the built-in date handler.
    pub fn new() -> Self {
        let mut handlers: BTreeMap<TypeKey, Arc<dyn TypeHandler>> = BTreeMap::new();
        handlers.insert(TypeKey::DATE, Arc::new(DateTypeHandler));
        Self {
            handlers,
            properties: BTreeMap::new(),
            structured: StructuredObjectHandler,
        }
    }

    /// Registers a dedicated handler for one built-in type.
    pub fn register_handler(
        &mut self,
        type_key: impl Into<TypeKey>,
        handler: Arc<dyn TypeHandler>,
    ) -> DataObjectResult<()> {
        let type_key = type_key.into();
        if !type_key.is_valid() {
            return Err(DataObjectError::InvalidTypeKey(type_key.to_string()));
        }
        if self.handlers.contains_key(&type_key) {
            return Err(DataObjectError::DuplicateHandler(type_key.to_string()));
        }

        info!(
            "event=handler_register module=registry status=ok type={} handler={}",
            type_key,
            handler.name()
        );
        self.handlers.insert(type_key, handler);
        Ok(())
    }

    /// Sorted keys with a dedicated handler.
    pub fn registered_types(&self) -> Vec<TypeKey> {
        self.handlers.keys().cloned().collect()
    }

    /// Sorted keys with attached property metadata.
    pub fn declared_types(&self) -> Vec<TypeKey> {
        self.properties.keys().cloned().collect()
    }

    /// Resolves the handler for `type_key`.
    ///
    /// # Errors
    /// - `NoHandler` when the type has no registered handler and no declared
    ///   properties.
    pub fn type_handler(&self, type_key: &TypeKey) -> DataObjectResult<&dyn TypeHandler> {
        if let Some(handler) = self.handlers.get(type_key) {
            return Ok(handler.as_ref());
        }
        if self.has_properties(type_key) {
            return Ok(&self.structured);
        }

        debug!(
            "event=type_resolve module=registry status=error type={}",
            type_key
        );
        Err(DataObjectError::NoHandler {
            type_key: type_key.to_string(),
        })
    }

    /// Declared properties of `type_key`, empty when none are attached.
    pub fn get_properties(&self, type_key: &TypeKey) -> &[PropertyDescriptor] {
        self.properties
            .get(type_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Declared properties of the runtime type of `value`.
    pub fn properties_of(&self, value: &Value) -> &[PropertyDescriptor] {
        self.get_properties(value.type_key())
    }

    /// Attaches or overwrites the declared properties of `type_key`.
    ///
    /// The list is stored as given; use `declare_schema` for a validated
    /// declaration.
    pub fn set_properties(
        &mut self,
        type_key: impl Into<TypeKey>,
        properties: Vec<PropertyDescriptor>,
    ) {
        self.properties.insert(type_key.into(), properties);
    }

    /// Whether metadata is attached, even an empty list.
    pub fn has_properties(&self, type_key: &TypeKey) -> bool {
        self.properties.contains_key(type_key)
    }

    /// Validates and attaches one schema.
    pub fn declare_schema(&mut self, schema: TypeSchema) -> DataObjectResult<()> {
        schema.validate()?;
        let (type_key, properties) = schema.into_parts();
        debug!(
            "event=schema_declare module=registry status=ok type={} properties={}",
            type_key,
            properties.len()
        );
        self.set_properties(type_key, properties);
        Ok(())
    }

    /// Attaches the schema a Rust type declares for itself.
    pub fn declare<T: DeclaredType>(&mut self) -> DataObjectResult<()> {
        let schema = T::schema();
        if schema.type_key() != &T::type_key() {
            return Err(DataObjectError::InvalidSchema {
                type_key: T::TYPE_NAME.to_string(),
                reason: format!("schema declares type `{}`", schema.type_key()),
            });
        }
        self.declare_schema(schema)
    }

    /// Zero-argument construction of a `type_key` value.
    pub fn instantiate(&self, type_key: &TypeKey) -> DataObjectResult<Value> {
        let handler = self.type_handler(type_key)?;
        Ok(handler.instantiate(self, type_key))
    }

    /// Deep copy through the handler of the runtime type of `value`.
    pub fn clone_value(&self, value: &Value) -> DataObjectResult<Value> {
        self.type_handler(value.type_key())?.clone_value(self, value)
    }

    /// Populates `target` in place from `source` and returns it.
    pub fn set<'a>(
        &self,
        target: &'a mut Value,
        source: &Value,
    ) -> DataObjectResult<&'a mut Value> {
        let type_key = target.type_key().clone();
        self.type_handler(&type_key)?.set(self, target, source)?;
        Ok(target)
    }

    /// Constructs a new `type_key` value and populates it from `source`.
    pub fn from(&self, type_key: &TypeKey, source: &Value) -> DataObjectResult<Value> {
        let mut instance = self.instantiate(type_key)?;
        self.set(&mut instance, source)?;
        Ok(instance)
    }

    /// `from` over parsed JSON input.
    pub fn from_json(
        &self,
        type_key: &TypeKey,
        source: &serde_json::Value,
    ) -> DataObjectResult<Value> {
        self.from(type_key, &Value::from(source))
    }

    /// Structural equality over declared properties.
    ///
    /// Values of different runtime types are never equal; otherwise the
    /// handler of the shared type decides.
    pub fn equals(&self, left: &Value, right: &Value) -> DataObjectResult<bool> {
        if left.type_key() != right.type_key() {
            return Ok(false);
        }
        let handler = self.type_handler(left.type_key())?;
        Ok(handler.equals(self, left, right))
    }
}
