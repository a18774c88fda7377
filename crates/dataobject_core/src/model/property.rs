//! Declared property metadata.
//!
//! # Responsibility
//! - Describe one declared property of a structured type.
//! - Provide an explicit schema declaration path (builder, JSON document or
//!   `DeclaredType` impl) instead of reflective attachment.
//!
//! # Invariants
//! - Descriptors are immutable once built.
//! - Declaration order is preserved.

use crate::error::{DataObjectError, DataObjectResult};
use crate::model::value::TypeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One declared property: name, declared type and array-ness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    name: String,
    #[serde(rename = "type")]
    type_key: TypeKey,
    #[serde(default)]
    is_array: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_key: impl Into<TypeKey>, is_array: bool) -> Self {
        Self {
            name: name.into(),
            type_key: type_key.into(),
            is_array,
        }
    }

    /// Single-valued property.
    pub fn scalar(name: impl Into<String>, type_key: impl Into<TypeKey>) -> Self {
        Self::new(name, type_key, false)
    }

    /// Ordered-sequence property whose elements have `type_key`.
    pub fn array(name: impl Into<String>, type_key: impl Into<TypeKey>) -> Self {
        Self::new(name, type_key, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }
}

/// Ordered property declaration for one structured type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    #[serde(rename = "type")]
    type_key: TypeKey,
    #[serde(default)]
    properties: Vec<PropertyDescriptor>,
}

impl TypeSchema {
    pub fn new(type_key: impl Into<TypeKey>) -> Self {
        Self {
            type_key: type_key.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, type_key: impl Into<TypeKey>) -> Self {
        self.properties.push(PropertyDescriptor::scalar(name, type_key));
        self
    }

    pub fn array(mut self, name: impl Into<String>, type_key: impl Into<TypeKey>) -> Self {
        self.properties.push(PropertyDescriptor::array(name, type_key));
        self
    }

    pub fn with_descriptor(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    /// Loads a declaration document:
    /// `{ "type": "User", "properties": [{ "name": "...", "type": "...", "is_array": false }] }`.
    pub fn from_json(document: &serde_json::Value) -> DataObjectResult<Self> {
        let type_key = document
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        serde_json::from_value(document.clone()).map_err(|err| DataObjectError::InvalidSchema {
            type_key,
            reason: err.to_string(),
        })
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn into_parts(self) -> (TypeKey, Vec<PropertyDescriptor>) {
        (self.type_key, self.properties)
    }

    /// Checks the type key, every property name and declared type, and
    /// rejects duplicated property names.
    pub fn validate(&self) -> DataObjectResult<()> {
        if !self.type_key.is_valid() {
            return Err(DataObjectError::InvalidTypeKey(self.type_key.to_string()));
        }

        let mut seen = BTreeSet::new();
        for property in &self.properties {
            let name = property.name();
            if name.trim().is_empty() {
                return Err(self.invalid("property name must not be empty"));
            }
            if !seen.insert(name) {
                return Err(self.invalid(&format!("duplicate property `{name}`")));
            }
            if !property.type_key().is_valid() {
                return Err(self.invalid(&format!(
                    "property `{name}` has invalid type `{}`",
                    property.type_key()
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> DataObjectError {
        DataObjectError::InvalidSchema {
            type_key: self.type_key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A Rust type that declares its own structured schema.
pub trait DeclaredType {
    const TYPE_NAME: &'static str;

    fn schema() -> TypeSchema;

    fn type_key() -> TypeKey {
        TypeKey::from_static(Self::TYPE_NAME)
    }
}
