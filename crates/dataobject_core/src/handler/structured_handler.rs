//! Generic handler for types with declared properties.
//!
//! # Responsibility
//! - Walk the declared properties of an instance depth-first.
//! - Delegate nested declared types to their own handler; copy leaves raw.
//!
//! # Invariants
//! - Undeclared fields are never read, copied or compared.
//! - `Null` is passed through without delegating to nested handlers.
//! - `set` overwrites declared fields missing from the source with `Null`.

use crate::error::{DataObjectError, DataObjectResult};
use crate::handler::TypeHandler;
use crate::model::property::PropertyDescriptor;
use crate::model::value::{Instance, TypeKey, Value};
use crate::registry::DataObjects;
use log::debug;

/// Fallback handler for every type with declared properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredObjectHandler;

impl TypeHandler for StructuredObjectHandler {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn instantiate(&self, _objects: &DataObjects, type_key: &TypeKey) -> Value {
        Value::Object(Instance::new(type_key.clone()))
    }

    fn clone_value(&self, objects: &DataObjects, value: &Value) -> DataObjectResult<Value> {
        let source = expect_instance(value)?;
        let mut copy = Instance::new(source.type_key().clone());
        for property in objects.get_properties(source.type_key()) {
            let field = source.field(property.name());
            let cloned = match field {
                Value::Array(items) if property.is_array() => Value::Array(
                    items
                        .iter()
                        .map(|item| clone_element(objects, property, item))
                        .collect::<DataObjectResult<Vec<_>>>()?,
                ),
                other => clone_element(objects, property, other)?,
            };
            copy.insert(property.name(), cloned);
        }
        Ok(Value::Object(copy))
    }

    fn set(
        &self,
        objects: &DataObjects,
        target: &mut Value,
        source: &Value,
    ) -> DataObjectResult<()> {
        let found = target.type_key().to_string();
        let instance = target
            .as_instance_mut()
            .ok_or_else(|| DataObjectError::TypeMismatch {
                expected: "structured instance".to_string(),
                found,
            })?;
        let type_key = instance.type_key().clone();

        for property in objects.get_properties(&type_key) {
            let raw = source.field(property.name());
            let value = if property.is_array() {
                match raw {
                    Value::Array(items) => Value::Array(
                        items
                            .iter()
                            .map(|item| set_element(objects, property, item))
                            .collect::<DataObjectResult<Vec<_>>>()?,
                    ),
                    Value::Null => Value::Null,
                    other => {
                        debug!(
                            "event=set_property module=structured_handler status=skipped type={} property={} found={}",
                            type_key,
                            property.name(),
                            other.type_key()
                        );
                        Value::Null
                    }
                }
            } else {
                set_element(objects, property, raw)?
            };
            instance.insert(property.name(), value);
        }
        Ok(())
    }

    fn equals(&self, objects: &DataObjects, left: &Value, right: &Value) -> bool {
        let (Some(left), Some(right)) = (left.as_instance(), right.as_instance()) else {
            return false;
        };
        if left.type_key() != right.type_key() {
            return false;
        }

        objects
            .get_properties(left.type_key())
            .iter()
            .all(|property| {
                let left_field = left.field(property.name());
                let right_field = right.field(property.name());
                match (left_field, right_field) {
                    (Value::Array(left_items), Value::Array(right_items))
                        if property.is_array() =>
                    {
                        left_items.len() == right_items.len()
                            && left_items
                                .iter()
                                .zip(right_items)
                                .all(|(l, r)| equals_element(objects, property, l, r))
                    }
                    (l, r) => equals_element(objects, property, l, r),
                }
            })
    }
}

fn expect_instance(value: &Value) -> DataObjectResult<&Instance> {
    value
        .as_instance()
        .ok_or_else(|| DataObjectError::TypeMismatch {
            expected: "structured instance".to_string(),
            found: value.type_key().to_string(),
        })
}

fn clone_element(
    objects: &DataObjects,
    property: &PropertyDescriptor,
    value: &Value,
) -> DataObjectResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match objects.type_handler(property.type_key()) {
        Ok(handler) => handler.clone_value(objects, value),
        Err(_) => Ok(value.clone()),
    }
}

fn set_element(
    objects: &DataObjects,
    property: &PropertyDescriptor,
    raw: &Value,
) -> DataObjectResult<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    match objects.type_handler(property.type_key()) {
        Ok(handler) => {
            let mut fresh = handler.instantiate(objects, property.type_key());
            handler.set(objects, &mut fresh, raw)?;
            Ok(fresh)
        }
        Err(_) => Ok(raw.clone()),
    }
}

fn equals_element(
    objects: &DataObjects,
    property: &PropertyDescriptor,
    left: &Value,
    right: &Value,
) -> bool {
    if left.is_null() || right.is_null() {
        return left.is_null() && right.is_null();
    }
    match objects.type_handler(property.type_key()) {
        Ok(handler) => handler.equals(objects, left, right),
        Err(_) => left == right,
    }
}
