//! Terminal handler for date values.

use crate::error::{DataObjectError, DataObjectResult};
use crate::handler::TypeHandler;
use crate::model::date::DateValue;
use crate::model::value::{TypeKey, Value};
use crate::registry::DataObjects;

/// Clone/set/equals over the instant carried by a `Value::Date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTypeHandler;

impl DateTypeHandler {
    /// Converts loose input into an instant.
    ///
    /// Dates are copied, numbers read as epoch milliseconds and strings
    /// parsed; every other shape yields the invalid date.
    pub fn to_instant(source: &Value) -> DateValue {
        match source {
            Value::Date(date) => *date,
            Value::Number(timestamp) => DateValue::from_timestamp(*timestamp),
            Value::Text(text) => DateValue::parse(text),
            _ => DateValue::invalid(),
        }
    }
}

impl TypeHandler for DateTypeHandler {
    fn name(&self) -> &'static str {
        "date"
    }

    fn instantiate(&self, _objects: &DataObjects, _type_key: &TypeKey) -> Value {
        Value::Date(DateValue::now())
    }

    fn clone_value(&self, _objects: &DataObjects, value: &Value) -> DataObjectResult<Value> {
        match value {
            Value::Date(date) => Ok(Value::Date(*date)),
            other => Err(DataObjectError::TypeMismatch {
                expected: TypeKey::DATE.to_string(),
                found: other.type_key().to_string(),
            }),
        }
    }

    fn set(
        &self,
        _objects: &DataObjects,
        target: &mut Value,
        source: &Value,
    ) -> DataObjectResult<()> {
        *target = Value::Date(Self::to_instant(source));
        Ok(())
    }

    fn equals(&self, _objects: &DataObjects, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Date(left), Value::Date(right)) => left == right,
            _ => false,
        }
    }
}
