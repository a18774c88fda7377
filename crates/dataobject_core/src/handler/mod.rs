//! Type handler capability.
//!
//! # Responsibility
//! - Define the clone/set/equals contract dispatched per concrete type.
//! - Host the built-in terminal (date) and generic structured handlers.
//!
//! # Invariants
//! - Handlers are stateless; all state lives in `DataObjects`.
//! - Handlers resolve nested types only through the `DataObjects` passed in.

pub mod date_handler;
pub mod structured_handler;

use crate::error::DataObjectResult;
use crate::model::value::{TypeKey, Value};
use crate::registry::DataObjects;

/// Clone/set/equals capability for one type.
pub trait TypeHandler: Send + Sync {
    /// Short label used in log events.
    fn name(&self) -> &'static str;

    /// Zero-argument construction of a `type_key` value.
    fn instantiate(&self, objects: &DataObjects, type_key: &TypeKey) -> Value;

    /// Returns a new value structurally equal to `value`.
    fn clone_value(&self, objects: &DataObjects, value: &Value) -> DataObjectResult<Value>;

    /// Populates `target` in place from the loosely typed `source`.
    fn set(&self, objects: &DataObjects, target: &mut Value, source: &Value)
        -> DataObjectResult<()>;

    fn equals(&self, objects: &DataObjects, left: &Value, right: &Value) -> bool;
}
