//! Type-dispatched structural operations over plain data objects.
//!
//! A caller-owned `DataObjects` service resolves a `TypeHandler` per runtime
//! type and uses it to clone, populate and compare values, walking declared
//! properties depth-first for structured types.

pub mod error;
pub mod handler;
pub mod logging;
pub mod model;
pub mod registry;

pub use error::{DataObjectError, DataObjectResult};
pub use handler::date_handler::DateTypeHandler;
pub use handler::structured_handler::StructuredObjectHandler;
pub use handler::TypeHandler;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date::DateValue;
pub use model::property::{DeclaredType, PropertyDescriptor, TypeSchema};
pub use model::value::{Instance, TypeKey, Value};
pub use registry::DataObjects;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
