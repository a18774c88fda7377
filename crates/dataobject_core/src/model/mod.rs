//! Data model consumed by the data object facade.
//!
//! # Responsibility
//! - Define the owned value tree operations run over.
//! - Define declared-property metadata and schema declarations.
//!
//! # Invariants
//! - Every structured instance carries a stable `TypeKey`.
//! - Property metadata is keyed by type, never by instance.

pub mod date;
pub mod property;
pub mod value;
