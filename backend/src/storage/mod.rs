//! # Storage Module
//!
//! Persistence for the vaccine inventory: the storage traits the domain
//! services depend on, the CSV/YAML backend that implements them, and the
//! schema adapter for the external export/import record format.

pub mod csv;
pub mod schema;
pub mod traits;
