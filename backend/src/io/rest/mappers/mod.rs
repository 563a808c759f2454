//! DTO mapping between the domain layer and the `shared` wire types.

pub mod vaccine_mapper;
