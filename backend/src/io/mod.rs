//! Transport layer. REST is the only transport today.

pub mod rest;
