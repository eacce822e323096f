//! Business document generation and 1C:Enterprise synchronization
//!
//! Layered the usual hexagonal way: `domain` holds entities, rules and ports,
//! `application` the use cases, `infrastructure` the Postgres, Redis and 1C
//! adapters, and `adapters::http` the actix-web surface.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;
