//! Application layer
//!
//! Use cases that turn request-shaped commands into domain service calls and
//! map the results into serializable responses.

pub mod auth;
pub mod catalog;
pub mod commerce;
pub mod document;
pub mod integration;
