pub mod auth;
pub mod catalog;
pub mod commerce;
pub mod document;
pub mod integration;
