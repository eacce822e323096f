pub mod config;
pub mod metrics;
pub mod onec;
pub mod persistence;
pub mod security;
