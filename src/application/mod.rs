//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases coordinate the domain ports to
//! fulfill business requirements.

pub mod auth;
