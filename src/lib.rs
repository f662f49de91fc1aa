//! Credential and session lifecycle service
//!
//! Layering follows the hexagonal shape: `domain` holds the entities, value
//! objects, and ports; `application` holds one use case per operation;
//! `infrastructure` implements the ports against argon2, JWT, Postgres,
//! Redis, and SMTP; `adapters::http` binds it all to actix-web.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
