//! Personal finance tracking backend.
//!
//! This crate implements the account lifecycle core: registration with
//! email verification, expiring one-time codes, password reset with
//! current-password confirmation and self-verifying bearer tokens.
//!
//! Layout:
//! - [`domain`] - entities, value objects, ports and the lifecycle service
//! - [`application`] - one use case per exposed operation
//! - [`infrastructure`] - config, Postgres adapters, security primitives,
//!   notification gateways
//! - [`adapters`] - the actix-web HTTP surface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
