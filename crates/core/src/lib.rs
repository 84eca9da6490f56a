//! Heartwood Core - Shared types library.
//!
//! This crate provides common types used across all Heartwood components:
//! - `storefront` - Public-facing furniture store
//! - `admin` - Internal administration console
//! - `cli` - Command-line tools for configuration checks and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and the
//!   order-domain enums shared between the storefront and the admin console

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
