//! Grocery Core - Shared domain types.
//!
//! This crate provides the types shared by every grocery list component:
//! - `web` - The server-rendered web application
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encoding for the types is available behind the `sqlite` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, usernames, and item categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
