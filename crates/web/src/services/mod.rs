//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account sign up and password login

pub mod auth;
