//! ShopSmart Core - Shared domain types.
//!
//! This crate provides the types shared by every ShopSmart component:
//! - `api` - JSON storefront backend (catalog, cart, orders, accounts)
//! - `cli` - Command-line tools for migrations, seeding and admin bootstrap
//! - `integration-tests` - Database-backed workflow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. With the `postgres` feature enabled the types also implement
//! the `sqlx` encoding traits so repositories can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, money, emails, ratings, order status and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
