//! # JemCRUD Shared Library
//!
//! This crate contains the domain types, data access, and authentication
//! logic used by the JemCRUD API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT issuance, and the signup/login service
//! - `db`: Connection pool and schema bootstrap
//! - `models`: Database models (`users`, `positions`) and their SQL

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the JemCRUD shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
