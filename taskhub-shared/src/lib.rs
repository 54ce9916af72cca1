//! # Taskhub Shared Library
//!
//! This crate contains shared types and business logic used across the
//! Taskhub API server and the reminder worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and token utilities
//! - `db`: Connection pool and migrations
//! - `storage`: Object storage adapter (S3)
//! - `email`: Email delivery adapter (SES)

pub mod auth;
pub mod db;
pub mod email;
pub mod models;
pub mod storage;

/// Current version of the Taskhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
