//! Shared test utilities for credhub-client.
//!
//! This crate provides:
//! - Proptest generators for credential names, actors and operations
//! - JSON fixtures shaped like CredHub server responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
