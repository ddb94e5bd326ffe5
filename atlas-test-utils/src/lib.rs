//! Test utilities shared across the atlas workspace
//!
//! This crate provides common testing infrastructure including:
//! - Environment variable isolation ([`EnvVarGuard`])
//! - XDG directory mocking ([`XdgEnvGuard`])
//! - HOME directory isolation ([`HomeEnvGuard`])
//! - Throwaway `.netrc` files ([`NetrcGuard`])
//!
//! Every guard serializes access to the variables it touches, so tests in the
//! same binary that mutate the process environment do not interleave.
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod home;
pub mod netrc;

// Re-export commonly used items
pub use env::{EnvVarGuard, XdgEnvGuard};
pub use home::HomeEnvGuard;
pub use netrc::NetrcGuard;
