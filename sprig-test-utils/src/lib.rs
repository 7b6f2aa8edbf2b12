//! Test utilities shared across the sprig workspace
//!
//! This crate provides common testing infrastructure including:
//! - single environment variable overrides ([`EnvVarGuard`])
//! - XDG directory isolation ([`XdgEnvGuard`])
//! - HOME directory isolation ([`HomeEnvTestGuard`])
//! - throwaway `.netrc` files ([`NetrcGuard`])
//!
//! Every guard holds the process-wide [`env_lock`] for its lifetime, so tests
//! that touch the environment run one at a time. Hold one guard per test.
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod home;
pub mod netrc;

// Re-export commonly used items
pub use env::{EnvVarGuard, XdgEnvGuard, env_lock};
pub use home::HomeEnvTestGuard;
pub use netrc::NetrcGuard;
