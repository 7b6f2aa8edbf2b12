//! # Sprig CLI Library
//!
//! Command definitions and context wiring for the `sprig` binary. Every
//! command that talks to Jira goes through one `sprig_jira::JiraClient`
//! built by [`clients`].

pub mod cli;
pub mod clients;
