//! # Typed Jira Endpoints
//!
//! Convenience methods on [`JiraClient`](crate::JiraClient) for the calls sprig
//! makes most often. Each one starts from a catalog entry, fills in its
//! arguments and decodes the result into a model.

pub mod attachments;
pub mod comments;
pub mod issues;
pub mod myself;
pub mod search;
pub mod transitions;
