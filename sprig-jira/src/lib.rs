//! # Jira API Client
//!
//! A Jira REST client built around a single request [`Dispatcher`]. Every
//! call is described by an [`Operation`] (method, path template, parameters,
//! body, headers) and resolved against an [`ExecutionContext`]: either a
//! direct HTTP client or a [`HostBridge`] supplied by an embedding runtime.
//! Both contexts share one response classifier, so results and errors look
//! the same regardless of how the request left the process.
//!
//! Endpoints live in the [`catalog`] as data; [`JiraClient`] adds typed
//! helpers for the handful of calls sprig uses directly.

pub mod auth;
pub mod catalog;
mod client;
pub mod consts;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod encoding;
mod endpoints;
pub mod error;
pub mod models;
pub mod response;
pub mod transport;

pub use async_trait::async_trait;
pub use auth::Auth;
pub use catalog::{BodyKind, EndpointSpec};
// Re-export the client
pub use client::{CallArgs, JiraClient, create_jira_client};
pub use context::{ContextBuilder, DirectContext, ExecutionContext, HostBridge, HostContext};
pub use descriptor::{Method, MultipartForm, MultipartPart, Operation, ParamValue, PartData, QueryValue, RequestBody};
pub use dispatcher::Dispatcher;
pub use endpoints::search::SearchOptions;
pub use error::{ApiError, ConfigError, DescriptorError, ErrorKind, TransportError, TransportErrorKind};
// Re-export models
pub use models::{
  JiraAttachment, JiraComment, JiraErrorBody, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraTransition,
  JiraTransitions, JiraUser, SearchResults, TransitionId, TransitionRequest,
};
pub use response::{ApiResponse, DispatchResult, ResponseBody};
pub use transport::{PreparedRequest, RawResponse};
