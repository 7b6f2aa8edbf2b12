//! # Endpoint Catalog
//!
//! Jira platform REST API v3 endpoints expressed as data. Each entry is a
//! descriptor template: the dispatcher does the work, the table only says
//! where to send it.

use std::fmt;

use crate::descriptor::{Method, Operation};
use crate::encoding;

/// The shape of request body an endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
  None,
  Json,
  Text,
  Multipart,
}

impl fmt::Display for BodyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      BodyKind::None => "none",
      BodyKind::Json => "json",
      BodyKind::Text => "text",
      BodyKind::Multipart => "multipart",
    };
    f.write_str(name)
  }
}

/// One catalogued endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
  /// Stable lookup key, e.g. `get_issue`
  pub name: &'static str,
  pub group: &'static str,
  pub method: Method,
  pub path: &'static str,
  pub expects_response_body: bool,
  pub body: BodyKind,
  pub summary: &'static str,
}

impl EndpointSpec {
  /// A fresh operation with method, path template and body expectation set
  pub fn operation(&self) -> Operation {
    Operation::new(self.method, self.path).expects_response_body(self.expects_response_body)
  }

  /// Placeholder names in the path template
  pub fn placeholders(&self) -> Vec<&'static str> {
    encoding::placeholders(self.path)
  }
}

const fn endpoint(
  name: &'static str,
  group: &'static str,
  method: Method,
  path: &'static str,
  body: BodyKind,
  summary: &'static str,
) -> EndpointSpec {
  EndpointSpec {
    name,
    group,
    method,
    path,
    expects_response_body: true,
    body,
    summary,
  }
}

/// An endpoint that answers with 204 and no body
const fn no_content(
  name: &'static str,
  group: &'static str,
  method: Method,
  path: &'static str,
  body: BodyKind,
  summary: &'static str,
) -> EndpointSpec {
  EndpointSpec {
    expects_response_body: false,
    ..endpoint(name, group, method, path, body, summary)
  }
}

use BodyKind::{Json, Multipart, None as NoBody, Text};
use Method::{Delete, Get, Post, Put};

pub static ENDPOINTS: &[EndpointSpec] = &[
  // Server
  endpoint("get_server_info", "server", Get, "/rest/api/3/serverInfo", NoBody, "Get Jira instance info"),
  endpoint("get_configuration", "server", Get, "/rest/api/3/configuration", NoBody, "Get global settings"),
  // Myself
  endpoint("get_myself", "myself", Get, "/rest/api/3/myself", NoBody, "Get the current user"),
  endpoint("get_preference", "myself", Get, "/rest/api/3/mypreferences", NoBody, "Get a user preference"),
  no_content("set_preference", "myself", Put, "/rest/api/3/mypreferences", Text, "Set a user preference"),
  no_content("remove_preference", "myself", Delete, "/rest/api/3/mypreferences", NoBody, "Delete a user preference"),
  endpoint("get_locale", "myself", Get, "/rest/api/3/mypreferences/locale", NoBody, "Get the current user's locale"),
  // Issues
  endpoint("get_issue", "issues", Get, "/rest/api/3/issue/{issueIdOrKey}", NoBody, "Get an issue"),
  endpoint("create_issue", "issues", Post, "/rest/api/3/issue", Json, "Create an issue or subtask"),
  no_content("edit_issue", "issues", Put, "/rest/api/3/issue/{issueIdOrKey}", Json, "Edit an issue"),
  no_content("delete_issue", "issues", Delete, "/rest/api/3/issue/{issueIdOrKey}", NoBody, "Delete an issue"),
  endpoint("create_issues", "issues", Post, "/rest/api/3/issue/bulk", Json, "Bulk create issues"),
  endpoint("bulk_fetch_issues", "issues", Post, "/rest/api/3/issue/bulkfetch", Json, "Bulk fetch issues"),
  endpoint("archive_issues", "issues", Put, "/rest/api/3/issue/archive", Json, "Archive issues by ID or key"),
  endpoint("unarchive_issues", "issues", Put, "/rest/api/3/issue/unarchive", Json, "Unarchive issues by ID or key"),
  no_content("assign_issue", "issues", Put, "/rest/api/3/issue/{issueIdOrKey}/assignee", Json, "Assign an issue"),
  endpoint("get_changelogs", "issues", Get, "/rest/api/3/issue/{issueIdOrKey}/changelog", NoBody, "Get an issue's changelog"),
  endpoint("get_edit_issue_meta", "issues", Get, "/rest/api/3/issue/{issueIdOrKey}/editmeta", NoBody, "Get edit issue metadata"),
  no_content("notify", "issues", Post, "/rest/api/3/issue/{issueIdOrKey}/notify", Json, "Send a notification for an issue"),
  // Transitions
  endpoint("get_transitions", "transitions", Get, "/rest/api/3/issue/{issueIdOrKey}/transitions", NoBody, "Get available transitions"),
  no_content("do_transition", "transitions", Post, "/rest/api/3/issue/{issueIdOrKey}/transitions", Json, "Transition an issue"),
  // Comments
  endpoint("get_comments", "comments", Get, "/rest/api/3/issue/{issueIdOrKey}/comment", NoBody, "Get an issue's comments"),
  endpoint("add_comment", "comments", Post, "/rest/api/3/issue/{issueIdOrKey}/comment", Json, "Add a comment"),
  endpoint("get_comment", "comments", Get, "/rest/api/3/issue/{issueIdOrKey}/comment/{id}", NoBody, "Get a comment"),
  endpoint("update_comment", "comments", Put, "/rest/api/3/issue/{issueIdOrKey}/comment/{id}", Json, "Update a comment"),
  no_content("delete_comment", "comments", Delete, "/rest/api/3/issue/{issueIdOrKey}/comment/{id}", NoBody, "Delete a comment"),
  endpoint("get_comments_by_ids", "comments", Post, "/rest/api/3/comment/list", Json, "Get comments by IDs"),
  // Worklogs
  endpoint("get_issue_worklog", "worklogs", Get, "/rest/api/3/issue/{issueIdOrKey}/worklog", NoBody, "Get an issue's worklogs"),
  endpoint("add_worklog", "worklogs", Post, "/rest/api/3/issue/{issueIdOrKey}/worklog", Json, "Add a worklog"),
  endpoint("get_worklog", "worklogs", Get, "/rest/api/3/issue/{issueIdOrKey}/worklog/{id}", NoBody, "Get a worklog"),
  endpoint("update_worklog", "worklogs", Put, "/rest/api/3/issue/{issueIdOrKey}/worklog/{id}", Json, "Update a worklog"),
  no_content("delete_worklog", "worklogs", Delete, "/rest/api/3/issue/{issueIdOrKey}/worklog/{id}", NoBody, "Delete a worklog"),
  // Watchers and votes
  endpoint("get_watchers", "watchers", Get, "/rest/api/3/issue/{issueIdOrKey}/watchers", NoBody, "Get issue watchers"),
  no_content("add_watcher", "watchers", Post, "/rest/api/3/issue/{issueIdOrKey}/watchers", Json, "Add a watcher"),
  no_content("remove_watcher", "watchers", Delete, "/rest/api/3/issue/{issueIdOrKey}/watchers", NoBody, "Remove a watcher"),
  endpoint("get_votes", "votes", Get, "/rest/api/3/issue/{issueIdOrKey}/votes", NoBody, "Get votes"),
  no_content("add_vote", "votes", Post, "/rest/api/3/issue/{issueIdOrKey}/votes", NoBody, "Add a vote"),
  no_content("remove_vote", "votes", Delete, "/rest/api/3/issue/{issueIdOrKey}/votes", NoBody, "Delete a vote"),
  // Issue links
  no_content("link_issues", "issue-links", Post, "/rest/api/3/issueLink", Json, "Create an issue link"),
  endpoint("get_issue_link", "issue-links", Get, "/rest/api/3/issueLink/{linkId}", NoBody, "Get an issue link"),
  no_content("delete_issue_link", "issue-links", Delete, "/rest/api/3/issueLink/{linkId}", NoBody, "Delete an issue link"),
  endpoint("get_issue_link_types", "issue-links", Get, "/rest/api/3/issueLinkType", NoBody, "Get issue link types"),
  // Attachments
  endpoint("add_attachment", "attachments", Post, "/rest/api/3/issue/{issueIdOrKey}/attachments", Multipart, "Add attachments to an issue"),
  endpoint("get_attachment", "attachments", Get, "/rest/api/3/attachment/{id}", NoBody, "Get attachment metadata"),
  no_content("remove_attachment", "attachments", Delete, "/rest/api/3/attachment/{id}", NoBody, "Delete an attachment"),
  endpoint("get_attachment_content", "attachments", Get, "/rest/api/3/attachment/content/{id}", NoBody, "Download attachment content"),
  endpoint("get_attachment_thumbnail", "attachments", Get, "/rest/api/3/attachment/thumbnail/{id}", NoBody, "Download an attachment thumbnail"),
  endpoint("get_attachment_meta", "attachments", Get, "/rest/api/3/attachment/meta", NoBody, "Get Jira attachment settings"),
  endpoint("expand_attachment", "attachments", Get, "/rest/api/3/attachment/{id}/expand/human", NoBody, "List the contents of an archive attachment"),
  // Avatars
  endpoint("get_system_avatars", "avatars", Get, "/rest/api/3/avatar/{type}/system", NoBody, "Get system avatars by type"),
  endpoint("get_avatars", "avatars", Get, "/rest/api/3/universal_avatar/type/{type}/owner/{entityId}", NoBody, "Get avatars for an owner"),
  endpoint("get_avatar_image_by_id", "avatars", Get, "/rest/api/3/universal_avatar/view/type/{type}/avatar/{id}", NoBody, "Get an avatar image by ID"),
  endpoint("get_project_avatars", "avatars", Get, "/rest/api/3/project/{projectIdOrKey}/avatars", NoBody, "Get all project avatars"),
  no_content("delete_project_avatar", "avatars", Delete, "/rest/api/3/project/{projectIdOrKey}/avatar/{id}", NoBody, "Delete a project avatar"),
  // Filters
  endpoint("create_filter", "filters", Post, "/rest/api/3/filter", Json, "Create a filter"),
  endpoint("get_filter", "filters", Get, "/rest/api/3/filter/{id}", NoBody, "Get a filter"),
  endpoint("update_filter", "filters", Put, "/rest/api/3/filter/{id}", Json, "Update a filter"),
  no_content("delete_filter", "filters", Delete, "/rest/api/3/filter/{id}", NoBody, "Delete a filter"),
  endpoint("get_favourite_filters", "filters", Get, "/rest/api/3/filter/favourite", NoBody, "Get favorite filters"),
  endpoint("search_filters", "filters", Get, "/rest/api/3/filter/search", NoBody, "Search for filters"),
  // Fields
  endpoint("get_fields", "fields", Get, "/rest/api/3/field", NoBody, "Get fields"),
  endpoint("create_custom_field", "fields", Post, "/rest/api/3/field", Json, "Create a custom field"),
  endpoint("get_fields_paginated", "fields", Get, "/rest/api/3/field/search", NoBody, "Get fields paginated"),
  // Projects, components and versions
  endpoint("search_projects", "projects", Get, "/rest/api/3/project/search", NoBody, "Get projects paginated"),
  endpoint("get_project", "projects", Get, "/rest/api/3/project/{projectIdOrKey}", NoBody, "Get a project"),
  endpoint("get_project_statuses", "projects", Get, "/rest/api/3/project/{projectIdOrKey}/statuses", NoBody, "Get all statuses for a project"),
  endpoint("get_project_components", "components", Get, "/rest/api/3/project/{projectIdOrKey}/components", NoBody, "Get project components"),
  endpoint("create_component", "components", Post, "/rest/api/3/component", Json, "Create a component"),
  no_content("delete_component", "components", Delete, "/rest/api/3/component/{id}", NoBody, "Delete a component"),
  endpoint("get_project_versions", "versions", Get, "/rest/api/3/project/{projectIdOrKey}/versions", NoBody, "Get project versions"),
  endpoint("create_version", "versions", Post, "/rest/api/3/version", Json, "Create a version"),
  endpoint("get_version", "versions", Get, "/rest/api/3/version/{id}", NoBody, "Get a version"),
  endpoint("update_version", "versions", Put, "/rest/api/3/version/{id}", Json, "Update a version"),
  no_content("delete_version", "versions", Delete, "/rest/api/3/version/{id}", NoBody, "Delete a version"),
  // Users
  endpoint("get_user", "users", Get, "/rest/api/3/user", NoBody, "Get a user"),
  endpoint("find_users", "users", Get, "/rest/api/3/user/search", NoBody, "Find users"),
  endpoint("find_assignable_users", "users", Get, "/rest/api/3/user/assignable/search", NoBody, "Find users assignable to issues"),
  endpoint("bulk_get_users", "users", Get, "/rest/api/3/user/bulk", NoBody, "Bulk get users"),
  // Search
  endpoint("search_jql", "search", Get, "/rest/api/3/search/jql", NoBody, "Search for issues using JQL"),
  endpoint("search_jql_post", "search", Post, "/rest/api/3/search/jql", Json, "Search for issues using JQL (POST)"),
  endpoint("count_issues", "search", Post, "/rest/api/3/search/approximate-count", Json, "Count issues using JQL"),
  endpoint("get_issue_picker", "search", Get, "/rest/api/3/issue/picker", NoBody, "Get issue picker suggestions"),
  // Statuses and priorities
  endpoint("get_statuses", "statuses", Get, "/rest/api/3/status", NoBody, "Get all statuses"),
  endpoint("get_status", "statuses", Get, "/rest/api/3/status/{idOrName}", NoBody, "Get a status"),
  endpoint("get_priorities", "priorities", Get, "/rest/api/3/priority", NoBody, "Get priorities"),
  endpoint("get_priority", "priorities", Get, "/rest/api/3/priority/{id}", NoBody, "Get a priority"),
  // Workflow schemes
  endpoint("get_workflow_schemes", "workflow-schemes", Get, "/rest/api/3/workflowscheme", NoBody, "Get all workflow schemes"),
  endpoint("create_workflow_scheme", "workflow-schemes", Post, "/rest/api/3/workflowscheme", Json, "Create a workflow scheme"),
  endpoint("get_workflow_scheme", "workflow-schemes", Get, "/rest/api/3/workflowscheme/{id}", NoBody, "Get a workflow scheme"),
  endpoint("update_workflow_scheme", "workflow-schemes", Put, "/rest/api/3/workflowscheme/{id}", Json, "Classic update workflow scheme"),
  no_content("delete_workflow_scheme", "workflow-schemes", Delete, "/rest/api/3/workflowscheme/{id}", NoBody, "Delete a workflow scheme"),
  // Issue properties
  endpoint("get_issue_property_keys", "issue-properties", Get, "/rest/api/3/issue/{issueIdOrKey}/properties", NoBody, "Get issue property keys"),
  endpoint("get_issue_property", "issue-properties", Get, "/rest/api/3/issue/{issueIdOrKey}/properties/{propertyKey}", NoBody, "Get an issue property"),
  endpoint("set_issue_property", "issue-properties", Put, "/rest/api/3/issue/{issueIdOrKey}/properties/{propertyKey}", Json, "Set an issue property"),
  no_content("delete_issue_property", "issue-properties", Delete, "/rest/api/3/issue/{issueIdOrKey}/properties/{propertyKey}", NoBody, "Delete an issue property"),
];

/// Look up an endpoint by name
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
  ENDPOINTS.iter().find(|spec| spec.name == name)
}

pub fn all() -> &'static [EndpointSpec] {
  ENDPOINTS
}

/// Endpoints in `group`, in catalog order
pub fn by_group(group: &str) -> impl Iterator<Item = &'static EndpointSpec> + '_ {
  ENDPOINTS.iter().filter(move |spec| spec.group == group)
}

/// Distinct group names, in catalog order
pub fn groups() -> Vec<&'static str> {
  let mut groups: Vec<&'static str> = Vec::new();
  for spec in ENDPOINTS {
    if !groups.contains(&spec.group) {
      groups.push(spec.group);
    }
  }
  groups
}
