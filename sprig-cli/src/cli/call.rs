//! # Call Command
//!
//! Dispatches a single catalogued endpoint with parameters, body and headers
//! taken from the command line, then prints or saves the result.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use sprig_core::output::{format_endpoint, format_path, format_status};
use sprig_core::print_success;
use sprig_jira::catalog::{self, BodyKind, EndpointSpec};
use sprig_jira::{ApiError, ApiResponse, MultipartForm, MultipartPart, QueryValue, RequestBody, ResponseBody};
use tracing::debug;

use crate::clients::{ConnectionOptions, create_jira_runtime_and_client};

/// Arguments for `sprig call`
#[derive(Args, Debug, Clone)]
pub struct CallArgs {
  /// Catalog endpoint name (see `sprig endpoints`)
  #[arg(required = true, index = 1)]
  pub endpoint: String,

  /// Path parameter, e.g. -p issueIdOrKey=PROJ-1
  #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
  pub params: Vec<(String, String)>,

  /// Query parameter; repeat a key to send a list
  #[arg(short = 'q', long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
  pub query: Vec<(String, String)>,

  /// JSON request body
  #[arg(long, value_name = "JSON", conflicts_with_all = ["data_file", "text", "files"])]
  pub data: Option<String>,

  /// Read the JSON request body from a file
  #[arg(long, value_name = "PATH", conflicts_with_all = ["text", "files"])]
  pub data_file: Option<PathBuf>,

  /// Plain-text request body
  #[arg(long, value_name = "TEXT", conflicts_with = "files")]
  pub text: Option<String>,

  /// File to upload as a multipart part (repeatable)
  #[arg(long = "file", value_name = "PATH")]
  pub files: Vec<PathBuf>,

  /// Extra request header, e.g. -H 'Accept: */*'
  #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header_arg)]
  pub headers: Vec<(String, String)>,

  /// Write the response body to this file
  #[arg(short, long, value_name = "PATH")]
  pub output: Option<PathBuf>,
}

/// Handle `sprig call`
pub(crate) fn handle_call_command(args: CallArgs, connection: &ConnectionOptions) -> Result<()> {
  let spec = catalog::find(&args.endpoint).with_context(|| {
    format!(
      "Unknown endpoint '{}'. Run `sprig endpoints --filter <text>` to search the catalog",
      args.endpoint
    )
  })?;

  let request = build_request(&args, spec)?;
  let (rt, client) = create_jira_runtime_and_client(connection)?;

  debug!(endpoint = spec.name, "Calling endpoint");
  match rt.block_on(client.call(spec.name, request)) {
    Ok(response) => {
      let stdout = io::stdout();
      let mut out = stdout.lock();
      write_response(&response, args.output.as_deref(), &mut out)
    }
    Err(err) => bail!("{}", describe_failure(&err)),
  }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
    _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
  }
}

fn parse_header_arg(raw: &str) -> Result<(String, String), String> {
  match raw.split_once(':') {
    Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.trim().to_string())),
    _ => Err(format!("expected NAME:VALUE, got '{raw}'")),
  }
}

/// Collapse repeated keys into list values, keeping first-seen key order
fn group_query(pairs: &[(String, String)]) -> Vec<(String, QueryValue)> {
  let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
  for (key, value) in pairs {
    match grouped.iter_mut().find(|(existing, _)| existing == key) {
      Some((_, values)) => values.push(value.clone()),
      None => grouped.push((key.clone(), vec![value.clone()])),
    }
  }

  grouped
    .into_iter()
    .map(|(key, mut values)| {
      let value = if values.len() == 1 {
        QueryValue::from(values.remove(0))
      } else {
        QueryValue::from(values)
      };
      (key, value)
    })
    .collect()
}

fn build_body(args: &CallArgs, spec: &EndpointSpec) -> Result<Option<RequestBody>> {
  let provided = if args.data.is_some() || args.data_file.is_some() {
    Some(BodyKind::Json)
  } else if args.text.is_some() {
    Some(BodyKind::Text)
  } else if !args.files.is_empty() {
    Some(BodyKind::Multipart)
  } else {
    None
  };

  let Some(kind) = provided else {
    return Ok(None);
  };
  if kind != spec.body {
    bail!(
      "Endpoint {} takes a {} body, but a {} body was given",
      format_endpoint(spec.name),
      spec.body,
      kind
    );
  }

  let body = match kind {
    BodyKind::Json => {
      let raw = match (&args.data, &args.data_file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) => {
          fs::read_to_string(path).with_context(|| format!("Failed to read request body from {}", path.display()))?
        }
        (None, None) => return Ok(None),
      };
      let value: serde_json::Value = serde_json::from_str(&raw).context("Request body is not valid JSON")?;
      RequestBody::json(&value).context("Failed to serialize request body")?
    }
    BodyKind::Text => RequestBody::Text(args.text.clone().unwrap_or_default()),
    BodyKind::Multipart => {
      let mut form = MultipartForm::new();
      for path in &args.files {
        if !path.is_file() {
          bail!("Cannot upload {}: not a file", format_path(&path.display().to_string()));
        }
        form = form.part(MultipartPart::file("file", path));
      }
      RequestBody::Multipart(form)
    }
    BodyKind::None => return Ok(None),
  };
  Ok(Some(body))
}

/// Turn command-line arguments into dispatcher call arguments
fn build_request(args: &CallArgs, spec: &EndpointSpec) -> Result<sprig_jira::CallArgs> {
  let mut request = sprig_jira::CallArgs::new();

  for (name, value) in &args.params {
    request = request.path_param(name.as_str(), value.as_str());
  }
  for (key, value) in group_query(&args.query) {
    request = request.query(key, value);
  }
  if let Some(body) = build_body(args, spec)? {
    request = request.body(body);
  }
  for (name, value) in &args.headers {
    request = request.header(name, value)?;
  }

  Ok(request)
}

/// Print a successful response, or save it when `output` is set
fn write_response(response: &ApiResponse, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
  let bytes: Vec<u8> = match &response.body {
    ResponseBody::Empty => {
      print_success(&format!(
        "{} {} returned HTTP {} with no content",
        response.operation.method,
        response.operation.path,
        format_status(response.status)
      ));
      return Ok(());
    }
    ResponseBody::Json(value) => {
      let mut pretty = serde_json::to_string_pretty(value).context("Failed to format JSON response")?;
      pretty.push('\n');
      pretty.into_bytes()
    }
    ResponseBody::Text(text) => text.clone().into_bytes(),
    ResponseBody::Binary { content_type, data } => {
      if output.is_none() {
        bail!(
          "The response is binary ({content_type}, {} bytes). Pass --output <PATH> to save it",
          data.len()
        );
      }
      data.to_vec()
    }
  };

  match output {
    Some(path) => {
      fs::write(path, &bytes).with_context(|| format!("Failed to write response to {}", path.display()))?;
      print_success(&format!(
        "Saved {} bytes to {}",
        bytes.len(),
        format_path(&path.display().to_string())
      ));
    }
    None => {
      out.write_all(&bytes).context("Failed to write response")?;
      out.flush().context("Failed to flush output")?;
    }
  }
  Ok(())
}

/// A multi-line explanation of a failed call: kind, status and Jira's messages
fn describe_failure(err: &ApiError) -> String {
  let mut tags = vec![err.kind().to_string()];
  if let Some(kind) = err.transport_kind() {
    tags.push(kind.to_string());
  }
  if let Some(status) = err.status() {
    tags.push(format!("HTTP {status}"));
  }

  let mut text = format!("Jira request failed [{}]", tags.join(", "));
  let messages = err.error_messages();
  if messages.is_empty() {
    text.push_str(&format!("\n  {err}"));
  } else {
    if let Some(operation) = err.operation() {
      text.push_str(&format!("\n  {} {}", operation.method, operation.path));
    }
    for message in messages {
      text.push_str(&format!("\n  - {message}"));
    }
  }
  if err.is_timeout() {
    text.push_str("\n  Increase the limit with --timeout <SECS>");
  }
  text
}
