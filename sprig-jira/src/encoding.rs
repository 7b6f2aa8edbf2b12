//! # Path and Query Encoding
//!
//! Substitutes `{name}` placeholders in path templates and serializes query
//! parameters. Both run before any network I/O so descriptor defects surface
//! as [`DescriptorError`]s instead of malformed URLs.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::descriptor::{ParamValue, QueryValue};
use crate::error::DescriptorError;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("Failed to compile path placeholder regex"));

/// Placeholder names in a path template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
  PLACEHOLDER_PATTERN
    .captures_iter(template)
    .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
    .collect()
}

/// Replace every `{name}` in `template` with its percent-encoded value.
///
/// Every placeholder needs exactly one value and every value needs a
/// placeholder. Values that are empty, `.` or `..` are rejected. Braces that do not form a placeholder make the template
/// malformed.
pub fn resolve_path(template: &str, params: &[(String, ParamValue)]) -> Result<String, DescriptorError> {
  let names = placeholders(template);
  let known: HashSet<&str> = names.iter().copied().collect();

  if let Some((name, _)) = params.iter().find(|(name, _)| !known.contains(name.as_str())) {
    return Err(DescriptorError::UnexpectedPathParam {
      template: template.to_string(),
      name: name.clone(),
    });
  }

  let mut resolved = String::with_capacity(template.len());
  let mut last = 0;

  for captures in PLACEHOLDER_PATTERN.captures_iter(template) {
    let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
      continue;
    };

    let value = params
      .iter()
      .find(|(param, _)| param == name.as_str())
      .map(|(_, value)| value)
      .ok_or_else(|| DescriptorError::MissingPathParam {
        template: template.to_string(),
        name: name.as_str().to_string(),
      })?;

    let segment = value.to_string();
    // URL normalization would drop or collapse these, retargeting the request
    if matches!(segment.as_str(), "" | "." | "..") {
      return Err(DescriptorError::InvalidPathSegment {
        template: template.to_string(),
        name: name.as_str().to_string(),
        value: segment,
      });
    }

    resolved.push_str(&template[last..whole.start()]);
    resolved.push_str(&urlencoding::encode(&segment));
    last = whole.end();
  }
  resolved.push_str(&template[last..]);

  // Anything brace-shaped left over was never a valid placeholder
  let literal_parts = PLACEHOLDER_PATTERN.replace_all(template, "");
  if literal_parts.contains('{') || literal_parts.contains('}') {
    return Err(DescriptorError::MalformedTemplate {
      template: template.to_string(),
      reason: "unbalanced or invalid brace".to_string(),
    });
  }

  Ok(resolved)
}

/// Flatten query parameters into ordered key/value pairs.
///
/// Absent values are dropped; lists become one pair per element in list
/// order. Empty strings, `false` and `0` are kept.
pub fn encode_query(params: &[(String, QueryValue)]) -> Vec<(String, String)> {
  let mut pairs = Vec::new();
  for (key, value) in params {
    match value {
      QueryValue::Absent => {}
      QueryValue::Scalar(scalar) => pairs.push((key.clone(), scalar.to_string())),
      QueryValue::List(items) => {
        pairs.extend(items.iter().map(|item| (key.clone(), item.to_string())));
      }
    }
  }
  pairs
}

/// Serialize encoded pairs into an `application/x-www-form-urlencoded` string
pub fn query_string(pairs: &[(String, String)]) -> String {
  form_urlencoded::Serializer::new(String::new())
    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    .finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(values: &[(&str, ParamValue)]) -> Vec<(String, ParamValue)> {
    values.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
  }

  #[test]
  fn test_resolve_simple_placeholder() {
    let resolved = resolve_path("/thing/{id}", &params(&[("id", ParamValue::from(42))])).unwrap();
    assert_eq!(resolved, "/thing/42");
  }

  #[test]
  fn test_resolve_multiple_placeholders() {
    let resolved = resolve_path(
      "/rest/api/3/issue/{issueIdOrKey}/comment/{id}",
      &params(&[("id", ParamValue::from(10010)), ("issueIdOrKey", ParamValue::from("PROJ-7"))]),
    )
    .unwrap();

    assert_eq!(resolved, "/rest/api/3/issue/PROJ-7/comment/10010");
    assert!(!resolved.contains('{'));
    assert!(!resolved.contains('}'));
  }

  #[test]
  fn test_resolve_encodes_segment() {
    let resolved = resolve_path("/rest/api/3/user/properties/{key}", &params(&[("key", ParamValue::from("a b/c"))])).unwrap();
    assert_eq!(resolved, "/rest/api/3/user/properties/a%20b%2Fc");
  }

  #[test]
  fn test_resolve_bool_value() {
    let resolved = resolve_path("/flag/{on}", &params(&[("on", ParamValue::from(false))])).unwrap();
    assert_eq!(resolved, "/flag/false");
  }

  #[test]
  fn test_resolve_missing_value_fails() {
    let err = resolve_path("/thing/{id}/sub/{subId}", &params(&[("id", ParamValue::from(1))])).unwrap_err();
    assert_eq!(
      err,
      DescriptorError::MissingPathParam {
        template: "/thing/{id}/sub/{subId}".to_string(),
        name: "subId".to_string(),
      }
    );
  }

  #[test]
  fn test_resolve_extra_value_fails() {
    let err = resolve_path(
      "/thing/{id}",
      &params(&[("id", ParamValue::from(1)), ("other", ParamValue::from(2))]),
    )
    .unwrap_err();
    assert!(matches!(err, DescriptorError::UnexpectedPathParam { name, .. } if name == "other"));
  }

  #[test]
  fn test_resolve_malformed_template_fails() {
    let err = resolve_path("/thing/{id", &[]).unwrap_err();
    assert!(matches!(err, DescriptorError::MalformedTemplate { .. }));

    let err = resolve_path("/thing/{}", &[]).unwrap_err();
    assert!(matches!(err, DescriptorError::MalformedTemplate { .. }));
  }

  #[test]
  fn test_resolve_rejects_dot_and_empty_segments() {
    for value in ["..", ".", ""] {
      let err = resolve_path(
        "/rest/api/3/issue/{issueIdOrKey}/comment/{id}",
        &params(&[("issueIdOrKey", ParamValue::from("PROJ-1")), ("id", ParamValue::from(value))]),
      )
      .unwrap_err();

      assert_eq!(
        err,
        DescriptorError::InvalidPathSegment {
          template: "/rest/api/3/issue/{issueIdOrKey}/comment/{id}".to_string(),
          name: "id".to_string(),
          value: value.to_string(),
        }
      );
    }
  }

  #[test]
  fn test_resolve_allows_dots_inside_values() {
    let resolved = resolve_path("/rest/api/3/user/properties/{key}", &params(&[("key", ParamValue::from("..a.b"))])).unwrap();
    assert_eq!(resolved, "/rest/api/3/user/properties/..a.b");
  }

  #[test]
  fn test_resolve_without_placeholders() {
    assert_eq!(resolve_path("/rest/api/3/myself", &[]).unwrap(), "/rest/api/3/myself");
  }

  #[test]
  fn test_placeholders_in_order() {
    assert_eq!(
      placeholders("/rest/api/3/project/{projectIdOrKey}/avatar/{id}"),
      vec!["projectIdOrKey", "id"]
    );
  }

  #[test]
  fn test_encode_query_drops_absent_and_repeats_lists() {
    let query = vec![
      ("flag".to_string(), QueryValue::Absent),
      ("tag".to_string(), QueryValue::from(vec!["x", "y"])),
    ];

    let pairs = encode_query(&query);
    assert_eq!(query_string(&pairs), "tag=x&tag=y");
  }

  #[test]
  fn test_encode_query_keeps_falsy_values() {
    let query = vec![
      ("empty".to_string(), QueryValue::from("")),
      ("enabled".to_string(), QueryValue::from(false)),
      ("startAt".to_string(), QueryValue::from(0)),
    ];

    assert_eq!(query_string(&encode_query(&query)), "empty=&enabled=false&startAt=0");
  }

  #[test]
  fn test_query_string_escapes_values() {
    let pairs = vec![("jql".to_string(), "project = PROJ & status = \"Done\"".to_string())];
    assert_eq!(
      query_string(&pairs),
      "jql=project+%3D+PROJ+%26+status+%3D+%22Done%22"
    );
  }

  #[test]
  fn test_empty_list_contributes_nothing() {
    let query = vec![("expand".to_string(), QueryValue::List(Vec::new()))];
    assert!(encode_query(&query).is_empty());
  }
}
