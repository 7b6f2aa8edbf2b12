//! # Endpoints Command
//!
//! Lists the endpoint catalog as a table.

use anyhow::{Result, bail};
use clap::Args;
use sprig_core::output::format_command;
use sprig_core::print_info;
use sprig_jira::EndpointSpec;
use sprig_jira::catalog;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for `sprig endpoints`
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointsArgs {
  /// Only show endpoints in this group
  #[arg(long, short = 'g', value_name = "GROUP")]
  pub group: Option<String>,

  /// Case-insensitive search over names, paths and summaries
  #[arg(long, short = 'f', value_name = "TEXT")]
  pub filter: Option<String>,

  /// List group names instead of endpoints
  #[arg(long, conflicts_with_all = ["group", "filter"])]
  pub groups: bool,
}

#[derive(Tabled)]
struct EndpointRow {
  #[tabled(rename = "Name")]
  name: &'static str,
  #[tabled(rename = "Method")]
  method: String,
  #[tabled(rename = "Path")]
  path: &'static str,
  #[tabled(rename = "Body")]
  body: String,
  #[tabled(rename = "Summary")]
  summary: &'static str,
}

impl From<&EndpointSpec> for EndpointRow {
  fn from(spec: &EndpointSpec) -> Self {
    EndpointRow {
      name: spec.name,
      method: spec.method.to_string(),
      path: spec.path,
      body: spec.body.to_string(),
      summary: spec.summary,
    }
  }
}

/// Handle `sprig endpoints`
pub(crate) fn handle_endpoints_command(args: EndpointsArgs) -> Result<()> {
  if args.groups {
    for group in catalog::groups() {
      println!("{group}");
    }
    return Ok(());
  }

  let matches = select_endpoints(&args)?;
  if matches.is_empty() {
    print_info("No endpoints match.");
    return Ok(());
  }

  let rows: Vec<EndpointRow> = matches.into_iter().map(EndpointRow::from).collect();
  println!("{}", Table::new(rows).with(Style::sharp()));
  println!(
    "Call one with {}",
    format_command("sprig call <name> -p <placeholder>=<value>")
  );
  Ok(())
}

fn select_endpoints(args: &EndpointsArgs) -> Result<Vec<&'static EndpointSpec>> {
  if let Some(group) = &args.group
    && !catalog::groups().contains(&group.as_str())
  {
    bail!("Unknown group '{group}'. Known groups: {}", catalog::groups().join(", "));
  }

  let needle = args.filter.as_deref().map(str::to_lowercase);
  Ok(
    catalog::all()
      .iter()
      .filter(|spec| args.group.as_deref().is_none_or(|group| spec.group == group))
      .filter(|spec| {
        needle.as_deref().is_none_or(|needle| {
          spec.name.to_lowercase().contains(needle)
            || spec.path.to_lowercase().contains(needle)
            || spec.summary.to_lowercase().contains(needle)
        })
      })
      .collect(),
  )
}
