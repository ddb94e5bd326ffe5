//! # Jira Command
//!
//! Derive-based implementation of the Jira command: viewing issues, JQL
//! search, comments and workflow transitions.

use anyhow::Result;
use atlas_core::output::{format_key, format_status, print_error, print_info, print_success, print_warning};
use atlas_jira::{JiraIssue, JiraTransition};
use clap::{Args, Subcommand};
use owo_colors::Stream::Stdout;
use owo_colors::{OwoColorize, Style as TextStyle};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::clients;

const LINE_WIDTH: usize = 78;

/// Command for Jira integration
#[derive(Args)]
pub struct JiraArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: JiraSubcommands,
}

/// Subcommands for the Jira command
#[derive(Subcommand)]
pub enum JiraSubcommands {
  /// View a Jira issue
  #[command(long_about = "View details of a Jira issue.\n\n\
                   Displays the key, summary, type, status, assignee and description.")]
  View {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Search issues with JQL
  #[command(long_about = "Run a JQL query and list the matching issues.\n\n\
                   Example: atlas jira search 'project = PROJ AND status = \"In Progress\"'")]
  Search {
    /// The JQL query
    #[arg(required = true, index = 1)]
    jql: String,

    /// Index of the first result
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    limit: Option<u32>,

    /// Comma-separated list of fields to request
    #[arg(long, value_delimiter = ',', default_value = "summary,status,assignee")]
    fields: Vec<String>,
  },

  /// Add a comment to an issue
  Comment {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The comment text
    #[arg(required = true, index = 2)]
    body: String,
  },

  /// Transition a Jira issue
  #[command(long_about = "Transition a Jira issue to a different status.\n\n\
                       If no transition is specified, the available transitions are listed.")]
  Transition {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The transition name or ID
    #[arg(index = 2)]
    transition: Option<String>,
  },
}

#[derive(Tabled)]
struct IssueRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Summary")]
  summary: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Assignee")]
  assignee: String,
}

impl From<&JiraIssue> for IssueRow {
  fn from(issue: &JiraIssue) -> Self {
    Self {
      key: issue.key.clone(),
      summary: truncate_string(&issue.fields.summary, 50),
      status: issue.fields.status_name().unwrap_or("-").to_string(),
      assignee: issue
        .fields
        .assignee
        .as_ref()
        .map(|a| a.display_name.clone())
        .unwrap_or_else(|| "Unassigned".to_string()),
    }
  }
}

/// Handle the Jira command
pub(crate) fn handle_jira_command(jira: JiraArgs, url: Option<&str>) -> Result<()> {
  match jira.subcommand {
    JiraSubcommands::View { issue_key } => handle_view_issue_command(&issue_key, url),
    JiraSubcommands::Search {
      jql,
      start,
      limit,
      fields,
    } => handle_search_command(&jql, start, limit, &fields, url),
    JiraSubcommands::Comment { issue_key, body } => handle_comment_command(&issue_key, &body, url),
    JiraSubcommands::Transition { issue_key, transition } => {
      handle_transition_issue_command(&issue_key, transition.as_deref(), url)
    }
  }
}

/// Truncate to `max_chars` characters, marking the cut with `...`
fn truncate_string(value: &str, max_chars: usize) -> String {
  if value.chars().count() <= max_chars {
    return value.to_string();
  }
  let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
  format!("{kept}...")
}

/// A line of `─` with `title` centered in it
fn section_rule(title: &str) -> String {
  let title_len = title.chars().count();
  let left = LINE_WIDTH.saturating_sub(title_len) / 2;
  let right = LINE_WIDTH.saturating_sub(title_len + left);
  format!("{}{}{}", "─".repeat(left), bold(title, TextStyle::new().blue()), "─".repeat(right))
}

fn bold(text: &str, style: TextStyle) -> String {
  text.if_supports_color(Stdout, |t| t.style(style.bold())).to_string()
}

fn bullet() -> String {
  "•".if_supports_color(Stdout, |t| t.blue()).to_string()
}

fn handle_view_issue_command(issue_key: &str, url: Option<&str>) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client(url)?;

  let issue = rt.block_on(jira_client.get_issue(issue_key))?;
  let fields = &issue.fields;

  println!("\n{}", section_rule(&format!(" Jira Issue: {} ", issue.key)));
  println!("\n  {} {}", bullet(), bold(&format!("Key:      {}", issue.key), TextStyle::new()));
  println!("  {} {}", bullet(), bold(&format!("Summary:  {}", fields.summary), TextStyle::new()));
  if let Some(issuetype) = &fields.issuetype {
    println!("  {} Type:     {}", bullet(), issuetype.name);
  }
  if let Some(status) = &fields.status {
    let category = status.status_category.as_ref().map(|c| c.key.as_str());
    println!("  {} Status:   {}", bullet(), format_status(&status.name, category));
  }
  let assignee = fields
    .assignee
    .as_ref()
    .map(|a| a.display_name.as_str())
    .unwrap_or("Unassigned");
  println!("  {} Assignee: {}", bullet(), assignee);

  if let Some(description) = fields.description.as_deref().filter(|d| !d.trim().is_empty()) {
    println!("\n{}\n", section_rule(" DESCRIPTION "));
    for line in description.lines() {
      println!("  {line}");
    }
    println!();
  }

  println!("{}\n", "─".repeat(LINE_WIDTH));
  Ok(())
}

fn handle_search_command(
  jql: &str,
  start: u32,
  limit: Option<u32>,
  fields: &[String],
  url: Option<&str>,
) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client(url)?;

  let fields: Vec<&str> = fields.iter().map(String::as_str).filter(|f| !f.is_empty()).collect();
  let results = rt.block_on(jira_client.search_issues(jql, start, limit, &fields))?;

  if results.issues.is_empty() {
    print_info("No issues found");
    return Ok(());
  }

  let rows: Vec<IssueRow> = results.issues.iter().map(IssueRow::from).collect();
  println!("{}", Table::new(rows).with(Style::sharp()));

  let shown_end = results.start_at as usize + results.issues.len();
  println!(
    "Showing {}-{} of {} issues",
    results.start_at + 1,
    shown_end,
    results.total
  );
  if (shown_end as u32) < results.total {
    print_info(&format!("Use --start {shown_end} to see the next page"));
  }
  Ok(())
}

fn handle_comment_command(issue_key: &str, body: &str, url: Option<&str>) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client(url)?;

  let comment = rt.block_on(jira_client.add_comment(issue_key, body))?;
  print_success(&format!("Added comment {} to {}", comment.id, format_key(issue_key)));
  Ok(())
}

fn print_transitions(transitions: &[JiraTransition]) {
  for t in transitions {
    match &t.to {
      Some(to) => println!("  {} ({}) -> {}", bold(&t.name, TextStyle::new()), t.id, to.name),
      None => println!("  {} ({})", bold(&t.name, TextStyle::new()), t.id),
    }
  }
}

fn handle_transition_issue_command(issue_key: &str, transition: Option<&str>, url: Option<&str>) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client(url)?;

  rt.block_on(async {
    let Some(transition_name) = transition else {
      let transitions = jira_client.get_transitions(issue_key).await?;
      if transitions.is_empty() {
        print_info("No transitions available for this issue.");
      } else {
        print_info(&format!("Available transitions for issue {issue_key}:"));
        print_transitions(&transitions);
      }
      return Ok(());
    };

    match jira_client.find_transition(issue_key, transition_name).await? {
      Some(found) => {
        jira_client.transition_issue(issue_key, &found.id).await?;
        print_success(&format!(
          "Successfully transitioned issue {issue_key} to '{}'",
          found.name
        ));
        Ok(())
      }
      None => {
        print_error(&format!("Transition '{transition_name}' not found for issue {issue_key}"));
        let transitions = jira_client.get_transitions(issue_key).await?;
        if !transitions.is_empty() {
          print_warning("Available transitions:");
          print_transitions(&transitions);
        }
        Err(anyhow::anyhow!("Unknown transition '{transition_name}'"))
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use atlas_jira::{JiraIssueFields, JiraIssueStatus, JiraUser};

  use super::*;

  #[test]
  fn test_truncate_string() {
    assert_eq!(truncate_string("short", 10), "short");
    assert_eq!(truncate_string("abcdefghijkl", 8), "abcde...");
    assert_eq!(truncate_string("äöüäöüäöü", 6), "äöü...");
  }

  #[test]
  fn test_section_rule_width() {
    owo_colors::set_override(false);
    let rule = section_rule(" X ");
    assert_eq!(rule.chars().count(), LINE_WIDTH);
  }

  fn issue(assignee: Option<JiraUser>) -> JiraIssue {
    JiraIssue {
      id: "10001".to_string(),
      key: "PROJ-1".to_string(),
      fields: JiraIssueFields {
        summary: "Fix the thing".to_string(),
        description: None,
        status: Some(JiraIssueStatus {
          id: None,
          name: "Open".to_string(),
          status_category: None,
        }),
        assignee,
        issuetype: None,
      },
    }
  }

  #[test]
  fn test_issue_row() {
    let row = IssueRow::from(&issue(None));
    assert_eq!(row.assignee, "Unassigned");
    assert_eq!(row.status, "Open");

    let assigned = issue(Some(JiraUser {
      account_id: None,
      name: Some("jdoe".to_string()),
      display_name: "Jane Doe".to_string(),
      email_address: None,
    }));
    assert_eq!(IssueRow::from(&assigned).assignee, "Jane Doe");

    let mut narrowed = issue(None);
    narrowed.fields.status = None;
    assert_eq!(IssueRow::from(&narrowed).status, "-");
  }
}
