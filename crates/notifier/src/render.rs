//! MarkdownV2 notification text for issue and comment events.

use common::escape_markdown;
use events::{CommentEvent, Event, IssueAttributes, IssueEvent};

const BULLET: &str = "◦";

pub fn render(event: &Event) -> String {
    match event {
        Event::Issue(issue) => render_issue(issue),
        Event::Comment(comment) => render_comment(comment),
    }
}

/// `[\#N](url)`: the issue number linking to the issue.
fn issue_link(issue: &IssueAttributes) -> String {
    format!("[\\#{}]({})", issue.number, issue.url)
}

/// Header line(s) for the issue action; unknown actions get none.
fn issue_header(issue: &IssueAttributes) -> Option<String> {
    let link = issue_link(issue);
    let header = match issue.action.as_str() {
        "open" => format!("🆕 *New issue {link}*\n"),
        "update" => format!(
            "👀 *Issue updated {link}*\n*Updated by*: {}\n",
            escape_markdown(&issue.resolved.editor)
        ),
        "close" => format!("🚫 *Issue closed {link}*\n"),
        "reopen" => format!("♾ *Issue reopened {link}*\n"),
        _ => return None,
    };
    Some(header)
}

/// Title, creator, assignees and labels, each line prefixed with `indent`.
fn push_issue_block(buf: &mut String, issue: &IssueAttributes, indent: &str) {
    buf.push_str(&format!(
        "{indent}*Name*: {}\n",
        escape_markdown(&issue.title)
    ));
    buf.push_str(&format!(
        "{indent}*Creator*: {}\n",
        escape_markdown(&issue.resolved.author)
    ));

    let assignees: Vec<&String> = issue
        .resolved
        .assignees
        .iter()
        .filter(|name| !name.is_empty())
        .collect();
    if !assignees.is_empty() {
        buf.push_str(&format!("{indent}*Assignee*:\n"));
        for name in assignees {
            buf.push_str(&format!("{indent}  {BULLET} {}\n", escape_markdown(name)));
        }
    }

    if !issue.labels.is_empty() {
        buf.push_str(&format!("{indent}*Labels*:\n"));
        for label in &issue.labels {
            buf.push_str(&format!(
                "{indent}  {BULLET} {}\n",
                escape_markdown(&label.title)
            ));
        }
    }
}

pub fn render_issue(event: &IssueEvent) -> String {
    let issue = &event.object_attributes;
    let mut buf = String::with_capacity(256);
    if let Some(header) = issue_header(issue) {
        buf.push_str(&header);
    }
    push_issue_block(&mut buf, issue, "");
    if !issue.description.is_empty() {
        buf.push_str(&format!(
            "*Description*: {}\n",
            escape_markdown(&issue.description)
        ));
    }
    buf
}

pub fn render_comment(event: &CommentEvent) -> String {
    let issue = &event.issue;
    let mut buf = String::with_capacity(256);
    buf.push_str(&format!("💬 *New comment in {}*\n", issue_link(issue)));
    buf.push_str("*Issue*:\n");
    push_issue_block(&mut buf, issue, "  ");
    buf.push_str(&format!(
        "*Comment author*: {}\n",
        escape_markdown(&event.user.name)
    ));
    buf.push_str(&format!(
        "*Comment*: {}\n",
        escape_markdown(event.object_attributes.text())
    ));
    buf
}
