use directory::{LookupError, UserDirectory};
use events::{Event, ResolvedNames};

/// Fills in display names for the assignees, author and last editor of the
/// event's issue. Stops at the first failed lookup.
pub async fn resolve_names(directory: &UserDirectory, event: &mut Event) -> Result<(), LookupError> {
    let issue = event.issue_mut();

    let mut assignees = Vec::with_capacity(issue.assignee_ids.len());
    for id in &issue.assignee_ids {
        assignees.push(directory.name_by_id(*id).await?);
    }
    let author = directory.name_by_id(issue.author_id).await?;
    let editor = directory.name_by_id(issue.updated_by_id).await?;

    issue.resolved = ResolvedNames {
        author,
        editor,
        assignees,
    };
    Ok(())
}
