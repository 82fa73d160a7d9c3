use super::changes::{ChangeAction, DeployPlan, DestroyPlan, ResourceChange};

const TABLE_TYPE: &str = "AWS::DynamoDB::Table";

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateStack { changes } => {
            let mut lines = vec![format!("+ Create stack ({} resources)", changes.len())];
            lines.extend(changes.iter().map(|change| format!("  {}", format_change(change))));
            lines
        }
        DeployPlan::UpdateStack {
            changes,
            stack_changes,
        } => {
            let mut lines = Vec::with_capacity(changes.len() + 1);
            if !stack_changes.is_empty() {
                lines.push(format!("~ Stack: {}", stack_changes.join(", ")));
            }
            lines.extend(changes.iter().map(format_change));
            lines
        }
        DeployPlan::NoChanges => vec!["= Stack is up to date".to_string()],
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteStack { changes } => changes
            .iter()
            .map(|change| {
                let holds_data = change.resource_type == TABLE_TYPE;
                match change.action {
                    ChangeAction::Delete if holds_data => {
                        format!("{} (ALL DATA WILL BE LOST)", format_change(change))
                    }
                    _ => format_change(change),
                }
            })
            .collect(),
        DestroyPlan::AlreadyGone => vec!["= Stack does not exist".to_string()],
    }
}

fn format_change(change: &ResourceChange) -> String {
    let ResourceChange {
        logical_id,
        resource_type,
        action,
    } = change;
    match action {
        ChangeAction::Create => format!("+ {logical_id} ({resource_type})"),
        ChangeAction::Update { changed } => {
            format!("~ {logical_id} ({resource_type}): {}", changed.join(", "))
        }
        ChangeAction::Replace { changed } => format!(
            "-/+ {logical_id} ({resource_type}): {} (requires replacement)",
            changed.join(", ")
        ),
        ChangeAction::Delete => format!("- {logical_id} ({resource_type})"),
        ChangeAction::Retain => {
            format!("= {logical_id} ({resource_type}): removed from stack, resource retained")
        }
    }
}
