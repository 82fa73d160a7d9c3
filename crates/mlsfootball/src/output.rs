//! Output formatting functions.

use mlsfootball_core::{Result, StackProps, Template};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::prelude::{p_b, p_g, p_r, p_y};

/// Format a value for output.
pub fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// A resource in the summary, listed in deploy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    pub logical_id: String,
    pub resource_type: String,
}

/// What `validate` reports about a composed stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSummary {
    pub stack: String,
    pub target: String,
    pub resources: Vec<ResourceSummary>,
    pub outputs: Vec<String>,
}

impl StackSummary {
    pub fn new(stack_id: &str, props: &StackProps, template: &Template) -> Result<Self> {
        let resources = template
            .dependency_order()?
            .into_iter()
            .filter_map(|id| {
                template.resource(&id).map(|resource| ResourceSummary {
                    resource_type: resource.resource_type.as_str().to_string(),
                    logical_id: id,
                })
            })
            .collect();

        Ok(Self {
            stack: stack_id.to_string(),
            target: props.env.target_display(),
            resources,
            outputs: template.outputs.keys().map(|id| id.to_string()).collect(),
        })
    }
}

/// Format a stack summary for display.
pub fn format_summary(summary: &StackSummary) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", p_b("Stack:"), summary.stack),
        format!("{} {}", p_b("Target:"), summary.target),
        format!("RESOURCES ({})", summary.resources.len()),
    ];
    lines.extend(
        summary
            .resources
            .iter()
            .map(|r| format!("  {} ({})", r.logical_id, r.resource_type)),
    );
    lines.push(format!("OUTPUTS ({})", summary.outputs.len()));
    lines.extend(summary.outputs.iter().map(|o| format!("  {o}")));
    lines
}

/// Colors a plan line by its leading marker.
pub fn colorize_plan_line(line: &str) -> String {
    let marker = line.trim_start();
    if marker.starts_with("-/+") || marker.starts_with('~') {
        p_y(line)
    } else if marker.starts_with('+') {
        p_g(line)
    } else if marker.starts_with('-') {
        p_r(line)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::colors;
    use mlsfootball_core::{football_stack, DEFAULT_STACK_ID};

    fn summary() -> StackSummary {
        let props = StackProps::default();
        let template = football_stack(DEFAULT_STACK_ID, props.clone())
            .unwrap()
            .synth()
            .unwrap();
        StackSummary::new(DEFAULT_STACK_ID, &props, &template).unwrap()
    }

    #[test]
    fn test_summary_lists_resources_in_deploy_order() {
        let summary = summary();
        assert_eq!(summary.stack, "MlsFootballAppStack");
        assert_eq!(summary.target, "account: <unresolved>, region: <unresolved>");
        assert_eq!(summary.resources.len(), 7);
        assert_eq!(
            summary.resources.last().map(|r| r.logical_id.as_str()),
            Some("PlayersDataSource")
        );
        assert_eq!(
            summary.outputs,
            vec![
                "GamesTableName",
                "GraphQLApiId",
                "GraphQLApiKey",
                "GraphQLApiUrl",
                "PlayersTableName",
            ]
        );
    }

    #[test]
    fn test_format_summary_counts() {
        let lines = format_summary(&summary());
        assert!(lines.contains(&"RESOURCES (7)".to_string()));
        assert!(lines.contains(&"OUTPUTS (5)".to_string()));
        assert!(lines.contains(&"  FootballApi (AWS::AppSync::GraphQLApi)".to_string()));
    }

    #[test]
    fn test_json_summary_is_compact() {
        let json = format_output(&summary(), OutputFormat::Json);
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"stack\":\"MlsFootballAppStack\""));
    }

    #[test]
    fn test_colorize_plan_line() {
        assert!(colorize_plan_line("  + Games (AWS::DynamoDB::Table)").starts_with(colors::TKN_GREEN));
        assert!(colorize_plan_line("~ FootballApi (AWS::AppSync::GraphQLApi): Name")
            .starts_with(colors::TKN_YELLOW));
        assert!(colorize_plan_line("-/+ Games (AWS::DynamoDB::Table): TableName (requires replacement)")
            .starts_with(colors::TKN_YELLOW));
        assert!(colorize_plan_line("- Games (AWS::DynamoDB::Table)").starts_with(colors::TKN_RED));
        assert_eq!(colorize_plan_line("= Stack is up to date"), "= Stack is up to date");
    }
}
