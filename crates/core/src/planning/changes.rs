use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::graph::{json_references, topological_order};
use crate::template::Template;

use super::error::{PlanningError, Result};

/// What the engine will do with a single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeAction {
    /// Resource is new.
    Create,
    /// Properties change in place.
    Update { changed: Vec<String> },
    /// A property that cannot change in place changed: delete and re-create.
    Replace { changed: Vec<String> },
    /// Resource left the template and will be deleted.
    Delete,
    /// Resource left the template but its deletion policy keeps it alive.
    Retain,
}

/// A planned change to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceChange {
    pub logical_id: String,
    pub resource_type: String,
    pub action: ChangeAction,
}

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeployPlan {
    /// Nothing is deployed yet; every resource is created.
    CreateStack { changes: Vec<ResourceChange> },
    /// The stack exists and some resources or stack-level fields change.
    UpdateStack {
        changes: Vec<ResourceChange>,
        /// Changed stack-level fields: `Description` and `Outputs.<id>`.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        stack_changes: Vec<String>,
    },
    /// The deployed template already matches.
    NoChanges,
}

impl DeployPlan {
    pub fn changes(&self) -> &[ResourceChange] {
        match self {
            DeployPlan::CreateStack { changes } | DeployPlan::UpdateStack { changes, .. } => {
                changes
            }
            DeployPlan::NoChanges => &[],
        }
    }
}

/// Plan for tearing a stack down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DestroyPlan {
    /// Resources are deleted (or retained) in reverse dependency order.
    DeleteStack { changes: Vec<ResourceChange> },
    /// Nothing is deployed.
    AlreadyGone,
}

/// Properties that cannot be updated in place, per resource type.
const REPLACEMENT_PROPERTIES: &[(&str, &[&str])] = &[
    ("AWS::DynamoDB::Table", &["TableName", "KeySchema"]),
    ("AWS::AppSync::ApiKey", &["ApiId"]),
    ("AWS::AppSync::GraphQLSchema", &["ApiId"]),
    ("AWS::AppSync::DataSource", &["ApiId", "Name"]),
    ("AWS::IAM::Role", &["RoleName", "Path"]),
];

/// Returns true if changing `property` on a `resource_type` forces replacement.
pub fn requires_replacement(resource_type: &str, property: &str) -> bool {
    REPLACEMENT_PROPERTIES
        .iter()
        .find(|(candidate, _)| *candidate == resource_type)
        .is_some_and(|(_, properties)| properties.contains(&property))
}

/// A resource as it appears in a template's JSON.
#[derive(Debug, Clone)]
struct TemplateEntry {
    resource_type: String,
    properties: Value,
    deletion_policy: Option<String>,
    update_replace_policy: Option<String>,
}

impl TemplateEntry {
    fn retained(&self) -> bool {
        self.deletion_policy.as_deref() == Some("Retain")
    }
}

/// Pure function: calculate what changes are needed to reach the desired template.
pub fn calculate_deploy_plan(current: Option<&Value>, desired: &Template) -> Result<DeployPlan> {
    let desired_value = desired.to_value()?;
    let desired = parse_resources(&desired_value)?;
    let desired_order = dependency_order(&desired)?;

    let Some(current_value) = current else {
        let changes = desired_order
            .into_iter()
            .map(|id| change(&desired, id, ChangeAction::Create))
            .collect();
        return Ok(DeployPlan::CreateStack { changes });
    };

    let current = parse_resources(current_value)?;
    let current_order = dependency_order(&current)?;
    let mut changes = Vec::new();
    // Dependencies are visited first, so `replaced` already holds every
    // replaced resource a later one can reference.
    let mut replaced = BTreeSet::new();

    for id in desired_order {
        let wanted = &desired[&id];
        let action = match current.get(&id) {
            None => Some(ChangeAction::Create),
            Some(deployed) if deployed.resource_type != wanted.resource_type => {
                Some(ChangeAction::Replace {
                    changed: vec!["Type".to_string()],
                })
            }
            Some(deployed) => resource_action(deployed, wanted, &replaced),
        };
        if let Some(action) = action {
            if matches!(action, ChangeAction::Replace { .. }) {
                replaced.insert(id.clone());
            }
            changes.push(change(&desired, id, action));
        }
    }

    for id in current_order.into_iter().rev() {
        if !desired.contains_key(&id) {
            let action = removal_action(&current[&id]);
            changes.push(change(&current, id, action));
        }
    }

    let stack_changes = stack_level_changes(current_value, &desired_value);

    if changes.is_empty() && stack_changes.is_empty() {
        Ok(DeployPlan::NoChanges)
    } else {
        Ok(DeployPlan::UpdateStack {
            changes,
            stack_changes,
        })
    }
}

/// Action for a resource present in both templates with the same type.
///
/// Properties that reference a replaced resource count as changed, since the
/// engine resolves them to the new physical resource.
fn resource_action(
    deployed: &TemplateEntry,
    wanted: &TemplateEntry,
    replaced: &BTreeSet<String>,
) -> Option<ChangeAction> {
    let mut properties: BTreeSet<String> =
        changed_properties(&deployed.properties, &wanted.properties)
            .into_iter()
            .collect();
    properties.extend(properties_referencing(&wanted.properties, replaced));

    let replace = properties
        .iter()
        .any(|property| requires_replacement(&wanted.resource_type, property));

    let mut changed: Vec<String> = properties.into_iter().collect();
    if deployed.deletion_policy != wanted.deletion_policy {
        changed.push("DeletionPolicy".to_string());
    }
    if deployed.update_replace_policy != wanted.update_replace_policy {
        changed.push("UpdateReplacePolicy".to_string());
    }

    if changed.is_empty() {
        None
    } else if replace {
        Some(ChangeAction::Replace { changed })
    } else {
        Some(ChangeAction::Update { changed })
    }
}

/// Top-level properties whose value `Ref`s or `Fn::GetAtt`s one of `targets`.
fn properties_referencing(properties: &Value, targets: &BTreeSet<String>) -> Vec<String> {
    if targets.is_empty() {
        return Vec::new();
    }
    let Some(properties) = properties.as_object() else {
        return Vec::new();
    };
    properties
        .iter()
        .filter(|(_, value)| !json_references(value).is_disjoint(targets))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Stack-level fields that differ: `Description` and each changed output.
fn stack_level_changes(current: &Value, desired: &Value) -> Vec<String> {
    let mut changed = Vec::new();
    if current.get("Description") != desired.get("Description") {
        changed.push("Description".to_string());
    }

    let outputs = |template: &Value| {
        template
            .get("Outputs")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    };
    let (current, desired) = (outputs(current), outputs(desired));
    let keys: BTreeSet<&String> = current.keys().chain(desired.keys()).collect();
    changed.extend(
        keys.into_iter()
            .filter(|key| current.get(*key) != desired.get(*key))
            .map(|key| format!("Outputs.{key}")),
    );
    changed
}

/// Pure function: calculate the destroy plan for what is deployed.
pub fn calculate_destroy_plan(current: Option<&Value>) -> Result<DestroyPlan> {
    let Some(current) = current else {
        return Ok(DestroyPlan::AlreadyGone);
    };

    let current = parse_resources(current)?;
    if current.is_empty() {
        return Ok(DestroyPlan::AlreadyGone);
    }

    let changes = dependency_order(&current)?
        .into_iter()
        .rev()
        .map(|id| {
            let action = removal_action(&current[&id]);
            change(&current, id, action)
        })
        .collect();

    Ok(DestroyPlan::DeleteStack { changes })
}

fn change(
    resources: &BTreeMap<String, TemplateEntry>,
    id: String,
    action: ChangeAction,
) -> ResourceChange {
    ResourceChange {
        resource_type: resources[&id].resource_type.clone(),
        logical_id: id,
        action,
    }
}

fn removal_action(entry: &TemplateEntry) -> ChangeAction {
    if entry.retained() {
        ChangeAction::Retain
    } else {
        ChangeAction::Delete
    }
}

fn parse_resources(template: &Value) -> Result<BTreeMap<String, TemplateEntry>> {
    let resources = template
        .get("Resources")
        .and_then(Value::as_object)
        .ok_or_else(|| PlanningError::InvalidTemplate("missing Resources object".to_string()))?;

    resources
        .iter()
        .map(|(id, resource)| {
            let resource_type = resource
                .get("Type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    PlanningError::InvalidTemplate(format!("resource '{id}' has no Type"))
                })?;
            let entry = TemplateEntry {
                resource_type: resource_type.to_string(),
                properties: resource.get("Properties").cloned().unwrap_or(Value::Null),
                deletion_policy: policy(resource, "DeletionPolicy"),
                update_replace_policy: policy(resource, "UpdateReplacePolicy"),
            };
            Ok((id.clone(), entry))
        })
        .collect()
}

fn policy(resource: &Value, key: &str) -> Option<String> {
    resource.get(key).and_then(Value::as_str).map(str::to_string)
}

fn dependency_order(resources: &BTreeMap<String, TemplateEntry>) -> Result<Vec<String>> {
    let edges: BTreeMap<String, BTreeSet<String>> = resources
        .iter()
        .map(|(id, entry)| (id.clone(), json_references(&entry.properties)))
        .collect();
    Ok(topological_order(&edges)?)
}

/// Names of top-level properties whose values differ, sorted.
fn changed_properties(current: &Value, desired: &Value) -> Vec<String> {
    match (current.as_object(), desired.as_object()) {
        (Some(current), Some(desired)) => {
            let keys: BTreeSet<&String> = current.keys().chain(desired.keys()).collect();
            keys.into_iter()
                .filter(|key| current.get(*key) != desired.get(*key))
                .cloned()
                .collect()
        }
        _ if current != desired => vec!["Properties".to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::football::{football_stack, DEFAULT_STACK_ID};
    use crate::stack::StackProps;
    use serde_json::json;

    fn desired() -> Template {
        football_stack(DEFAULT_STACK_ID, StackProps::default())
            .unwrap()
            .synth()
            .unwrap()
    }

    fn deployed() -> Value {
        desired().to_value().unwrap()
    }

    fn actions(plan: &DeployPlan) -> Vec<(&str, &ChangeAction)> {
        plan.changes()
            .iter()
            .map(|c| (c.logical_id.as_str(), &c.action))
            .collect()
    }

    #[test]
    fn test_nothing_deployed_creates_everything_in_order() {
        let plan = calculate_deploy_plan(None, &desired()).unwrap();
        let DeployPlan::CreateStack { changes } = &plan else {
            panic!("expected CreateStack, got {plan:?}");
        };
        assert_eq!(changes.len(), 7);
        assert!(changes.iter().all(|c| c.action == ChangeAction::Create));

        let position = |id: &str| changes.iter().position(|c| c.logical_id == id).unwrap();
        assert!(position("ItemsDynamoDBRole") < position("PlayersDataSource"));
        assert!(position("FootballApi") < position("FootballApiKey"));
    }

    #[test]
    fn test_identical_template_has_no_changes() {
        let current = deployed();
        assert_eq!(
            calculate_deploy_plan(Some(&current), &desired()).unwrap(),
            DeployPlan::NoChanges
        );
    }

    #[test]
    fn test_table_rename_requires_replacement() {
        let mut current = deployed();
        current["Resources"]["MlsFootballGames"]["Properties"]["TableName"] = json!("games-v0");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![(
                "MlsFootballGames",
                &ChangeAction::Replace {
                    changed: vec!["TableName".to_string()]
                }
            )]
        );
    }

    #[test]
    fn test_table_replacement_updates_data_source() {
        let mut current = deployed();
        current["Resources"]["MlsFootballPlayers"]["Properties"]["TableName"] = json!("player-v0");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![
                (
                    "MlsFootballPlayers",
                    &ChangeAction::Replace {
                        changed: vec!["TableName".to_string()]
                    }
                ),
                (
                    "PlayersDataSource",
                    &ChangeAction::Update {
                        changed: vec!["DynamoDBConfig".to_string()]
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_api_replacement_cascades_to_children() {
        let mut current = deployed();
        current["Resources"]["FootballApi"]["Type"] = json!("AWS::AppSync::Api");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        let api_id = ChangeAction::Replace {
            changed: vec!["ApiId".to_string()],
        };
        assert_eq!(
            actions(&plan),
            vec![
                (
                    "FootballApi",
                    &ChangeAction::Replace {
                        changed: vec!["Type".to_string()]
                    }
                ),
                ("FootballApiKey", &api_id),
                ("FootballSchema", &api_id),
                ("PlayersDataSource", &api_id),
            ]
        );
    }

    #[test]
    fn test_deletion_policy_change_is_update() {
        let mut current = deployed();
        current["Resources"]["MlsFootballPlayers"]["DeletionPolicy"] = json!("Retain");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![(
                "MlsFootballPlayers",
                &ChangeAction::Update {
                    changed: vec!["DeletionPolicy".to_string()]
                }
            )]
        );
    }

    #[test]
    fn test_stack_level_changes_update_stack() {
        let mut current = deployed();
        current["Outputs"]
            .as_object_mut()
            .unwrap()
            .remove("GraphQLApiKey");
        current["Description"] = json!("Previous description");

        assert_eq!(
            calculate_deploy_plan(Some(&current), &desired()).unwrap(),
            DeployPlan::UpdateStack {
                changes: Vec::new(),
                stack_changes: vec![
                    "Description".to_string(),
                    "Outputs.GraphQLApiKey".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_api_auth_change_is_in_place_update() {
        let mut current = deployed();
        current["Resources"]["FootballApi"]["Properties"]["AuthenticationType"] = json!("AWS_IAM");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![(
                "FootballApi",
                &ChangeAction::Update {
                    changed: vec!["AuthenticationType".to_string()]
                }
            )]
        );
    }

    #[test]
    fn test_type_change_requires_replacement() {
        let mut current = deployed();
        current["Resources"]["FootballApiKey"]["Type"] = json!("AWS::AppSync::DomainName");

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![(
                "FootballApiKey",
                &ChangeAction::Replace {
                    changed: vec!["Type".to_string()]
                }
            )]
        );
    }

    #[test]
    fn test_removed_resources_are_deleted_or_retained() {
        let mut current = deployed();
        let resources = current["Resources"].as_object_mut().unwrap();
        resources.insert(
            "LegacyQueue".to_string(),
            json!({ "Type": "AWS::SQS::Queue", "Properties": { "VisibilityTimeout": 300 } }),
        );
        resources.insert(
            "LegacyTable".to_string(),
            json!({
                "Type": "AWS::DynamoDB::Table",
                "Properties": { "TableName": "legacy" },
                "DeletionPolicy": "Retain"
            }),
        );

        let plan = calculate_deploy_plan(Some(&current), &desired()).unwrap();
        assert_eq!(
            actions(&plan),
            vec![
                ("LegacyTable", &ChangeAction::Retain),
                ("LegacyQueue", &ChangeAction::Delete),
            ]
        );
        assert_eq!(plan.changes()[1].resource_type, "AWS::SQS::Queue");
    }

    #[test]
    fn test_invalid_current_template_is_rejected() {
        let err = calculate_deploy_plan(Some(&json!({ "Foo": 1 })), &desired()).unwrap_err();
        assert_eq!(
            err,
            PlanningError::InvalidTemplate("missing Resources object".to_string())
        );

        let missing_type = json!({ "Resources": { "Thing": { "Properties": {} } } });
        assert!(matches!(
            calculate_deploy_plan(Some(&missing_type), &desired()),
            Err(PlanningError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_destroy_plan_reverses_dependency_order() {
        let current = deployed();
        let DestroyPlan::DeleteStack { changes } = calculate_destroy_plan(Some(&current)).unwrap()
        else {
            panic!("expected DeleteStack");
        };

        assert_eq!(changes.len(), 7);
        assert!(changes.iter().all(|c| c.action == ChangeAction::Delete));
        let position = |id: &str| changes.iter().position(|c| c.logical_id == id).unwrap();
        assert!(position("PlayersDataSource") < position("ItemsDynamoDBRole"));
        assert!(position("PlayersDataSource") < position("MlsFootballPlayers"));
        assert!(position("FootballApiKey") < position("FootballApi"));
    }

    #[test]
    fn test_destroy_plan_when_nothing_deployed() {
        assert_eq!(calculate_destroy_plan(None).unwrap(), DestroyPlan::AlreadyGone);
        assert_eq!(
            calculate_destroy_plan(Some(&json!({ "Resources": {} }))).unwrap(),
            DestroyPlan::AlreadyGone
        );
    }

    #[test]
    fn test_cycle_in_current_template_is_reported() {
        let current = json!({
            "Resources": {
                "A": { "Type": "AWS::IAM::Role", "Properties": { "X": { "Ref": "B" } } },
                "B": { "Type": "AWS::IAM::Role", "Properties": { "X": { "Ref": "A" } } }
            }
        });
        assert!(matches!(
            calculate_destroy_plan(Some(&current)),
            Err(PlanningError::DependencyCycle(_))
        ));
    }

    #[test]
    fn test_requires_replacement_table() {
        assert!(requires_replacement("AWS::DynamoDB::Table", "KeySchema"));
        assert!(!requires_replacement("AWS::DynamoDB::Table", "BillingMode"));
        assert!(requires_replacement("AWS::AppSync::DataSource", "Name"));
        assert!(!requires_replacement("AWS::AppSync::GraphQLApi", "Name"));
        assert!(!requires_replacement("AWS::SQS::Queue", "QueueName"));
    }

    #[test]
    fn test_plan_serializes_with_tags() {
        let plan = DeployPlan::UpdateStack {
            stack_changes: Vec::new(),
            changes: vec![ResourceChange {
                logical_id: "FootballApi".to_string(),
                resource_type: "AWS::AppSync::GraphQLApi".to_string(),
                action: ChangeAction::Update {
                    changed: vec!["Name".to_string()],
                },
            }],
        };
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({
                "status": "update_stack",
                "changes": [{
                    "logical_id": "FootballApi",
                    "resource_type": "AWS::AppSync::GraphQLApi",
                    "action": { "kind": "update", "changed": ["Name"] }
                }]
            })
        );
        assert_eq!(
            serde_json::to_value(DestroyPlan::AlreadyGone).unwrap(),
            json!({ "status": "already_gone" })
        );
    }
}
