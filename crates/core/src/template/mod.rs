//! The synthesized template handed to the provisioning engine.

mod expr;
mod logical_id;
mod resource;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

pub use expr::{Expr, PseudoParameter};
pub use logical_id::LogicalId;
pub use resource::{
    ApiKeyProperties, AttributeDefinition, DataSourceProperties, DeletionPolicy, DynamoDbConfig,
    GraphQlApiProperties, GraphQlSchemaProperties, KeySchemaElement, PolicyDocument,
    PolicyStatement, Principal, ProvisionedThroughput, ResourceProperties, ResourceType,
    RoleProperties, TableProperties, TemplateResource,
};

use crate::error::{CompositionError, Result};
use crate::graph;

/// A stack output exported after deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Expr,
}

/// A complete resource template.
///
/// Resources and outputs are kept in ordered maps so that serializing the
/// same template always yields the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeMap<LogicalId, TemplateResource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<LogicalId, Output>,
}

impl Template {
    /// Returns the resources of the given type.
    pub fn resources_of_type(
        &self,
        resource_type: ResourceType,
    ) -> impl Iterator<Item = (&LogicalId, &TemplateResource)> {
        self.resources
            .iter()
            .filter(move |(_, resource)| resource.resource_type == resource_type)
    }

    /// Returns the resource with the given logical id.
    pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
        self.resources.get(id)
    }

    /// Dependency edges: each resource mapped to the resources it references.
    pub fn dependencies(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.resources
            .iter()
            .map(|(id, resource)| {
                let deps = resource
                    .references()
                    .into_iter()
                    .map(|r| r.as_str().to_string())
                    .collect();
                (id.as_str().to_string(), deps)
            })
            .collect()
    }

    /// Resource ids ordered so that every resource follows the ones it references.
    pub fn dependency_order(&self) -> Result<Vec<String>> {
        graph::topological_order(&self.dependencies())
            .map_err(|cycle| CompositionError::DependencyCycle(cycle.to_string()))
    }

    /// Checks that every `Ref` / `Fn::GetAtt` points at a declared resource.
    pub fn check_references(&self) -> Result<()> {
        for (id, resource) in &self.resources {
            for target in resource.references() {
                if !self.resources.contains_key(target) {
                    return Err(CompositionError::DanglingReference {
                        from: id.to_string(),
                        to: target.to_string(),
                        expected: "a resource",
                    });
                }
            }
        }
        for (id, output) in &self.outputs {
            for target in output.value.references() {
                if !self.resources.contains_key(target) {
                    return Err(CompositionError::DanglingReference {
                        from: id.to_string(),
                        to: target.to_string(),
                        expected: "a resource",
                    });
                }
            }
        }
        Ok(())
    }

    /// Serializes the template as JSON.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| CompositionError::Serialization(e.to_string()))
    }

    /// Serializes the template as indented JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| CompositionError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> LogicalId {
        LogicalId::new(value).unwrap()
    }

    fn api() -> TemplateResource {
        TemplateResource::new(ResourceProperties::GraphQlApi(GraphQlApiProperties {
            authentication_type: "API_KEY",
            name: "football-api".to_string(),
        }))
    }

    fn api_key(api: &str) -> TemplateResource {
        TemplateResource::new(ResourceProperties::ApiKey(ApiKeyProperties {
            api_id: Expr::GetAtt(id(api), "ApiId"),
            description: None,
        }))
    }

    #[test]
    fn test_dependency_order_places_api_before_key() {
        let mut template = Template::default();
        template.resources.insert(id("AKey"), api_key("ZApi"));
        template.resources.insert(id("ZApi"), api());

        assert_eq!(template.dependency_order().unwrap(), vec!["ZApi", "AKey"]);
    }

    #[test]
    fn test_check_references_reports_dangling_ref() {
        let mut template = Template::default();
        template.resources.insert(id("FootballApiKey"), api_key("FootballApi"));

        assert_eq!(
            template.check_references(),
            Err(CompositionError::DanglingReference {
                from: "FootballApiKey".to_string(),
                to: "FootballApi".to_string(),
                expected: "a resource",
            })
        );
    }

    #[test]
    fn test_check_references_covers_outputs() {
        let mut template = Template::default();
        template.outputs.insert(
            id("GraphQLApiUrl"),
            Output {
                description: None,
                value: Expr::GetAtt(id("FootballApi"), "GraphQLUrl"),
            },
        );
        assert!(template.check_references().is_err());

        template.resources.insert(id("FootballApi"), api());
        assert!(template.check_references().is_ok());
    }

    #[test]
    fn test_empty_outputs_and_description_are_omitted() {
        let mut template = Template::default();
        template.resources.insert(id("FootballApi"), api());

        let value = template.to_value().unwrap();
        assert!(value.get("Outputs").is_none());
        assert!(value.get("Description").is_none());
        assert!(value["Resources"]["FootballApi"].is_object());
    }

    #[test]
    fn test_pretty_json_ends_with_newline() {
        let json = Template::default().to_json_pretty().unwrap();
        assert!(json.ends_with("}\n"));
    }
}
