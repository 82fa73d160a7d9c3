//! Resource entries as the provisioning engine reads them.

use serde::Serialize;

use super::{Expr, LogicalId};

/// Resource types this stack can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceType {
    #[serde(rename = "AWS::DynamoDB::Table")]
    DynamoDbTable,
    #[serde(rename = "AWS::AppSync::GraphQLApi")]
    GraphQlApi,
    #[serde(rename = "AWS::AppSync::ApiKey")]
    ApiKey,
    #[serde(rename = "AWS::AppSync::GraphQLSchema")]
    GraphQlSchema,
    #[serde(rename = "AWS::IAM::Role")]
    IamRole,
    #[serde(rename = "AWS::AppSync::DataSource")]
    DataSource,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::DynamoDbTable => "AWS::DynamoDB::Table",
            ResourceType::GraphQlApi => "AWS::AppSync::GraphQLApi",
            ResourceType::ApiKey => "AWS::AppSync::ApiKey",
            ResourceType::GraphQlSchema => "AWS::AppSync::GraphQLSchema",
            ResourceType::IamRole => "AWS::IAM::Role",
            ResourceType::DataSource => "AWS::AppSync::DataSource",
        }
    }
}

/// What the engine does with a resource that leaves the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
}

/// A single entry of the template's `Resources` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: ResourceType,
    pub properties: ResourceProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
}

impl TemplateResource {
    /// Wraps properties, deriving the resource type from them.
    pub fn new(properties: ResourceProperties) -> Self {
        Self {
            resource_type: properties.resource_type(),
            properties,
            update_replace_policy: None,
            deletion_policy: None,
        }
    }

    /// Applies the same policy on replacement and on deletion.
    pub fn with_removal_policy(mut self, policy: DeletionPolicy) -> Self {
        self.update_replace_policy = Some(policy);
        self.deletion_policy = Some(policy);
        self
    }

    /// Logical ids this resource depends on through `Ref` / `Fn::GetAtt`.
    pub fn references(&self) -> Vec<&LogicalId> {
        self.properties.references()
    }
}

/// Typed property bags, one per resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceProperties {
    Table(TableProperties),
    GraphQlApi(GraphQlApiProperties),
    ApiKey(ApiKeyProperties),
    GraphQlSchema(GraphQlSchemaProperties),
    Role(RoleProperties),
    DataSource(DataSourceProperties),
}

impl ResourceProperties {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceProperties::Table(_) => ResourceType::DynamoDbTable,
            ResourceProperties::GraphQlApi(_) => ResourceType::GraphQlApi,
            ResourceProperties::ApiKey(_) => ResourceType::ApiKey,
            ResourceProperties::GraphQlSchema(_) => ResourceType::GraphQlSchema,
            ResourceProperties::Role(_) => ResourceType::IamRole,
            ResourceProperties::DataSource(_) => ResourceType::DataSource,
        }
    }

    fn references(&self) -> Vec<&LogicalId> {
        match self {
            ResourceProperties::Table(_) | ResourceProperties::GraphQlApi(_) => Vec::new(),
            ResourceProperties::ApiKey(props) => props.api_id.references(),
            ResourceProperties::GraphQlSchema(props) => props.api_id.references(),
            ResourceProperties::Role(props) => props
                .managed_policy_arns
                .iter()
                .flat_map(Expr::references)
                .collect(),
            ResourceProperties::DataSource(props) => {
                let mut refs = props.api_id.references();
                refs.extend(props.dynamo_db_config.table_name.references());
                refs.extend(props.dynamo_db_config.aws_region.references());
                refs.extend(props.service_role_arn.references());
                refs
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableProperties {
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub billing_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    pub read_capacity_units: u64,
    pub write_capacity_units: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GraphQlApiProperties {
    pub authentication_type: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiKeyProperties {
    pub api_id: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GraphQlSchemaProperties {
    pub api_id: Expr,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub assume_role_policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub statement: Vec<PolicyStatement>,
    pub version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: &'static str,
    pub effect: &'static str,
    pub principal: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataSourceProperties {
    pub api_id: Expr,
    pub name: String,
    #[serde(rename = "Type")]
    pub source_type: &'static str,
    #[serde(rename = "DynamoDBConfig")]
    pub dynamo_db_config: DynamoDbConfig,
    pub service_role_arn: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DynamoDbConfig {
    pub aws_region: Expr,
    pub table_name: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PseudoParameter;
    use serde_json::json;

    #[test]
    fn test_resource_type_matches_properties() {
        let resource = TemplateResource::new(ResourceProperties::GraphQlApi(GraphQlApiProperties {
            authentication_type: "API_KEY",
            name: "football-api".to_string(),
        }));
        assert_eq!(resource.resource_type, ResourceType::GraphQlApi);
        assert_eq!(resource.resource_type.as_str(), "AWS::AppSync::GraphQLApi");
    }

    #[test]
    fn test_serializes_type_properties_and_policies() {
        let resource = TemplateResource::new(ResourceProperties::Table(TableProperties {
            key_schema: vec![KeySchemaElement {
                attribute_name: "GamesId".to_string(),
                key_type: "HASH",
            }],
            attribute_definitions: vec![AttributeDefinition {
                attribute_name: "GamesId".to_string(),
                attribute_type: "S",
            }],
            billing_mode: "PAY_PER_REQUEST",
            provisioned_throughput: None,
            table_name: "Games".to_string(),
        }))
        .with_removal_policy(DeletionPolicy::Delete);

        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "Type": "AWS::DynamoDB::Table",
                "Properties": {
                    "KeySchema": [{ "AttributeName": "GamesId", "KeyType": "HASH" }],
                    "AttributeDefinitions": [{ "AttributeName": "GamesId", "AttributeType": "S" }],
                    "BillingMode": "PAY_PER_REQUEST",
                    "TableName": "Games"
                },
                "UpdateReplacePolicy": "Delete",
                "DeletionPolicy": "Delete"
            })
        );
    }

    #[test]
    fn test_data_source_references_api_table_and_role() {
        let id = |s: &str| LogicalId::new(s).unwrap();
        let resource = TemplateResource::new(ResourceProperties::DataSource(DataSourceProperties {
            api_id: Expr::GetAtt(id("FootballApi"), "ApiId"),
            name: "PlayersDynamoDataSource".to_string(),
            source_type: "AMAZON_DYNAMODB",
            dynamo_db_config: DynamoDbConfig {
                aws_region: Expr::Pseudo(PseudoParameter::Region),
                table_name: Expr::Ref(id("MlsFootballPlayers")),
            },
            service_role_arn: Expr::GetAtt(id("ItemsDynamoDBRole"), "Arn"),
        }));
        let refs: Vec<&str> = resource.references().iter().map(|r| r.as_str()).collect();
        assert_eq!(refs, vec!["FootballApi", "MlsFootballPlayers", "ItemsDynamoDBRole"]);
    }
}
