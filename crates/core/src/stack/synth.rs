//! Mapping from graph nodes to template resources.

use crate::resources::{
    ApiKeySpec, ApiSpec, BillingMode, DataSourceBinding, RemovalPolicy, RoleSpec, TableSpec,
};
use crate::schema::{render_sdl, SchemaDefinition};
use crate::template::{
    ApiKeyProperties, AttributeDefinition, DataSourceProperties, DeletionPolicy, DynamoDbConfig,
    Expr, GraphQlApiProperties, GraphQlSchemaProperties, KeySchemaElement, LogicalId,
    PolicyDocument, PolicyStatement, Principal, ProvisionedThroughput, ResourceProperties,
    RoleProperties, TableProperties, Template, TemplateResource,
};

use super::composer::{Node, Stack};

const POLICY_VERSION: &str = "2012-10-17";

/// Converts a validated stack into its template. This is a pure function.
pub(super) fn synthesize(stack: &Stack) -> Template {
    let resources = stack
        .nodes()
        .iter()
        .map(|(id, node)| (id.clone(), to_resource(node)))
        .collect();

    Template {
        description: stack.props().description.clone(),
        resources,
        outputs: stack.outputs().clone(),
    }
}

fn to_resource(node: &Node) -> TemplateResource {
    match node {
        Node::Table(table) => table_resource(table),
        Node::GraphQlApi(api) => api_resource(api),
        Node::ApiKey { api, key } => api_key_resource(api, key),
        Node::Schema { api, definition } => schema_resource(api, definition),
        Node::Role(role) => role_resource(role),
        Node::Binding(binding) => binding_resource(binding),
    }
}

fn table_resource(table: &TableSpec) -> TemplateResource {
    let key = table.partition_key();
    let provisioned_throughput = match table.billing_mode() {
        BillingMode::PayPerRequest => None,
        BillingMode::Provisioned {
            read_capacity_units,
            write_capacity_units,
        } => Some(ProvisionedThroughput {
            read_capacity_units,
            write_capacity_units,
        }),
    };

    TemplateResource::new(ResourceProperties::Table(TableProperties {
        key_schema: vec![KeySchemaElement {
            attribute_name: key.name.clone(),
            key_type: "HASH",
        }],
        attribute_definitions: vec![AttributeDefinition {
            attribute_name: key.name.clone(),
            attribute_type: key.attribute_type.code(),
        }],
        billing_mode: table.billing_mode().as_str(),
        provisioned_throughput,
        table_name: table.name().to_string(),
    }))
    .with_removal_policy(to_deletion_policy(table.removal_policy()))
}

fn api_resource(api: &ApiSpec) -> TemplateResource {
    TemplateResource::new(ResourceProperties::GraphQlApi(GraphQlApiProperties {
        authentication_type: api.authentication_type.as_str(),
        name: api.name.clone(),
    }))
}

fn api_key_resource(api: &LogicalId, key: &ApiKeySpec) -> TemplateResource {
    TemplateResource::new(ResourceProperties::ApiKey(ApiKeyProperties {
        api_id: api_id(api),
        description: key.description.clone(),
    }))
}

fn schema_resource(api: &LogicalId, definition: &SchemaDefinition) -> TemplateResource {
    TemplateResource::new(ResourceProperties::GraphQlSchema(GraphQlSchemaProperties {
        api_id: api_id(api),
        definition: render_sdl(definition),
    }))
}

fn role_resource(role: &RoleSpec) -> TemplateResource {
    TemplateResource::new(ResourceProperties::Role(RoleProperties {
        assume_role_policy_document: PolicyDocument {
            statement: vec![PolicyStatement {
                action: "sts:AssumeRole",
                effect: "Allow",
                principal: Principal {
                    service: role.trusted_principal.as_str().to_string(),
                },
            }],
            version: POLICY_VERSION,
        },
        description: role.description.clone(),
        managed_policy_arns: role.managed_policies.iter().map(|p| p.arn()).collect(),
    }))
}

fn binding_resource(binding: &DataSourceBinding) -> TemplateResource {
    TemplateResource::new(ResourceProperties::DataSource(DataSourceProperties {
        api_id: api_id(&binding.api),
        name: binding.name.clone(),
        source_type: binding.source_type.as_str(),
        dynamo_db_config: DynamoDbConfig {
            aws_region: binding.region.clone(),
            table_name: Expr::Ref(binding.table.clone()),
        },
        service_role_arn: binding.service_role_arn.clone(),
    }))
}

fn api_id(api: &LogicalId) -> Expr {
    Expr::GetAtt(api.clone(), "ApiId")
}

fn to_deletion_policy(policy: RemovalPolicy) -> DeletionPolicy {
    match policy {
        RemovalPolicy::Destroy => DeletionPolicy::Delete,
        RemovalPolicy::Retain => DeletionPolicy::Retain,
    }
}
