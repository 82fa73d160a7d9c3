//! The stack composer: an in-memory resource graph keyed by logical id.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{CompositionError, Result};
use crate::resources::{
    is_valid_table_name, ApiKeySpec, ApiSpec, DataSourceBinding, DataSourceType, ManagedPolicy,
    RoleSpec, TableSpec,
};
use crate::schema::SchemaDefinition;
use crate::template::{Expr, LogicalId, Output, Template};

use super::props::StackProps;
use super::{synth, validation};

/// A node of the resource graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Table(TableSpec),
    GraphQlApi(ApiSpec),
    ApiKey {
        api: LogicalId,
        key: ApiKeySpec,
    },
    Schema {
        api: LogicalId,
        definition: SchemaDefinition,
    },
    Role(RoleSpec),
    Binding(DataSourceBinding),
}

impl Node {
    /// The API owning this node, for API children.
    pub fn parent_api(&self) -> Option<&LogicalId> {
        match self {
            Node::ApiKey { api, .. } => Some(api),
            Node::Schema { api, .. } => Some(api),
            Node::Binding(binding) => Some(&binding.api),
            Node::Table(_) | Node::GraphQlApi(_) | Node::Role(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Table(_) => "table",
            Node::GraphQlApi(_) => "graphql api",
            Node::ApiKey { .. } => "api key",
            Node::Schema { .. } => "schema",
            Node::Role(_) => "role",
            Node::Binding(_) => "data source",
        }
    }
}

/// Reference to a table node, returned by [`Stack::add_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef(LogicalId);

/// Reference to a GraphQL API node, returned by [`Stack::add_graphql_api`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRef(LogicalId);

/// Reference to an API key node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRef(LogicalId);

/// Reference to a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRef(LogicalId);

/// Reference to a role node, returned by [`Stack::add_role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef(LogicalId);

/// Reference to a data source binding node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRef(LogicalId);

impl TableRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }

    /// `{"Ref": id}`, which the engine resolves to the table name.
    pub fn table_name(&self) -> Expr {
        Expr::Ref(self.0.clone())
    }
}

impl ApiRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }

    pub fn api_id(&self) -> Expr {
        Expr::GetAtt(self.0.clone(), "ApiId")
    }

    pub fn graphql_url(&self) -> Expr {
        Expr::GetAtt(self.0.clone(), "GraphQLUrl")
    }
}

impl ApiKeyRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }

    pub fn api_key(&self) -> Expr {
        Expr::GetAtt(self.0.clone(), "ApiKey")
    }
}

impl SchemaRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }
}

impl RoleRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }

    pub fn role_arn(&self) -> Expr {
        Expr::GetAtt(self.0.clone(), "Arn")
    }
}

impl BindingRef {
    pub fn id(&self) -> &LogicalId {
        &self.0
    }
}

/// A stack under composition.
///
/// Nodes are added through the `add_*` methods, which reject invalid or
/// duplicate logical ids right away. Whole-graph rules are checked by
/// [`Stack::synth`].
#[derive(Debug, Clone)]
pub struct Stack {
    id: String,
    props: StackProps,
    nodes: BTreeMap<LogicalId, Node>,
    outputs: BTreeMap<LogicalId, Output>,
}

impl Stack {
    pub fn new(id: impl Into<String>, props: StackProps) -> Self {
        Self {
            id: id.into(),
            props,
            nodes: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> &StackProps {
        &self.props
    }

    pub fn nodes(&self) -> &BTreeMap<LogicalId, Node> {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn outputs(&self) -> &BTreeMap<LogicalId, Output> {
        &self.outputs
    }

    pub fn add_table(&mut self, id: &str, table: TableSpec) -> Result<TableRef> {
        if !is_valid_table_name(table.name()) {
            return Err(CompositionError::InvalidTableName(table.name().to_string()));
        }
        self.insert(id, Node::Table(table)).map(TableRef)
    }

    pub fn add_graphql_api(&mut self, id: &str, api: ApiSpec) -> Result<ApiRef> {
        self.insert(id, Node::GraphQlApi(api)).map(ApiRef)
    }

    pub fn add_api_key(&mut self, id: &str, api: &ApiRef, key: ApiKeySpec) -> Result<ApiKeyRef> {
        let node = Node::ApiKey {
            api: api.id().clone(),
            key,
        };
        self.insert(id, node).map(ApiKeyRef)
    }

    pub fn add_schema(
        &mut self,
        id: &str,
        api: &ApiRef,
        definition: SchemaDefinition,
    ) -> Result<SchemaRef> {
        let node = Node::Schema {
            api: api.id().clone(),
            definition,
        };
        self.insert(id, node).map(SchemaRef)
    }

    pub fn add_role(&mut self, id: &str, role: RoleSpec) -> Result<RoleRef> {
        self.insert(id, Node::Role(role)).map(RoleRef)
    }

    /// Attaches a managed policy to a role already in the stack.
    pub fn add_managed_policy(&mut self, role: &RoleRef, policy: ManagedPolicy) -> Result<()> {
        match self.nodes.get_mut(role.id()) {
            Some(Node::Role(spec)) => {
                debug!(role = %role.id(), policy = policy.name(), "Attaching managed policy");
                spec.add_managed_policy(policy);
                Ok(())
            }
            _ => Err(CompositionError::DanglingReference {
                from: self.id.clone(),
                to: role.id().to_string(),
                expected: "an IAM role",
            }),
        }
    }

    /// Binds `api` to `table` through `role`.
    ///
    /// The role ARN is captured here, so the role must already be declared.
    /// Its policies are checked when the stack is synthesized.
    pub fn add_dynamodb_binding(
        &mut self,
        id: &str,
        api: &ApiRef,
        name: impl Into<String>,
        table: &TableRef,
        role: &RoleRef,
    ) -> Result<BindingRef> {
        if !matches!(self.nodes.get(role.id()), Some(Node::Role(_))) {
            return Err(CompositionError::DanglingReference {
                from: id.to_string(),
                to: role.id().to_string(),
                expected: "an IAM role",
            });
        }

        let binding = DataSourceBinding {
            api: api.id().clone(),
            name: name.into(),
            source_type: DataSourceType::AmazonDynamoDb,
            table: table.id().clone(),
            region: self.props.env.region_expr(),
            role: role.id().clone(),
            service_role_arn: role.role_arn(),
        };
        self.insert(id, Node::Binding(binding)).map(BindingRef)
    }

    /// Exports a value from the stack.
    pub fn add_output(&mut self, id: &str, value: Expr, description: Option<&str>) -> Result<()> {
        let id = LogicalId::new(id)?;
        if self.outputs.contains_key(&id) {
            return Err(CompositionError::DuplicateLogicalId(id.to_string()));
        }
        self.outputs.insert(
            id,
            Output {
                description: description.map(str::to_string),
                value,
            },
        );
        Ok(())
    }

    /// Removes an API together with its keys, schemas and bindings, and any
    /// output pointing at them. Returns the removed node ids.
    pub fn remove_api(&mut self, api: &ApiRef) -> Vec<LogicalId> {
        if !matches!(self.nodes.get(api.id()), Some(Node::GraphQlApi(_))) {
            return Vec::new();
        }

        let removed: Vec<LogicalId> = self
            .nodes
            .iter()
            .filter(|(id, node)| *id == api.id() || node.parent_api() == Some(api.id()))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &removed {
            self.nodes.remove(id);
        }
        self.outputs.retain(|_, output| {
            !output
                .value
                .references()
                .iter()
                .any(|target| removed.contains(target))
        });

        debug!(api = %api.id(), removed = removed.len(), "Removed GraphQL API and its children");
        removed
    }

    /// Validates the graph and produces the template.
    pub fn synth(&self) -> Result<Template> {
        validation::validate_stack(self)?;

        let template = synth::synthesize(self);
        template.check_references()?;
        let order = template.dependency_order()?;

        info!(
            stack = %self.id,
            resources = template.resources.len(),
            outputs = template.outputs.len(),
            "Synthesized stack"
        );
        debug!(order = ?order, "Resource creation order");

        Ok(template)
    }

    fn insert(&mut self, id: &str, node: Node) -> Result<LogicalId> {
        let id = LogicalId::new(id)?;
        if self.nodes.contains_key(&id) {
            return Err(CompositionError::DuplicateLogicalId(id.to_string()));
        }
        debug!(id = %id, kind = node.kind(), "Adding node");
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }
}
