//! Whole-graph rules checked before synthesis (Functional Core).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CompositionError, Result};
use crate::resources::ServicePrincipal;
use crate::schema::validate_schema;
use crate::template::LogicalId;

use super::composer::{Node, Stack};

/// Runs every graph rule, returning the first violation.
pub(super) fn validate_stack(stack: &Stack) -> Result<()> {
    validate_tables(stack)?;
    validate_parents(stack)?;
    validate_apis(stack)?;
    validate_schemas(stack)?;
    validate_bindings(stack)?;
    Ok(())
}

fn validate_tables(stack: &Stack) -> Result<()> {
    let mut names = BTreeSet::new();
    for node in stack.nodes().values() {
        if let Node::Table(table) = node {
            if !names.insert(table.name()) {
                return Err(CompositionError::DuplicateTableName(table.name().to_string()));
            }
        }
    }
    Ok(())
}

/// Every API child must point at a GraphQL API of this stack.
fn validate_parents(stack: &Stack) -> Result<()> {
    for (id, node) in stack.nodes() {
        if let Some(api) = node.parent_api() {
            expect_node(stack, id, api, "a GraphQL API", |n| {
                matches!(n, Node::GraphQlApi(_))
            })?;
        }
    }
    Ok(())
}

fn validate_apis(stack: &Stack) -> Result<()> {
    let mut keys: BTreeMap<&LogicalId, usize> = BTreeMap::new();
    let mut schemas: BTreeMap<&LogicalId, usize> = BTreeMap::new();

    for node in stack.nodes().values() {
        match node {
            Node::ApiKey { api, .. } => *keys.entry(api).or_default() += 1,
            Node::Schema { api, .. } => *schemas.entry(api).or_default() += 1,
            _ => {}
        }
    }

    for (id, node) in stack.nodes() {
        let Node::GraphQlApi(api) = node else {
            continue;
        };

        let key_count = keys.get(id).copied().unwrap_or(0);
        if api.authentication_type.requires_api_key() {
            match key_count {
                0 => return Err(CompositionError::MissingApiKey(id.to_string())),
                1 => {}
                count => {
                    return Err(CompositionError::DuplicateApiKey {
                        api: id.to_string(),
                        count,
                    })
                }
            }
        }

        match schemas.get(id).copied().unwrap_or(0) {
            0 => return Err(CompositionError::MissingSchema(id.to_string())),
            1 => {}
            count => {
                return Err(CompositionError::DuplicateSchema {
                    api: id.to_string(),
                    count,
                })
            }
        }
    }
    Ok(())
}

fn validate_schemas(stack: &Stack) -> Result<()> {
    for (id, node) in stack.nodes() {
        if let Node::Schema { definition, .. } = node {
            validate_schema(definition).map_err(|source| CompositionError::InvalidSchema {
                id: id.to_string(),
                source,
            })?;
        }
    }
    Ok(())
}

fn validate_bindings(stack: &Stack) -> Result<()> {
    let appsync = ServicePrincipal::appsync();
    let mut names: BTreeSet<(&LogicalId, &str)> = BTreeSet::new();

    for (id, node) in stack.nodes() {
        let Node::Binding(binding) = node else {
            continue;
        };

        expect_node(stack, id, &binding.table, "a DynamoDB table", |n| {
            matches!(n, Node::Table(_))
        })?;
        let role = match stack.node(binding.role.as_str()) {
            Some(Node::Role(role)) => role,
            _ => {
                return Err(CompositionError::DanglingReference {
                    from: id.to_string(),
                    to: binding.role.to_string(),
                    expected: "an IAM role",
                })
            }
        };

        if role.trusted_principal != appsync {
            return Err(CompositionError::UntrustedPrincipal {
                role: binding.role.to_string(),
                binding: id.to_string(),
                principal: appsync.as_str().to_string(),
            });
        }
        if !role.grants_table_read_write() {
            return Err(CompositionError::MissingTablePolicy {
                role: binding.role.to_string(),
                binding: id.to_string(),
            });
        }

        if !names.insert((&binding.api, binding.name.as_str())) {
            return Err(CompositionError::DuplicateBindingName {
                api: binding.api.to_string(),
                name: binding.name.clone(),
            });
        }
    }
    Ok(())
}

fn expect_node(
    stack: &Stack,
    from: &LogicalId,
    to: &LogicalId,
    expected: &'static str,
    is_expected: impl Fn(&Node) -> bool,
) -> Result<()> {
    match stack.node(to.as_str()) {
        Some(node) if is_expected(node) => Ok(()),
        _ => Err(CompositionError::DanglingReference {
            from: from.to_string(),
            to: to.to_string(),
            expected,
        }),
    }
}
