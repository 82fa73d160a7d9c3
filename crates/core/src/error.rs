use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for stack composition and synthesis.
pub type Result<T> = std::result::Result<T, CompositionError>;

/// Errors that can occur while composing or synthesizing a stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Invalid logical id '{0}': expected 1-255 ASCII alphanumeric characters")]
    InvalidLogicalId(String),
    #[error("Logical id '{0}' is already used in this stack")]
    DuplicateLogicalId(String),
    #[error("Invalid table name '{0}': expected 3-255 characters from [A-Za-z0-9_.-]")]
    InvalidTableName(String),
    #[error("Table name '{0}' is declared more than once")]
    DuplicateTableName(String),
    #[error("Invalid GraphQL schema '{id}': {source}")]
    InvalidSchema {
        id: String,
        #[source]
        source: SchemaError,
    },
    #[error("Role '{role}' used by data source '{binding}' has no policy granting table read/write")]
    MissingTablePolicy { role: String, binding: String },
    #[error("Role '{role}' used by data source '{binding}' does not trust '{principal}'")]
    UntrustedPrincipal {
        role: String,
        binding: String,
        principal: String,
    },
    #[error("GraphQL API '{0}' uses API_KEY authentication but declares no API key")]
    MissingApiKey(String),
    #[error("GraphQL API '{api}' declares {count} API keys, expected exactly one")]
    DuplicateApiKey { api: String, count: usize },
    #[error("GraphQL API '{0}' has no schema")]
    MissingSchema(String),
    #[error("GraphQL API '{api}' declares {count} schemas, expected exactly one")]
    DuplicateSchema { api: String, count: usize },
    #[error("Data source name '{name}' is declared more than once on GraphQL API '{api}'")]
    DuplicateBindingName { api: String, name: String },
    #[error("'{from}' references '{to}', which is not {expected} in this stack")]
    DanglingReference {
        from: String,
        to: String,
        expected: &'static str,
    },
    #[error("Dependency cycle between resources: {0}")]
    DependencyCycle(String),
    #[error("Failed to serialize template: {0}")]
    Serialization(String),
}
