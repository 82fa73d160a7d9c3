use thiserror::Error;

/// Result type for schema validation.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors found while validating a GraphQL schema definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema has no query root type")]
    MissingQueryRoot,
    #[error("Invalid GraphQL name '{0}'")]
    InvalidName(String),
    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),
    #[error("Type '{0}' has no fields")]
    EmptyType(String),
    #[error("Field '{field}' is declared more than once on type '{type_name}'")]
    DuplicateField { type_name: String, field: String },
    #[error("Argument '{argument}' is declared more than once on '{type_name}.{field}'")]
    DuplicateArgument {
        type_name: String,
        field: String,
        argument: String,
    },
    #[error("Unknown type '{type_name}' referenced by '{referenced_by}'")]
    UnknownType {
        type_name: String,
        referenced_by: String,
    },
    #[error("Argument '{referenced_by}' must be a scalar, found '{type_name}'")]
    InvalidArgumentType {
        type_name: String,
        referenced_by: String,
    },
    #[error("Root operation type '{0}' is not declared")]
    UnknownRootType(String),
}
