//! Structural validation for schema definitions (Functional Core).

use std::collections::HashSet;

use super::error::{Result, SchemaError};
use super::types::SchemaDefinition;

/// Scalars the query service provides without a declaration.
const BUILTIN_SCALARS: &[&str] = &[
    "ID",
    "String",
    "Int",
    "Float",
    "Boolean",
    "AWSDate",
    "AWSTime",
    "AWSDateTime",
    "AWSTimestamp",
    "AWSEmail",
    "AWSJSON",
    "AWSURL",
    "AWSPhone",
    "AWSIPAddress",
];

/// Returns true if `name` is a scalar known to the query service.
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Validates a schema definition before it is attached to an API.
///
/// Checks names, duplicate types/fields/arguments, that every referenced type
/// is declared or built in, that arguments are scalars, and that the root
/// operation types exist.
pub fn validate_schema(schema: &SchemaDefinition) -> Result<()> {
    let query = schema.query.as_deref().ok_or(SchemaError::MissingQueryRoot)?;

    let mut declared = HashSet::new();
    for object in &schema.types {
        check_name(&object.name)?;
        if is_builtin_scalar(&object.name) || !declared.insert(object.name.as_str()) {
            return Err(SchemaError::DuplicateType(object.name.clone()));
        }
    }

    for object in &schema.types {
        if object.fields.is_empty() {
            return Err(SchemaError::EmptyType(object.name.clone()));
        }

        let mut fields = HashSet::new();
        for field in &object.fields {
            check_name(&field.name)?;
            if !fields.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: object.name.clone(),
                    field: field.name.clone(),
                });
            }

            let output = field.type_ref.base_name();
            if !is_builtin_scalar(output) && !declared.contains(output) {
                return Err(SchemaError::UnknownType {
                    type_name: output.to_string(),
                    referenced_by: format!("{}.{}", object.name, field.name),
                });
            }

            let mut arguments = HashSet::new();
            for argument in &field.arguments {
                check_name(&argument.name)?;
                if !arguments.insert(argument.name.as_str()) {
                    return Err(SchemaError::DuplicateArgument {
                        type_name: object.name.clone(),
                        field: field.name.clone(),
                        argument: argument.name.clone(),
                    });
                }

                let input = argument.type_ref.base_name();
                let referenced_by = format!("{}.{}({})", object.name, field.name, argument.name);
                if declared.contains(input) {
                    return Err(SchemaError::InvalidArgumentType {
                        type_name: input.to_string(),
                        referenced_by,
                    });
                }
                if !is_builtin_scalar(input) {
                    return Err(SchemaError::UnknownType {
                        type_name: input.to_string(),
                        referenced_by,
                    });
                }
            }
        }
    }

    for root in std::iter::once(query).chain(schema.mutation.as_deref()) {
        if !declared.contains(root) {
            return Err(SchemaError::UnknownRootType(root.to_string()));
        }
    }

    Ok(())
}

/// GraphQL names match `[_A-Za-z][_0-9A-Za-z]*` and may not start with `__`.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
    let valid_rest = chars.all(|c| c == '_' || c.is_ascii_alphanumeric());

    if valid_start && valid_rest && !name.starts_with("__") {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDefinition, ObjectType, TypeRef};

    fn query_with(field: FieldDefinition) -> SchemaDefinition {
        SchemaDefinition::new()
            .object(ObjectType::new("Query").field(field))
            .query_root("Query")
    }

    #[test]
    fn test_minimal_schema_is_valid() {
        let schema = query_with(FieldDefinition::new("ping", TypeRef::named("String")));
        assert_eq!(validate_schema(&schema), Ok(()));
    }

    #[test]
    fn test_requires_query_root() {
        let schema = SchemaDefinition::new()
            .object(ObjectType::new("Query").field(FieldDefinition::new("ping", TypeRef::named("String"))));
        assert_eq!(validate_schema(&schema), Err(SchemaError::MissingQueryRoot));
    }

    #[test]
    fn test_root_types_must_be_declared() {
        let schema = query_with(FieldDefinition::new("ping", TypeRef::named("String")))
            .mutation_root("Mutation");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::UnknownRootType("Mutation".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_field_type() {
        let schema = query_with(FieldDefinition::new("team", TypeRef::named("Team")));
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::UnknownType {
                type_name: "Team".to_string(),
                referenced_by: "Query.team".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_object_argument() {
        let schema = SchemaDefinition::new()
            .object(ObjectType::new("Player").field(FieldDefinition::new("name", TypeRef::named("String"))))
            .object(
                ObjectType::new("Query").field(
                    FieldDefinition::new("find", TypeRef::named("Player"))
                        .argument("filter", TypeRef::named("Player")),
                ),
            )
            .query_root("Query");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::InvalidArgumentType {
                type_name: "Player".to_string(),
                referenced_by: "Query.find(filter)".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let duplicate_field = SchemaDefinition::new()
            .object(
                ObjectType::new("Query")
                    .field(FieldDefinition::new("ping", TypeRef::named("String")))
                    .field(FieldDefinition::new("ping", TypeRef::named("Int"))),
            )
            .query_root("Query");
        assert!(matches!(
            validate_schema(&duplicate_field),
            Err(SchemaError::DuplicateField { .. })
        ));

        let duplicate_type = query_with(FieldDefinition::new("ping", TypeRef::named("String")))
            .object(ObjectType::new("Query").field(FieldDefinition::new("pong", TypeRef::named("String"))));
        assert_eq!(
            validate_schema(&duplicate_type),
            Err(SchemaError::DuplicateType("Query".to_string()))
        );

        let duplicate_argument = query_with(
            FieldDefinition::new("ping", TypeRef::named("String"))
                .argument("n", TypeRef::named("Int"))
                .argument("n", TypeRef::named("Int")),
        );
        assert!(matches!(
            validate_schema(&duplicate_argument),
            Err(SchemaError::DuplicateArgument { .. })
        ));
    }

    #[test]
    fn test_rejects_redeclared_scalar_and_empty_type() {
        let scalar = query_with(FieldDefinition::new("ping", TypeRef::named("String")))
            .object(ObjectType::new("String").field(FieldDefinition::new("x", TypeRef::named("Int"))));
        assert_eq!(
            validate_schema(&scalar),
            Err(SchemaError::DuplicateType("String".to_string()))
        );

        let empty = query_with(FieldDefinition::new("ping", TypeRef::named("String")))
            .object(ObjectType::new("Team"));
        assert_eq!(
            validate_schema(&empty),
            Err(SchemaError::EmptyType("Team".to_string()))
        );
    }

    #[test]
    fn test_rejects_invalid_names() {
        for name in ["1player", "player-id", "__typename", ""] {
            let schema = query_with(FieldDefinition::new(name, TypeRef::named("String")));
            assert_eq!(
                validate_schema(&schema),
                Err(SchemaError::InvalidName(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }
}
