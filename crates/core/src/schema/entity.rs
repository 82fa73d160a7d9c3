//! Schema generated from a record table.
//!
//! The entity's key field is taken from the table's partition key, so the
//! schema and the table cannot disagree on the key name.

use crate::resources::TableSpec;

use super::types::{FieldDefinition, ObjectType, SchemaDefinition, TypeRef};

/// Operation names exposed for a table-backed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOperations {
    pub list: String,
    pub get: String,
    pub save: String,
    pub delete: String,
}

impl EntityOperations {
    pub fn for_entity(entity: &str) -> Self {
        Self {
            list: format!("all{}", plural(entity)),
            get: format!("getOne{entity}"),
            save: format!("save{entity}"),
            delete: format!("delete{entity}"),
        }
    }
}

/// `Player` -> `Players`. Names already ending in `s` are kept as is.
fn plural(entity: &str) -> String {
    if entity.ends_with('s') {
        entity.to_string()
    } else {
        format!("{entity}s")
    }
}

/// The GraphQL type name for a table: its name with the first letter upper-cased.
pub fn entity_type_name(table: &TableSpec) -> String {
    let mut chars = table.name().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the query/mutation schema for the records stored in `table`.
///
/// For a table named `player` this is:
///
/// ```text
/// type Player { playerId: ID!  name: String  phone: String }
/// type PaginatedPlayer { items: [Player!]!  nextToken: String }
/// type Query {
///   allPlayers(limit: Int, nextToken: String): PaginatedPlayer!
///   getOnePlayer(playerId: ID!): Player
/// }
/// type Mutation {
///   savePlayer(name: String!): Player
///   deletePlayer(playerId: ID!): Player
/// }
/// ```
pub fn entity_schema(table: &TableSpec) -> SchemaDefinition {
    let entity = entity_type_name(table);
    let paginated = format!("Paginated{entity}");
    let key = table.partition_key().name.clone();
    let operations = EntityOperations::for_entity(&entity);

    let id = || TypeRef::named("ID").non_null();
    let string = || TypeRef::named("String");
    let entity_ref = || TypeRef::named(entity.as_str());

    SchemaDefinition::new()
        .object(
            ObjectType::new(entity.as_str())
                .field(FieldDefinition::new(key.as_str(), id()))
                .field(FieldDefinition::new("name", string()))
                .field(FieldDefinition::new("phone", string())),
        )
        .object(
            ObjectType::new(paginated.as_str())
                .field(FieldDefinition::new(
                    "items",
                    entity_ref().non_null().list().non_null(),
                ))
                .field(FieldDefinition::new("nextToken", string())),
        )
        .object(
            ObjectType::new("Query")
                .field(
                    FieldDefinition::new(operations.list, TypeRef::named(paginated.as_str()).non_null())
                        .argument("limit", TypeRef::named("Int"))
                        .argument("nextToken", string()),
                )
                .field(FieldDefinition::new(operations.get, entity_ref()).argument(key.as_str(), id())),
        )
        .object(
            ObjectType::new("Mutation")
                .field(
                    FieldDefinition::new(operations.save, entity_ref())
                        .argument("name", string().non_null()),
                )
                .field(FieldDefinition::new(operations.delete, entity_ref()).argument(key.as_str(), id())),
        )
        .query_root("Query")
        .mutation_root("Mutation")
}
