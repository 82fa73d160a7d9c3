//! Typed GraphQL schema documents for the query service.

mod entity;
mod error;
mod render;
mod types;
mod validation;

pub use entity::{entity_schema, entity_type_name, EntityOperations};
pub use error::{Result, SchemaError};
pub use render::render_sdl;
pub use types::{Argument, FieldDefinition, ObjectType, SchemaDefinition, TypeRef};
pub use validation::{is_builtin_scalar, validate_schema};
