//! SDL rendering for schema definitions.

use std::fmt::Write;

use super::types::{FieldDefinition, SchemaDefinition};

/// Renders the schema as SDL text.
///
/// Types are written in declaration order, followed by the `schema` block.
pub fn render_sdl(schema: &SchemaDefinition) -> String {
    let mut out = String::new();

    for object in &schema.types {
        let _ = writeln!(out, "type {} {{", object.name);
        for field in &object.fields {
            let _ = writeln!(out, "  {}", render_field(field));
        }
        out.push_str("}\n\n");
    }

    out.push_str("schema {\n");
    if let Some(query) = &schema.query {
        let _ = writeln!(out, "  query: {query}");
    }
    if let Some(mutation) = &schema.mutation {
        let _ = writeln!(out, "  mutation: {mutation}");
    }
    out.push_str("}\n");

    out
}

fn render_field(field: &FieldDefinition) -> String {
    if field.arguments.is_empty() {
        return format!("{}: {}", field.name, field.type_ref);
    }
    let arguments = field
        .arguments
        .iter()
        .map(|argument| format!("{}: {}", argument.name, argument.type_ref))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({}): {}", field.name, arguments, field.type_ref)
}
