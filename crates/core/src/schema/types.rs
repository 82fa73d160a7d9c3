use std::fmt;

/// A reference to a type, possibly wrapped in list / non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps this type in a non-null modifier.
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// Wraps this type in a list.
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// The innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A field argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub type_ref: TypeRef,
}

/// A field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub type_ref: TypeRef,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            type_ref,
        }
    }

    pub fn argument(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            type_ref,
        });
        self
    }
}

/// An object type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A schema document: object types plus the root operation types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDefinition {
    pub types: Vec<ObjectType>,
    pub query: Option<String>,
    pub mutation: Option<String>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, object: ObjectType) -> Self {
        self.types.push(object);
        self
    }

    pub fn query_root(mut self, name: impl Into<String>) -> Self {
        self.query = Some(name.into());
        self
    }

    pub fn mutation_root(mut self, name: impl Into<String>) -> Self {
        self.mutation = Some(name.into());
        self
    }

    pub fn get_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|object| object.name == name)
    }
}
