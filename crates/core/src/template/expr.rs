//! Property values and the intrinsic functions the provisioning engine resolves.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::LogicalId;

/// Parameters the engine resolves from the deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoParameter {
    Region,
    Partition,
}

impl PseudoParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoParameter::Region => "AWS::Region",
            PseudoParameter::Partition => "AWS::Partition",
        }
    }
}

/// A template property value: a literal or an intrinsic function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A plain string.
    Literal(String),
    /// `{"Ref": id}` - the resource's primary identifier (table name, role name...).
    Ref(LogicalId),
    /// `{"Fn::GetAtt": [id, attribute]}`.
    GetAtt(LogicalId, &'static str),
    /// `{"Ref": "AWS::..."}`.
    Pseudo(PseudoParameter),
    /// `{"Fn::Join": [separator, [parts...]]}`.
    Join(String, Vec<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    /// Returns every logical id this value points at, in order of appearance.
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            Expr::Literal(_) | Expr::Pseudo(_) => Vec::new(),
            Expr::Ref(id) | Expr::GetAtt(id, _) => vec![id],
            Expr::Join(_, parts) => parts.iter().flat_map(Expr::references).collect(),
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Literal(value) => serializer.serialize_str(value),
            Expr::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Expr::GetAtt(id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &(id, attribute))?;
                map.end()
            }
            Expr::Pseudo(parameter) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", parameter.as_str())?;
                map.end()
            }
            Expr::Join(separator, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(separator, parts))?;
                map.end()
            }
        }
    }
}
