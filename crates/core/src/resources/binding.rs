//! Data source bindings between the query service and record tables.

use crate::template::{Expr, LogicalId};

/// Kind of backend a data source points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceType {
    AmazonDynamoDb,
}

impl DataSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceType::AmazonDynamoDb => "AMAZON_DYNAMODB",
        }
    }
}

/// A named link from a GraphQL API to a record table.
///
/// The role ARN is captured as a reference expression when the binding is
/// built, so the role must already be part of the stack at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceBinding {
    pub api: LogicalId,
    pub name: String,
    pub source_type: DataSourceType,
    pub table: LogicalId,
    pub region: Expr,
    pub role: LogicalId,
    pub service_role_arn: Expr,
}
