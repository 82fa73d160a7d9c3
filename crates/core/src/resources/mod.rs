//! Resource descriptors (Functional Core - pure data).

mod api;
mod binding;
mod iam;
mod table;

pub use api::{ApiKeySpec, ApiSpec, AuthenticationType};
pub use binding::{DataSourceBinding, DataSourceType};
pub use iam::{ManagedPolicy, RoleSpec, ServicePrincipal};
pub use table::{
    is_valid_table_name, AttributeType, BillingMode, KeyAttribute, RemovalPolicy, TableSpec,
    PARTITION_KEY_SUFFIX,
};
