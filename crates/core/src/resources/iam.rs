//! Access role descriptors.

use crate::template::{Expr, PseudoParameter};

/// Managed policies known to grant read/write access to record tables.
const TABLE_READ_WRITE_POLICIES: &[&str] = &["AmazonDynamoDBFullAccess", "AdministratorAccess"];

/// A service allowed to assume a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipal(String);

impl ServicePrincipal {
    pub fn new(service: impl Into<String>) -> Self {
        Self(service.into())
    }

    /// The GraphQL service principal.
    pub fn appsync() -> Self {
        Self::new("appsync.amazonaws.com")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A policy managed by the cloud provider, attached to a role by ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicy {
    name: String,
}

impl ManagedPolicy {
    /// References a provider-managed policy by name.
    pub fn aws_managed(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn dynamodb_full_access() -> Self {
        Self::aws_managed("AmazonDynamoDBFullAccess")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `arn:<partition>:iam::aws:policy/<name>`, with the partition left to the engine.
    pub fn arn(&self) -> Expr {
        Expr::Join(
            String::new(),
            vec![
                Expr::literal("arn:"),
                Expr::Pseudo(PseudoParameter::Partition),
                Expr::Literal(format!(":iam::aws:policy/{}", self.name)),
            ],
        )
    }

    pub fn grants_table_read_write(&self) -> bool {
        TABLE_READ_WRITE_POLICIES.contains(&self.name.as_str())
    }
}

/// An identity a service assumes to reach other services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    pub trusted_principal: ServicePrincipal,
    pub managed_policies: Vec<ManagedPolicy>,
    pub description: Option<String>,
}

impl RoleSpec {
    /// Creates a role assumable by `principal`, with no policies attached.
    pub fn assumed_by(principal: ServicePrincipal) -> Self {
        Self {
            trusted_principal: principal,
            managed_policies: Vec::new(),
            description: None,
        }
    }

    pub fn with_managed_policy(mut self, policy: ManagedPolicy) -> Self {
        self.add_managed_policy(policy);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a policy. Attaching the same policy twice is a no-op.
    pub fn add_managed_policy(&mut self, policy: ManagedPolicy) {
        if !self.managed_policies.contains(&policy) {
            self.managed_policies.push(policy);
        }
    }

    pub fn grants_table_read_write(&self) -> bool {
        self.managed_policies
            .iter()
            .any(ManagedPolicy::grants_table_read_write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_access_grants_read_write() {
        assert!(ManagedPolicy::dynamodb_full_access().grants_table_read_write());
        assert!(!ManagedPolicy::aws_managed("AmazonDynamoDBReadOnlyAccess").grants_table_read_write());
    }

    #[test]
    fn test_managed_policy_arn_uses_partition() {
        assert_eq!(
            serde_json::to_value(ManagedPolicy::dynamodb_full_access().arn()).unwrap(),
            json!({
                "Fn::Join": [
                    "",
                    ["arn:", { "Ref": "AWS::Partition" }, ":iam::aws:policy/AmazonDynamoDBFullAccess"]
                ]
            })
        );
    }

    #[test]
    fn test_role_without_policy_grants_nothing() {
        let role = RoleSpec::assumed_by(ServicePrincipal::appsync());
        assert!(!role.grants_table_read_write());
        assert_eq!(role.trusted_principal.as_str(), "appsync.amazonaws.com");
    }

    #[test]
    fn test_attaching_policy_twice_keeps_one() {
        let mut role = RoleSpec::assumed_by(ServicePrincipal::appsync())
            .with_managed_policy(ManagedPolicy::dynamodb_full_access());
        role.add_managed_policy(ManagedPolicy::dynamodb_full_access());

        assert_eq!(role.managed_policies.len(), 1);
        assert!(role.grants_table_read_write());
    }
}
