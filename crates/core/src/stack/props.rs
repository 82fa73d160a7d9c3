use crate::template::{Expr, PseudoParameter};

/// Deployment target overrides. Unset values are left to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    /// The region as a template value: the override if set, `AWS::Region` otherwise.
    pub fn region_expr(&self) -> Expr {
        match &self.region {
            Some(region) => Expr::Literal(region.clone()),
            None => Expr::Pseudo(PseudoParameter::Region),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        format!(
            "account: {}, region: {}",
            self.account.as_deref().unwrap_or("<unresolved>"),
            self.region.as_deref().unwrap_or("<unresolved>")
        )
    }
}

/// Stack-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackProps {
    pub env: Environment,
    pub description: Option<String>,
}

impl StackProps {
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
