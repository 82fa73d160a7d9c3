use std::env;

use mlsfootball_core::{Environment, StackProps};

use crate::cli::Global;

const STACK_DESCRIPTION: &str = "MLS football players and games behind a GraphQL API";

/// Deployment target configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Stack identifier.
    pub stack_id: String,
    /// Target account (default: unresolved, left to the engine).
    pub account: Option<String>,
    /// Target region (default: unresolved, left to the engine).
    pub region: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CDK_DEFAULT_ACCOUNT` - Target account
    /// - `CDK_DEFAULT_REGION` - Target region
    pub fn from_env(stack_id: impl Into<String>) -> Self {
        Self::from_lookup(stack_id, |key| env::var(key).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(
        stack_id: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            stack_id: stack_id.into(),
            account: non_empty("CDK_DEFAULT_ACCOUNT"),
            region: non_empty("CDK_DEFAULT_REGION"),
        }
    }

    /// Resolves configuration for a command: flags win over the environment.
    pub fn resolve(global: &Global) -> Self {
        Self::from_env(global.stack_id.clone()).with_overrides(global)
    }

    pub fn with_overrides(mut self, global: &Global) -> Self {
        if let Some(account) = &global.account {
            self.account = Some(account.clone());
        }
        if let Some(region) = &global.region {
            self.region = Some(region.clone());
        }
        self
    }

    /// Stack properties for the composer.
    pub fn stack_props(&self) -> StackProps {
        StackProps::default()
            .with_env(Environment {
                account: self.account.clone(),
                region: self.region.clone(),
            })
            .with_description(STACK_DESCRIPTION)
    }
}
