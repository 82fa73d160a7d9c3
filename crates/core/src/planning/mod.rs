//! Pure functions for calculating deployment plans (Functional Core).
//!
//! A plan compares the desired template with the template that was last
//! deployed and lists what the provisioning engine will do to converge.

mod changes;
mod error;
mod format;

pub use changes::{
    calculate_deploy_plan, calculate_destroy_plan, requires_replacement, ChangeAction, DeployPlan,
    DestroyPlan, ResourceChange,
};
pub use error::{PlanningError, Result};
pub use format::{format_deploy_plan, format_destroy_plan};
