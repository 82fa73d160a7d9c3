use thiserror::Error;

use crate::error::CompositionError;
use crate::graph::DependencyCycle;

/// Result type alias for planning.
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Errors that can occur while calculating a plan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Invalid deployed template: {0}")]
    InvalidTemplate(String),

    #[error("Dependency cycle in template: {0}")]
    DependencyCycle(#[from] DependencyCycle),

    #[error(transparent)]
    Composition(#[from] CompositionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_error_display() {
        assert_eq!(
            PlanningError::InvalidTemplate("missing Resources".to_string()).to_string(),
            "Invalid deployed template: missing Resources"
        );
        assert_eq!(
            PlanningError::from(DependencyCycle(vec!["A".to_string(), "B".to_string()]))
                .to_string(),
            "Dependency cycle in template: A, B"
        );
    }
}
