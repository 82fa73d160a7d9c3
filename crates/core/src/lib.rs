//! mlsfootball_core - resource graph, template synthesis and deploy planning
//! for the MLS football stack.
//!
//! Everything in this crate is pure: composing a stack, validating it and
//! diffing templates never performs I/O.

pub mod error;
pub mod football;
pub mod graph;
pub mod planning;
pub mod resources;
pub mod schema;
pub mod stack;
pub mod template;

pub use error::{CompositionError, Result};
pub use football::{football_stack, DEFAULT_STACK_ID};
pub use stack::{Environment, Stack, StackProps};
pub use template::Template;
