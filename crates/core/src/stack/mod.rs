//! Stack composition: assembling the resource graph and synthesizing it.

mod composer;
mod props;
mod synth;
mod validation;

pub use composer::{ApiKeyRef, ApiRef, BindingRef, Node, RoleRef, SchemaRef, Stack, TableRef};
pub use props::{Environment, StackProps};
