//! Command handlers (Imperative Shell).
//!
//! Composition, validation and planning happen in `mlsfootball_core`; the
//! handlers here read and write files and print results.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mlsfootball_core::planning::{self, DeployPlan, DestroyPlan};
use mlsfootball_core::schema::render_sdl;
use mlsfootball_core::stack::Node;
use mlsfootball_core::{football_stack, Stack, Template};
use serde_json::Value;

use crate::cli::{Commands, Global, OutputFormat};
use crate::config::Config;
use crate::output::{colorize_plan_line, format_output, format_summary, StackSummary};
use crate::prelude::*;

/// A composed stack and the template it synthesizes to.
pub struct Composed {
    pub stack: Stack,
    pub template: Template,
}

/// Composes the football stack for `config` and synthesizes it.
pub fn compose(config: &Config) -> Result<Composed> {
    let stack = football_stack(&config.stack_id, config.stack_props())
        .with_context(|| format!("Failed to compose stack '{}'", config.stack_id))?;
    let template = stack
        .synth()
        .with_context(|| format!("Stack '{}' is invalid", config.stack_id))?;
    Ok(Composed { stack, template })
}

/// Path of the template file for `stack_id` inside `dir`.
pub fn template_path(dir: &Path, stack_id: &str) -> PathBuf {
    dir.join(format!("{stack_id}.template.json"))
}

/// Writes the template into `dir`, creating it if needed.
pub fn write_template(dir: &Path, stack_id: &str, json: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = template_path(dir, stack_id);
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Reads a previously deployed template. A missing file means nothing is deployed.
pub fn read_deployed(path: &Path) -> Result<Option<Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no deployed template");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse deployed template {}", path.display()))?;
    Ok(Some(value))
}

/// Renders the SDL of every schema in the stack.
pub fn schema_sdl(stack: &Stack) -> Vec<String> {
    stack
        .nodes()
        .values()
        .filter_map(|node| match node {
            Node::Schema { definition, .. } => Some(render_sdl(definition)),
            _ => None,
        })
        .collect()
}

pub fn run(command: Commands, global: Global) -> Result<()> {
    let config = Config::resolve(&global);
    tracing::debug!(stack = %config.stack_id, "resolved configuration");

    match command {
        Commands::Synth { output_dir } => synth(&config, output_dir.as_deref(), &global),
        Commands::Validate => validate(&config, &global),
        Commands::Schema => schema(&config),
        Commands::Plan { current } => plan(&config, &current, &global),
        Commands::Destroy { current } => destroy(&current, &global),
    }
}

fn synth(config: &Config, output_dir: Option<&Path>, global: &Global) -> Result<()> {
    let Composed { template, .. } = compose(config)?;
    let json = template.to_json_pretty()?;

    match output_dir {
        Some(dir) => {
            let path = write_template(dir, &config.stack_id, &json)?;
            tracing::info!(path = %path.display(), "template written");
            if !global.is_silent() {
                aprintln!("{} {}", p_g("Wrote"), path.display());
            }
        }
        None => print!("{json}"),
    }
    Ok(())
}

fn validate(config: &Config, global: &Global) -> Result<()> {
    let Composed { stack, template } = compose(config)?;
    let summary = StackSummary::new(stack.id(), stack.props(), &template)?;

    match global.format {
        OutputFormat::Json => println!("{}", format_output(&summary, global.format)),
        OutputFormat::Pretty => {
            if !global.is_silent() {
                for line in format_summary(&summary) {
                    aprintln!("{}", line);
                }
                aprintln!();
            }
            aprintln!("{}", p_g("Stack is valid."));
        }
    }
    Ok(())
}

fn schema(config: &Config) -> Result<()> {
    let Composed { stack, .. } = compose(config)?;
    for sdl in schema_sdl(&stack) {
        print!("{sdl}");
    }
    Ok(())
}

fn plan(config: &Config, current: &Path, global: &Global) -> Result<()> {
    let Composed { template, .. } = compose(config)?;
    let deployed = read_deployed(current)?;
    let plan = planning::calculate_deploy_plan(deployed.as_ref(), &template)
        .with_context(|| format!("Failed to plan against {}", current.display()))?;

    match global.format {
        OutputFormat::Json => println!("{}", format_output(&plan, global.format)),
        OutputFormat::Pretty => {
            if !global.is_silent() {
                aprintln!("{} {}", p_b("Target:"), config.stack_props().env.target_display());
                aprintln!("{}", p_c("Deploy Plan:"));
            }
            for line in planning::format_deploy_plan(&plan) {
                aprintln!("  {}", colorize_plan_line(&line));
            }
            if !global.is_silent() && plan != DeployPlan::NoChanges {
                aprintln!();
                aprintln!("{} resource change(s).", plan.changes().len());
            }
        }
    }
    Ok(())
}

fn destroy(current: &Path, global: &Global) -> Result<()> {
    let deployed = read_deployed(current)?;
    let plan = planning::calculate_destroy_plan(deployed.as_ref())
        .with_context(|| format!("Failed to plan teardown of {}", current.display()))?;

    match global.format {
        OutputFormat::Json => println!("{}", format_output(&plan, global.format)),
        OutputFormat::Pretty => {
            if !global.is_silent() {
                aprintln!("{}", p_y("Destroy Plan:"));
            }
            let gone = plan == DestroyPlan::AlreadyGone;
            for line in planning::format_destroy_plan(&plan) {
                if gone {
                    aprintln!("  {}", p_g(&line));
                } else {
                    aprintln!("  {}", colorize_plan_line(&line));
                }
            }
        }
    }
    Ok(())
}
