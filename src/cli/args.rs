//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// workflow-dispatch - Trigger GitHub Actions workflows by hand.
#[derive(Debug, Parser)]
#[command(name = "workflow-dispatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List workflows that accept manual dispatch
    List(ListArgs),

    /// Dispatch a workflow
    Run(RunArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Repository to inspect; the local checkout when omitted
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO")]
    pub repository: Option<String>,

    /// GitHub host for an OWNER/REPO repository
    #[arg(long, value_name = "HOST", requires = "repository")]
    pub hostname: Option<String>,

    /// Branch, tag or ref to read workflows at (default branch when omitted)
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Read workflows from the local checkout even with --repository
    #[arg(long)]
    pub local: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Workflow file name or path (prompted for when omitted)
    pub workflow: Option<String>,

    /// Repository to dispatch in
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO", required = true)]
    pub repository: String,

    /// GitHub host for an OWNER/REPO repository
    #[arg(long, value_name = "HOST")]
    pub hostname: Option<String>,

    /// Branch, tag or ref to run the workflow on (default branch when omitted)
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Input value for the workflow (repeatable)
    #[arg(short, long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// Do not prompt for inputs that were not given with --input
    #[arg(long)]
    pub no_prompt_inputs: bool,

    /// Read the workflow definition from the local checkout
    #[arg(long)]
    pub local: bool,
}
