//! List command implementation.
//!
//! The `workflow-dispatch list` command prints every workflow that accepts
//! manual dispatch, with its inputs.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::{DispatchError, Result};
use crate::github::{normalize_ref, Repository, RepositoryApi};
use crate::locator::{LocalLocator, Locator, RemoteLocator};
use crate::ui::theme::DispatchTheme;
use crate::ui::UserInterface;
use crate::workflow::{Catalog, Input, InputType, Workflow};

use super::dispatcher::{Command, CommandResult};
use super::target::connect;

/// The list command implementation.
pub struct ListCommand {
    working_dir: PathBuf,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(working_dir: &Path, args: ListArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }

    /// List workflows of a hosted repository through `api`.
    pub fn execute_remote(
        &self,
        api: &dyn RepositoryApi,
        repository: &Repository,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let git_ref = self.args.git_ref.as_deref().map(normalize_ref);

        let mut spinner = ui.start_spinner(&format!("Reading workflows of {}", repository));
        let catalog = match RemoteLocator::new(api, repository.clone(), git_ref).list_workflows() {
            Ok(catalog) => catalog,
            Err(e) => {
                spinner.finish_error(&format!("Unable to read workflows of {}", repository));
                return Err(e);
            }
        };
        spinner.finish_success(&format!("Read workflows of {}", repository));

        self.print(&catalog, ui)
    }

    /// List workflows of the checkout containing the working directory.
    pub fn execute_local(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.git_ref.is_some() {
            ui.warning("--ref is ignored when reading the local checkout");
        }
        let catalog = LocalLocator::new(&self.working_dir).list_workflows()?;
        self.print(&catalog, ui)
    }

    fn print(&self, catalog: &Catalog, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.json {
            let workflows: Vec<&Workflow> = catalog.values().collect();
            let json = serde_json::to_string_pretty(&workflows)
                .map_err(|e| DispatchError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        if catalog.is_empty() {
            ui.warning("No dispatchable workflows found in repository.");
            return Ok(CommandResult::success());
        }

        let theme = DispatchTheme::detect();
        for workflow in catalog.values() {
            ui.message(&format!("{}", theme.highlight.apply_to(&workflow.name)));
            for input in &workflow.inputs {
                ui.message(&format!("  {}", describe_input(input, &theme)));
            }
        }
        Ok(CommandResult::success())
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match (&self.args.repository, self.args.local) {
            (Some(repository), false) => {
                let target = connect(repository, self.args.hostname.as_deref())?;
                self.execute_remote(&target.client, &target.repository, ui)
            }
            _ => self.execute_local(ui),
        }
    }
}

/// One line describing an input: name, type, options and default.
fn describe_input(input: &Input, theme: &DispatchTheme) -> String {
    let mut line = format!("{} ({})", input.name, input.input_type);
    if input.input_type == InputType::Choice {
        if let Some(options) = input.options() {
            line.push_str(&format!(" [{}]", options.join(", ")));
        }
    }
    if input.has_default() {
        line.push_str(&format!(" default: {}", input.default));
    }
    if input.description.is_empty() {
        line
    } else {
        format!("{} {}", line, theme.dim.apply_to(&input.description))
    }
}
