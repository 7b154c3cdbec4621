//! Run command implementation.
//!
//! The `workflow-dispatch run` command picks a workflow, collects its inputs
//! and triggers a `workflow_dispatch` event for it.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::error::{DispatchError, Result};
use crate::github::{branch_name, default_ref, normalize_ref, Repository, RepositoryApi};
use crate::inputs::{parse_input_arguments, InputCollector};
use crate::locator::{LocalLocator, Locator, RemoteLocator};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};
use crate::workflow::{workflow_name, Catalog};

use super::dispatcher::{Command, CommandResult};
use super::target::connect;

/// Prompt key used when asking which workflow to run.
pub const WORKFLOW_PROMPT_KEY: &str = "workflow";

/// The run command implementation.
pub struct RunCommand {
    working_dir: PathBuf,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(working_dir: &Path, args: RunArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }

    /// Dispatch in `repository` through `api`.
    pub fn execute_with(
        &self,
        api: &dyn RepositoryApi,
        repository: &Repository,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        // Validate --input syntax before any network call.
        let supplied = parse_input_arguments(&self.args.inputs)?;

        let git_ref = match &self.args.git_ref {
            Some(git_ref) => normalize_ref(git_ref),
            None => default_ref(api, repository)?,
        };
        tracing::debug!("Dispatching on {}", git_ref);

        let catalog = self.locate(api, repository, &git_ref, ui)?;
        if catalog.is_empty() {
            return Err(DispatchError::NoDispatchableWorkflows);
        }

        let name = match &self.args.workflow {
            Some(arg) => workflow_name(arg).to_string(),
            None => choose_workflow(&catalog, ui)?,
        };
        let workflow = catalog
            .get(&name)
            .ok_or_else(|| DispatchError::UnknownWorkflow { name: name.clone() })?;

        let values = InputCollector::new(api, repository)
            .with_prompting(!self.args.no_prompt_inputs)
            .collect(workflow, supplied, ui)?;

        let mut spinner = ui.start_spinner(&format!("Dispatching {}", workflow.name));
        match api.dispatch(repository, &workflow.name, &git_ref, &values) {
            Ok(()) => {
                spinner.finish_success(&format!(
                    "Dispatched {} in {} on {}",
                    workflow.name,
                    repository,
                    branch_name(&git_ref)
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Unable to dispatch {}", workflow.name));
                Err(e)
            }
        }
    }

    fn locate(
        &self,
        api: &dyn RepositoryApi,
        repository: &Repository,
        git_ref: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<Catalog> {
        if self.args.local {
            return LocalLocator::new(&self.working_dir).list_workflows();
        }

        let mut spinner = ui.start_spinner(&format!("Reading workflows of {}", repository));
        let located =
            RemoteLocator::new(api, repository.clone(), Some(git_ref.to_string())).list_workflows();
        match &located {
            Ok(catalog) => spinner.finish_success(&format!(
                "Found {} dispatchable workflows at {}",
                catalog.len(),
                branch_name(git_ref)
            )),
            Err(_) => spinner.finish_error(&format!("Unable to read workflows of {}", repository)),
        }
        located
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let target = connect(&self.args.repository, self.args.hostname.as_deref())?;
        self.execute_with(&target.client, &target.repository, ui)
    }
}

/// Ask which workflow to run, offering names in sorted order.
fn choose_workflow(catalog: &Catalog, ui: &mut dyn UserInterface) -> Result<String> {
    let options = catalog
        .keys()
        .map(|name| PromptOption::plain(name))
        .collect();
    let prompt = Prompt {
        key: WORKFLOW_PROMPT_KEY.to_string(),
        question: "Select the workflow to dispatch".to_string(),
        prompt_type: PromptType::Select { options },
        default: None,
    };
    Ok(ui.prompt(&prompt)?.as_string())
}
