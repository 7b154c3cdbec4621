//! Collecting values for a workflow's dispatch inputs.
//!
//! Values come from `--input key=value` arguments first. Every declared input
//! without a supplied value is then prompted for, unless prompting is turned
//! off, in which case it is left out and the workflow default applies.
//!
//! # Example
//!
//! ```
//! use workflow_dispatch::github::{MockApi, Repository};
//! use workflow_dispatch::inputs::{parse_input_arguments, InputCollector};
//! use workflow_dispatch::ui::MockUI;
//! use workflow_dispatch::workflow::parse_workflow;
//!
//! let yaml = "on:\n  workflow_dispatch:\n    inputs:\n      target:\n        default: prod\n";
//! let workflow = parse_workflow("deploy.yml", yaml.as_bytes()).unwrap();
//!
//! let api = MockApi::new();
//! let repo = Repository::new("octo", "widgets");
//! let supplied = parse_input_arguments(&["target=staging"]).unwrap();
//!
//! let mut ui = MockUI::new();
//! let values = InputCollector::new(&api, &repo)
//!     .collect(&workflow, supplied, &mut ui)
//!     .unwrap();
//! assert_eq!(values["target"], "staging");
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::{DispatchError, Result};
use crate::github::{environment_names, Repository, RepositoryApi};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};
use crate::workflow::{Input, InputType, Workflow};

/// Split `key=value` arguments into ordered pairs.
///
/// Only the first `=` separates; the value may contain more of them.
pub fn parse_input_arguments<S: AsRef<str>>(args: &[S]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            arg.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| DispatchError::InvalidInput {
                    message: format!("'{}' is not of the form key=value", arg),
                })
        })
        .collect()
}

/// Gathers input values for one dispatch.
///
/// The environment list is fetched at most once, and only when an
/// `environment` input is actually prompted for.
pub struct InputCollector<'a> {
    api: &'a dyn RepositoryApi,
    repository: &'a Repository,
    prompt: bool,
    environments: Option<Vec<String>>,
}

impl<'a> InputCollector<'a> {
    pub fn new(api: &'a dyn RepositoryApi, repository: &'a Repository) -> Self {
        Self {
            api,
            repository,
            prompt: true,
            environments: None,
        }
    }

    /// Turn prompting for unsupplied inputs on or off.
    pub fn with_prompting(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Resolve the values to dispatch `workflow` with.
    ///
    /// Fails if any supplied key is not declared by the workflow. A key
    /// supplied twice keeps its last value.
    pub fn collect(
        mut self,
        workflow: &Workflow,
        supplied: Vec<(String, String)>,
        ui: &mut dyn UserInterface,
    ) -> Result<BTreeMap<String, String>> {
        let mut supplied: HashMap<String, String> = supplied.into_iter().collect();
        if let Some(key) = supplied.keys().find(|key| !workflow.accepts_input(key)) {
            return Err(DispatchError::InvalidInput {
                message: format!("Input {} not accepted by workflow {}", key, workflow.name),
            });
        }

        let mut values = BTreeMap::new();
        for input in &workflow.inputs {
            if let Some(value) = supplied.remove(&input.name) {
                values.insert(input.name.clone(), value);
            } else if self.prompt {
                let prompt = self.prompt_for(input)?;
                let answer = ui.prompt(&prompt)?;
                values.insert(input.name.clone(), answer.as_string());
            } else {
                tracing::debug!("No value for input {}; using workflow default", input.name);
            }
        }

        Ok(values)
    }

    fn prompt_for(&mut self, input: &Input) -> Result<Prompt> {
        let question = if input.description.is_empty() {
            format!("Input for {}", input.name)
        } else {
            format!("Input for {} ({})", input.name, input.description)
        };

        let prompt_type = match input.input_type {
            InputType::String => PromptType::Input,
            InputType::Boolean => PromptType::Confirm,
            InputType::Choice => PromptType::Select {
                options: plain_options(input.options().unwrap_or_default()),
            },
            InputType::Environment => PromptType::Select {
                options: plain_options(self.environments()?),
            },
        };

        let default = match &prompt_type {
            PromptType::Select { options } => default_option(&input.default, options),
            _ => input.has_default().then(|| input.default.clone()),
        };

        Ok(Prompt {
            key: input.name.clone(),
            question,
            prompt_type,
            default,
        })
    }

    fn environments(&mut self) -> Result<&[String]> {
        if self.environments.is_none() {
            self.environments = Some(environment_names(self.api, self.repository)?);
        }
        Ok(self.environments.as_deref().unwrap_or_default())
    }
}

fn plain_options(values: &[String]) -> Vec<PromptOption> {
    values.iter().map(|v| PromptOption::plain(v)).collect()
}

/// The declared default when it is one of the options, else the first option.
fn default_option(declared: &str, options: &[PromptOption]) -> Option<String> {
    options
        .iter()
        .find(|o| o.value == declared)
        .or_else(|| options.first())
        .map(|o| o.value.clone())
}
