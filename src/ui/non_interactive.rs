//! Non-interactive UI for CI/headless environments.

use crate::error::{DispatchError, Result};

use super::theme::DispatchTheme;
use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prompts resolve to their default without asking; a prompt with no default
/// is an error, since nobody is there to answer it.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let Some(default) = &prompt.default else {
            return Err(DispatchError::InvalidInput {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (no default value)",
                    prompt.key
                ),
            });
        };

        match &prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(default == "true")),
            PromptType::Input => Ok(PromptResult::String(default.clone())),
            PromptType::Select { options } => {
                let index = super::prompts::default_index(Some(default), options);
                options
                    .get(index)
                    .map(|o| PromptResult::String(o.value.clone()))
                    .ok_or_else(|| DispatchError::InvalidInput {
                        message: format!("no options to choose from for '{}'", prompt.key),
                    })
            }
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            eprintln!("  {}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }
}

/// Spinner stand-in that prints only the final line.
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", DispatchTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", DispatchTheme::plain().format_error(msg));
    }
}
