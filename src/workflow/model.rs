//! Workflow and input schema types.
//!
//! These values are produced by the parser and are immutable afterwards.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Name-keyed collection of dispatchable workflows built by a locator.
pub type Catalog = BTreeMap<String, Workflow>;

/// Declared type of a dispatch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    String,
    Boolean,
    Choice,
    Environment,
}

impl InputType {
    /// Look up a declared type name, returning `None` for unknown names.
    pub fn from_declared(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "choice" => Some(Self::Choice),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }

    /// The name used for this type in workflow files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::Environment => "environment",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared `workflow_dispatch` input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Input {
    /// Input identifier, unique within a workflow.
    pub name: String,

    /// Free-text description, empty when not declared.
    pub description: String,

    /// Declared type; unknown declarations fall back to `String`.
    #[serde(rename = "type")]
    pub input_type: InputType,

    /// Textual form of the declared default, empty when there is none.
    pub default: String,

    /// Permitted values, in declaration order. Only set for `Choice` inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

impl Input {
    /// Create a string input with no description or default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Options for a `Choice` input.
    ///
    /// `Environment` inputs have no options here; the environment list is
    /// fetched separately for the target repository.
    pub fn options(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Whether a default value was declared.
    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}

/// A parsed workflow file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Workflow {
    /// Base name of the file the workflow was read from.
    pub name: String,

    /// Whether the workflow accepts `workflow_dispatch`.
    pub dispatchable: bool,

    /// Dispatch inputs in declaration order. Always empty when not dispatchable.
    pub inputs: Vec<Input>,
}

impl Workflow {
    /// Find a declared input by name.
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Check whether the workflow declares an input.
    pub fn accepts_input(&self, name: &str) -> bool {
        self.input(name).is_some()
    }
}
