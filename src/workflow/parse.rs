//! Workflow file parsing.
//!
//! The `on` clause of a workflow may be a single event name, a list of event
//! names, or a mapping of event name to event configuration. Each shape is
//! decoded into a [`Trigger`] variant by a dedicated visitor so that only the
//! parts of the document we care about are materialised.
//!
//! Dispatch inputs are decoded as an ordered list of `(name, configuration)`
//! pairs, never as a hash map, because their declaration order is the order
//! they are prompted in.

use serde::de::{
    self, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

use super::model::{Input, InputType, Workflow};

/// Event name that allows a workflow to be started manually.
pub const DISPATCH_TRIGGER: &str = "workflow_dispatch";

/// Errors produced while reading a single workflow file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file is not valid YAML, or a structural part of it has the wrong shape.
    #[error("Unable to parse workflow as YAML: {0}")]
    MalformedDocument(#[from] serde_yaml::Error),

    /// The `on` clause is neither a string, a list, nor a mapping.
    #[error("Unable to parse workflow \"on\" clause: unexpected {found}")]
    UnexpectedTriggerShape { found: &'static str },

    /// A recognised input field has the wrong type.
    #[error("Input {field} for {input} had unexpected type {found}")]
    MalformedInputField {
        input: String,
        field: &'static str,
        found: &'static str,
    },

    /// A choice input does not declare its options.
    #[error("Input {input} is a choice input but has no options property")]
    MissingChoiceOptions { input: String },
}

/// Parse a workflow file.
///
/// `name` is used verbatim as the workflow name; callers pass the file's base
/// name. Inputs are only extracted for dispatchable workflows.
pub fn parse_workflow(name: &str, raw: &[u8]) -> Result<Workflow, ParseError> {
    let document: Document = serde_yaml::from_slice(raw)?;

    let mut workflow = Workflow {
        name: name.to_string(),
        ..Default::default()
    };

    match document.on {
        Trigger::Absent => {}
        Trigger::Event(event) => {
            workflow.dispatchable = event == DISPATCH_TRIGGER;
        }
        Trigger::Events(events) => {
            workflow.dispatchable = events.iter().any(|e| e.as_str() == Some(DISPATCH_TRIGGER));
        }
        Trigger::Table(DispatchEntry::Missing) => {}
        Trigger::Table(DispatchEntry::Bare) => {
            workflow.dispatchable = true;
        }
        Trigger::Table(DispatchEntry::Configured(config)) => {
            workflow.dispatchable = true;
            if let Some(declarations) = config.inputs {
                workflow.inputs = extract_inputs(declarations)?;
            }
        }
        Trigger::Unexpected(found) => {
            return Err(ParseError::UnexpectedTriggerShape { found });
        }
    }

    Ok(workflow)
}

/// The subset of a workflow document the parser reads.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    on: Trigger,
}

/// Shape of the `on` clause.
#[derive(Debug, Default)]
enum Trigger {
    /// No `on` key at all.
    #[default]
    Absent,
    Event(String),
    Events(Vec<Value>),
    Table(DispatchEntry),
    /// Any other YAML node kind.
    Unexpected(&'static str),
}

/// The `workflow_dispatch` entry of a mapping-style `on` clause.
#[derive(Debug)]
enum DispatchEntry {
    Missing,
    /// Present with a null value.
    Bare,
    Configured(DispatchConfig),
}

#[derive(Debug, Default, Deserialize)]
struct DispatchConfig {
    #[serde(default)]
    inputs: Option<InputDeclarations>,
}

/// Input declarations in source order.
#[derive(Debug, Default)]
struct InputDeclarations(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TriggerVisitor)
    }
}

struct TriggerVisitor;

impl<'de> Visitor<'de> for TriggerVisitor {
    type Value = Trigger;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an event name, a list of event names, or a mapping of events")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Trigger, E> {
        Ok(Trigger::Event(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Trigger, E> {
        Ok(Trigger::Event(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Trigger, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut events = Vec::new();
        while let Some(event) = seq.next_element::<Value>()? {
            events.push(event);
        }
        Ok(Trigger::Events(events))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Trigger, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entry = DispatchEntry::Missing;
        while let Some(event) = map.next_key::<Value>()? {
            if event.as_str() == Some(DISPATCH_TRIGGER) {
                entry = match map.next_value::<Option<DispatchConfig>>()? {
                    Some(config) => DispatchEntry::Configured(config),
                    None => DispatchEntry::Bare,
                };
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(Trigger::Table(entry))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("null"))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("number"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("number"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Trigger, E> {
        Ok(Trigger::Unexpected("number"))
    }

    // YAML tags such as `!custom workflow_dispatch` arrive as enums.
    fn visit_enum<A>(self, data: A) -> Result<Trigger, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (_, variant) = data.variant::<IgnoredAny>()?;
        variant.newtype_variant::<IgnoredAny>()?;
        Ok(Trigger::Unexpected("tagged value"))
    }
}

impl<'de> Deserialize<'de> for InputDeclarations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeclarationsVisitor;

        impl<'de> Visitor<'de> for DeclarationsVisitor {
            type Value = InputDeclarations;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of input names to input configuration")
            }

            fn visit_map<A>(self, mut map: A) -> Result<InputDeclarations, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut declarations = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, config)) = map.next_entry::<String, Value>()? {
                    declarations.push((name, config));
                }
                Ok(InputDeclarations(declarations))
            }
        }

        deserializer.deserialize_map(DeclarationsVisitor)
    }
}

fn extract_inputs(declarations: InputDeclarations) -> Result<Vec<Input>, ParseError> {
    let mut inputs: Vec<Input> = Vec::with_capacity(declarations.0.len());
    for (name, config) in declarations.0 {
        let input = read_input(name, &config)?;
        // A redeclared input replaces the earlier one in place.
        match inputs.iter_mut().find(|existing| existing.name == input.name) {
            Some(existing) => *existing = input,
            None => inputs.push(input),
        }
    }
    Ok(inputs)
}

fn read_input(name: String, config: &Value) -> Result<Input, ParseError> {
    let config = match config {
        Value::Mapping(m) => m,
        other => {
            return Err(ParseError::MalformedInputField {
                input: name,
                field: "configuration",
                found: value_kind(other),
            })
        }
    };

    let mut input = Input::new(name);

    if let Some(description) = config.get("description") {
        match description {
            Value::String(s) => input.description = s.clone(),
            other => {
                return Err(ParseError::MalformedInputField {
                    input: input.name,
                    field: "description",
                    found: value_kind(other),
                })
            }
        }
    }

    if let Some(declared) = config.get("type") {
        let declared = match declared {
            Value::String(s) => s.as_str(),
            other => {
                return Err(ParseError::MalformedInputField {
                    input: input.name,
                    field: "type",
                    found: value_kind(other),
                })
            }
        };
        input.input_type = match InputType::from_declared(declared) {
            Some(t) => t,
            None => {
                tracing::warn!("Input {} has unknown type {}", input.name, declared);
                InputType::String
            }
        };
    }

    if input.input_type == InputType::Choice {
        match config.get("options") {
            Some(Value::Sequence(options)) => {
                input.choices = Some(options.iter().map(display_value).collect());
            }
            Some(other) => {
                return Err(ParseError::MalformedInputField {
                    input: input.name,
                    field: "options",
                    found: value_kind(other),
                })
            }
            None => return Err(ParseError::MissingChoiceOptions { input: input.name }),
        }
    }

    if let Some(default) = config.get("default") {
        input.default = display_value(default);
    }

    Ok(input)
}

/// Render a YAML value as the text a user would type for it.
///
/// Scalars render bare (`true`, `3`, `main`); null renders empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", display_value(k), display_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => display_value(&tagged.value),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    const NAME: &str = "test.yml";

    fn parse(content: &str) -> Workflow {
        let workflow = parse_workflow(NAME, content.as_bytes()).unwrap();
        assert_eq!(workflow.name, NAME);
        workflow
    }

    fn parse_err(content: &str) -> ParseError {
        parse_workflow(NAME, content.as_bytes()).unwrap_err()
    }

    #[test]
    fn push_only_is_not_dispatchable() {
        let workflow = parse("on: push\n");
        assert!(!workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn scalar_dispatch_trigger() {
        let workflow = parse("on: workflow_dispatch\n");
        assert!(workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn scalar_trigger_must_match_exactly() {
        assert!(!parse("on: workflow_dispatch_extra\n").dispatchable);
    }

    #[test]
    fn list_dispatch_trigger() {
        let workflow = parse(
            r#"
on:
  - push
  - pull_request
  - workflow_dispatch
"#,
        );
        assert!(workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn list_without_dispatch_trigger() {
        assert!(!parse("on: [push, pull_request]\n").dispatchable);
    }

    #[test]
    fn mapping_dispatch_trigger_with_empty_config() {
        let workflow = parse(
            r#"
on:
  push: {}
  pull_request: {}
  workflow_dispatch: {}
"#,
        );
        assert!(workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn mapping_dispatch_trigger_with_null_config() {
        let workflow = parse(
            r#"
on:
  push:
    branches: [main]
  workflow_dispatch:
"#,
        );
        assert!(workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn mapping_without_dispatch_trigger() {
        let workflow = parse(
            r#"
on:
  push:
    branches: [main]
  pull_request: {}
"#,
        );
        assert!(!workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn missing_on_clause_is_not_dispatchable() {
        let workflow = parse("name: CI\njobs: {}\n");
        assert!(!workflow.dispatchable);
    }

    #[test]
    fn dispatch_with_null_inputs_has_no_inputs() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
"#,
        );
        assert!(workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn inputs_keep_declaration_order() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      some_input: {}
      some_input_with_description:
        description: "Some input description."
"#,
        );
        assert!(workflow.dispatchable);
        assert_eq!(
            workflow.inputs,
            vec![
                Input::new("some_input"),
                Input {
                    name: "some_input_with_description".to_string(),
                    description: "Some input description.".to_string(),
                    ..Default::default()
                },
            ]
        );
    }

    #[test]
    fn inputs_order_is_not_alphabetical() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      zeta: {}
      alpha: {}
      mid: {}
"#,
        );
        let names: Vec<&str> = workflow.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn typed_inputs() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      dry_run:
        type: boolean
      target:
        type: choice
        options: [foo, bar]
      env:
        type: environment
      plain:
        type: string
"#,
        );
        assert_eq!(workflow.inputs[0].input_type, InputType::Boolean);
        assert_eq!(workflow.inputs[1].input_type, InputType::Choice);
        assert_eq!(
            workflow.inputs[1].options(),
            Some(&["foo".to_string(), "bar".to_string()][..])
        );
        assert_eq!(workflow.inputs[2].input_type, InputType::Environment);
        assert!(workflow.inputs[2].options().is_none());
        assert_eq!(workflow.inputs[3].input_type, InputType::String);
    }

    #[test]
    fn unknown_type_falls_back_to_string() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      weird:
        type: bogus
"#,
        );
        assert_eq!(workflow.inputs[0].input_type, InputType::String);
    }

    #[test]
    fn unknown_type_logs_a_warning() {
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let workflow = tracing::subscriber::with_default(subscriber, || {
            parse("on:\n  workflow_dispatch:\n    inputs:\n      weird:\n        type: bogus\n")
        });

        assert_eq!(workflow.inputs[0].input_type, InputType::String);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Input weird has unknown type bogus"));
    }

    #[test]
    fn choice_options_are_stringified() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      level:
        type: choice
        options: [1, true, three]
"#,
        );
        assert_eq!(
            workflow.inputs[0].options().unwrap(),
            ["1".to_string(), "true".to_string(), "three".to_string()]
        );
    }

    #[test]
    fn options_ignored_for_non_choice_inputs() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      name:
        options: [a, b]
"#,
        );
        assert!(workflow.inputs[0].options().is_none());
    }

    #[test]
    fn string_default_passes_through() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      name:
        default: foo
"#,
        );
        assert_eq!(workflow.inputs[0].default, "foo");
    }

    #[test]
    fn non_string_defaults_are_stringified() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      flag:
        type: boolean
        default: true
      count:
        default: 3
"#,
        );
        assert_eq!(workflow.inputs[0].default, "true");
        assert_eq!(workflow.inputs[1].default, "3");
    }

    #[test]
    fn redeclared_input_keeps_last_declaration() {
        let workflow = parse(
            r#"
on:
  workflow_dispatch:
    inputs:
      a:
        description: first
      b: {}
      a:
        description: second
"#,
        );
        assert_eq!(workflow.inputs.len(), 2);
        assert_eq!(workflow.inputs[0].name, "a");
        assert_eq!(workflow.inputs[0].description, "second");
        assert_eq!(workflow.inputs[1].name, "b");
    }

    #[test]
    fn choice_without_options_is_an_error() {
        let err = parse_err(
            r#"
on:
  workflow_dispatch:
    inputs:
      target:
        type: choice
"#,
        );
        assert!(matches!(err, ParseError::MissingChoiceOptions { ref input } if input == "target"));
    }

    #[test]
    fn choice_with_scalar_options_is_an_error() {
        let err = parse_err(
            r#"
on:
  workflow_dispatch:
    inputs:
      target:
        type: choice
        options: foo
"#,
        );
        assert!(matches!(
            err,
            ParseError::MalformedInputField {
                field: "options",
                ..
            }
        ));
    }

    #[test]
    fn non_string_description_is_an_error() {
        let err = parse_err(
            r#"
on:
  workflow_dispatch:
    inputs:
      target:
        description: [not, text]
"#,
        );
        assert!(matches!(
            err,
            ParseError::MalformedInputField {
                field: "description",
                found: "sequence",
                ..
            }
        ));
    }

    #[test]
    fn non_mapping_input_configuration_is_an_error() {
        let err = parse_err(
            r#"
on:
  workflow_dispatch:
    inputs:
      target: nope
"#,
        );
        assert!(matches!(
            err,
            ParseError::MalformedInputField {
                field: "configuration",
                ..
            }
        ));
    }

    #[test]
    fn unexpected_trigger_shapes() {
        assert!(matches!(
            parse_err("on: 42\n"),
            ParseError::UnexpectedTriggerShape { found: "number" }
        ));
        assert!(matches!(
            parse_err("on: true\n"),
            ParseError::UnexpectedTriggerShape { found: "boolean" }
        ));
        assert!(matches!(
            parse_err("on:\n"),
            ParseError::UnexpectedTriggerShape { found: "null" }
        ));
        assert!(matches!(
            parse_err("on: !custom workflow_dispatch\n"),
            ParseError::UnexpectedTriggerShape {
                found: "tagged value"
            }
        ));
    }

    #[test]
    fn invalid_yaml_is_malformed_document() {
        let err = parse_err("on: [push\n  - broken: {");
        assert!(matches!(err, ParseError::MalformedDocument(_)));
        assert!(err.to_string().starts_with("Unable to parse workflow as YAML"));
    }

    #[test]
    fn inputs_are_ignored_outside_dispatch_trigger() {
        let workflow = parse(
            r#"
on:
  workflow_call:
    inputs:
      secret_thing:
        type: string
"#,
        );
        assert!(!workflow.dispatchable);
        assert!(workflow.inputs.is_empty());
    }

    #[test]
    fn display_value_renders_collections() {
        let value: Value = serde_yaml::from_str("[a, 1, {k: v}]").unwrap();
        assert_eq!(display_value(&value), "[a, 1, {k: v}]");
        assert_eq!(display_value(&Value::Null), "");
    }
}
