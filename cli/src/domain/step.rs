//! Spell steps: ordered units of user input or script execution.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::field::{Field, FieldKind};
use crate::domain::status::scalar_string;

/// Step metadata as written in `<spell>/steps/<name>.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StepSpec {
    pub title: String,
    pub description: String,
    pub viewable: bool,
    pub needs_sudo: bool,
    pub additional_input: Vec<InputSpec>,
}

/// One `additional-input` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSpec {
    pub label: String,
    pub key: String,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// A named step in declared order.
#[derive(Debug, Clone)]
pub struct Step {
    pub name: String,
    /// Source identifier, e.g. `00_pre-bootstrap`; names the step script.
    pub filename: String,
    pub title: String,
    pub description: String,
    pub viewable: bool,
    /// Step asks for a privileged-access password.
    pub needs_sudo: bool,
    pub fields: Vec<Field>,
}

impl Step {
    /// Build a step from its parsed YAML metadata.
    #[must_use]
    pub fn from_spec(filename: &str, spec: StepSpec) -> Self {
        let fields = spec
            .additional_input
            .into_iter()
            .map(|input| {
                let mut field = Field::new(&input.label, &input.key);
                field.kind = input.kind;
                field.required = input.required;
                if let Some(default) = input.default.as_ref().and_then(scalar_string) {
                    field.set_value(default);
                }
                field
            })
            .collect();
        Self {
            name: filename.to_string(),
            filename: filename.to_string(),
            title: spec.title,
            description: spec.description,
            viewable: spec.viewable,
            needs_sudo: spec.needs_sudo,
            fields,
        }
    }

    /// A step with no fields, used only to run a script.
    #[must_use]
    pub fn script(name: &str, filename: &str) -> Self {
        Self {
            name: name.to_string(),
            filename: filename.to_string(),
            title: String::new(),
            description: String::new(),
            viewable: false,
            needs_sudo: false,
            fields: Vec::new(),
        }
    }
}

/// Values supplied when a step completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInput {
    /// Field key → entered value.
    pub values: BTreeMap<String, String>,
    /// Privileged-access password, when the step asked for one.
    pub elevated: Option<String>,
}

impl StepInput {
    /// Input that accepts every field's current (default) value.
    #[must_use]
    pub fn defaults(step: &Step) -> Self {
        Self {
            values: step
                .fields
                .iter()
                .map(|f| (f.key.clone(), f.value().to_string()))
                .collect(),
            elevated: None,
        }
    }
}
