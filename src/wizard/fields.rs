//! Field schema and validation for wizard step forms.
//!
//! Each step describes its fields declaratively; [`StepSchema::validate_values`]
//! turns the raw values a form collected into a normalized patch ready to be
//! merged into the [`FormStore`](super::store::FormStore), or a set of
//! per-field errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::store::{FormPatch, FormValues};

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Collected validation failures for one step submission.
///
/// `fields` is keyed by field name; `form` holds messages that concern the
/// step as a whole (cross-field checks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub form: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, message: impl Into<String>) {
        self.fields
            .entry(key.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn push_form(&mut self, message: impl Into<String>) {
        self.form.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    pub fn for_field(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.form.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .flat_map(|(key, messages)| messages.iter().map(move |m| format!("{key}: {m}")))
            .collect();
        parts.extend(self.form.iter().cloned());
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Supported data kinds for form fields.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Date,
    Boolean,
    Choice(Vec<&'static str>),
    /// A list of local file paths.
    Files,
}

impl FieldKind {
    /// Converts raw text typed by a user into the JSON shape this kind stores.
    pub fn parse_input(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        match self {
            FieldKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Value::Bool(true),
                "n" | "no" | "false" | "0" => Value::Bool(false),
                _ => Value::String(trimmed.to_string()),
            },
            FieldKind::Files => Value::Array(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            ),
            _ => Value::String(trimmed.to_string()),
        }
    }

    /// Renders a stored value back into editable text.
    pub fn display_value(&self, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(true) => "yes".into(),
            Value::Bool(false) => "no".into(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }
}

type ValidatorCallback = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// Built-in validation helpers.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    MaxLength(usize),
    /// A calendar date that is not after the given day.
    DateNotAfter(NaiveDate),
    Boolean,
    MustBeTrue,
    OneOf(Vec<&'static str>),
    /// Every entry must be an existing file using one of the listed
    /// extensions (case-insensitive).
    Files(Vec<&'static str>),
    Custom(Arc<ValidatorCallback>),
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::None => write!(f, "None"),
            Validator::NonEmpty => write!(f, "NonEmpty"),
            Validator::MaxLength(max) => write!(f, "MaxLength({max})"),
            Validator::DateNotAfter(day) => write!(f, "DateNotAfter({day})"),
            Validator::Boolean => write!(f, "Boolean"),
            Validator::MustBeTrue => write!(f, "MustBeTrue"),
            Validator::OneOf(options) => write!(f, "OneOf({options:?})"),
            Validator::Files(exts) => write!(f, "Files({exts:?})"),
            Validator::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Validator {
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        match self {
            Validator::None => Ok(value.clone()),
            Validator::NonEmpty => {
                let text = as_text(value)?;
                if text.is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(Value::String(text))
                }
            }
            Validator::MaxLength(max) => {
                let text = as_text(value)?;
                let count = text.chars().count();
                if count > *max {
                    Err(ValidationError::new(format!(
                        "Cannot exceed {max} characters (got {count})"
                    )))
                } else {
                    Ok(Value::String(text))
                }
            }
            Validator::DateNotAfter(max_date) => {
                let text = as_text(value)?;
                let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .map_err(|_| ValidationError::new("Use YYYY-MM-DD format"))?;
                if date > *max_date {
                    Err(ValidationError::new(format!(
                        "Date cannot be after {}",
                        max_date.format("%Y-%m-%d")
                    )))
                } else {
                    Ok(Value::String(date.to_string()))
                }
            }
            Validator::Boolean => as_bool(value).map(Value::Bool),
            Validator::MustBeTrue => {
                if as_bool(value)? {
                    Ok(Value::Bool(true))
                } else {
                    Err(ValidationError::new("This must be accepted to continue"))
                }
            }
            Validator::OneOf(options) => {
                let text = as_text(value)?;
                let normalized = text.to_lowercase();
                options
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == normalized)
                    .map(|found| Value::String(found.to_string()))
                    .ok_or_else(|| choice_error(&text, options))
            }
            Validator::Files(extensions) => {
                let entries = as_list(value)?;
                for entry in &entries {
                    let ext = Path::new(entry)
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(str::to_ascii_lowercase)
                        .unwrap_or_default();
                    if !extensions.iter().any(|allowed| *allowed == ext) {
                        return Err(ValidationError::new(format!(
                            "`{}` is not an accepted file type (allowed: {})",
                            entry,
                            extensions.join(", ")
                        )));
                    }
                    if !Path::new(entry).is_file() {
                        return Err(ValidationError::new(format!(
                            "`{entry}` does not exist or is not a file"
                        )));
                    }
                }
                Ok(Value::Array(entries.into_iter().map(Value::String).collect()))
            }
            Validator::Custom(func) => func(value).map_err(ValidationError::new),
        }
    }
}

fn as_text(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ValidationError::new("Expected a text value")),
    }
}

fn as_bool(value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok(true),
            "n" | "no" | "false" | "0" => Ok(false),
            _ => Err(ValidationError::new("Enter yes or no")),
        },
        _ => Err(ValidationError::new("Enter yes or no")),
    }
}

fn as_list(value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| ValidationError::new("Expected a list of file paths"))
            })
            .collect(),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()),
        _ => Err(ValidationError::new("Expected a list of file paths")),
    }
}

fn choice_error(input: &str, options: &[&'static str]) -> ValidationError {
    let normalized = input.to_lowercase();
    let closest = options
        .iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(&normalized, candidate)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match closest {
        Some((candidate, _)) => ValidationError::new(format!(
            "Unknown value `{input}`. Did you mean `{candidate}`?"
        )),
        None => ValidationError::new(format!("Value must be one of: {}", options.join(", "))),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
    pub default: Value,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        let default = match &kind {
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::Files => Value::Array(Vec::new()),
            _ => Value::String(String::new()),
        };
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
            default,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }
}

/// Ordered field list for one wizard step.
#[derive(Debug, Clone, Default)]
pub struct StepSchema {
    pub fields: Vec<FieldDescriptor>,
}

impl StepSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Default values for every field of this step.
    pub fn defaults(&self) -> FormPatch {
        self.fields
            .iter()
            .map(|field| (field.key.to_string(), field.default.clone()))
            .collect()
    }

    /// Validates the raw values of a form. Keys not declared by the schema
    /// are dropped; blank optional fields fall back to their defaults.
    pub fn validate_values(&self, values: &FormValues) -> Result<FormPatch, FieldErrors> {
        let mut patch = FormPatch::new();
        let mut errors = FieldErrors::new();

        for field in &self.fields {
            let raw = values.get(field.key).unwrap_or(&Value::Null);
            if is_blank(raw) {
                if field.required {
                    errors.push(field.key, format!("{} is required", field.label));
                } else {
                    patch.insert(field.key.to_string(), field.default.clone());
                }
                continue;
            }
            match field.validator.validate(raw) {
                Ok(value) => {
                    patch.insert(field.key.to_string(), value);
                }
                Err(err) => errors.push(field.key, err.message),
            }
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}
