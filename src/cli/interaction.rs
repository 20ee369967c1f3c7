//! Prompting surface of the wizard runner.
//!
//! [`StepInteraction`] abstracts the terminal so the runner can be driven by
//! scripted doubles in tests; [`DialoguerInteraction`] is the interactive
//! implementation.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use super::{output, CliError};
use crate::wizard::{FieldDescriptor, FieldErrors, FieldKind, FooterView};

const BACK_COMMAND: &str = ":back";
const CANCEL_COMMAND: &str = ":cancel";

/// Describes how a field prompt was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// Keep the value already shown.
    Keep,
    /// Previous field, or previous step from the first field.
    Back,
    /// Abort the wizard.
    Cancel,
}

pub struct PromptContext<'a> {
    pub field: &'a FieldDescriptor,
    /// Current value rendered as text, when there is one.
    pub current: Option<String>,
    pub errors: &'a [String],
    pub index: usize,
    pub total: usize,
}

/// What the runner shows when a step is entered.
pub struct StepScreen<'a> {
    pub footer: &'a FooterView,
    /// Label/value pairs of the data collected so far.
    pub summary: Vec<(String, String)>,
}

pub trait StepInteraction {
    fn show_step(&mut self, screen: &StepScreen<'_>);

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> Result<PromptResponse, CliError>;

    fn show_errors(&mut self, errors: &FieldErrors);

    fn notify(&mut self, message: &str);

    /// Asked after a failed submission; `false` abandons the wizard.
    fn confirm_retry(&mut self, message: &str) -> Result<bool, CliError>;

    /// Final screen; the user activates the forward control labelled `label`.
    fn acknowledge(&mut self, label: &str) -> Result<(), CliError>;
}

pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_text(&self, context: &PromptContext<'_>) -> Result<PromptResponse, CliError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(context.field.label)
            .allow_empty(true);
        if let Some(current) = &context.current {
            input = input.default(current.clone());
        }
        let raw = input.interact_text()?;
        Ok(parse_text_response(&raw, context.current.as_deref()))
    }

    fn prompt_choice(
        &self,
        context: &PromptContext<'_>,
        options: &[&'static str],
    ) -> Result<PromptResponse, CliError> {
        let mut items: Vec<String> = options.iter().map(|option| option.to_string()).collect();
        items.push("← Back".into());
        let default = context
            .current
            .as_deref()
            .and_then(|current| options.iter().position(|o| o.eq_ignore_ascii_case(current)))
            .unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(context.field.label)
            .items(&items)
            .default(default)
            .interact_opt()?;
        Ok(match selection {
            None => PromptResponse::Cancel,
            Some(index) if index == options.len() => PromptResponse::Back,
            Some(index) => PromptResponse::Value(options[index].to_string()),
        })
    }
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_text_response(raw: &str, current: Option<&str>) -> PromptResponse {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(BACK_COMMAND) {
        PromptResponse::Back
    } else if trimmed.eq_ignore_ascii_case(CANCEL_COMMAND) {
        PromptResponse::Cancel
    } else if current.map(|c| c == trimmed).unwrap_or(false) {
        PromptResponse::Keep
    } else {
        PromptResponse::Value(trimmed.to_string())
    }
}

impl StepInteraction for DialoguerInteraction {
    fn show_step(&mut self, screen: &StepScreen<'_>) {
        let footer = screen.footer;
        output::section(format!(
            "Step {} of {}: {}",
            footer.step + 1,
            footer.total_steps,
            footer.step_label
        ));
        for (label, value) in &screen.summary {
            output::detail(format!("{label}: {value}"));
        }
        if let Some(error) = &footer.error {
            output::error(error);
        }
        let mut hints = vec![format!("Enter submits ({}).", footer.forward_label)];
        if footer.back.visible {
            hints.push(format!("Type {BACK_COMMAND} to go back."));
        }
        hints.push(format!("Type {CANCEL_COMMAND} to abandon the case."));
        output::detail(hints.join(" "));
    }

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> Result<PromptResponse, CliError> {
        for message in context.errors {
            output::warning(message);
        }
        if let Some(help) = context.field.help {
            output::detail(help);
        }
        match &context.field.kind {
            FieldKind::Choice(options) => self.prompt_choice(context, options),
            _ => self.prompt_text(context),
        }
    }

    fn show_errors(&mut self, errors: &FieldErrors) {
        for message in &errors.form {
            output::error(message);
        }
        for (field, messages) in &errors.fields {
            for message in messages {
                output::error(format!("{field}: {message}"));
            }
        }
    }

    fn notify(&mut self, message: &str) {
        output::warning(message);
    }

    fn confirm_retry(&mut self, message: &str) -> Result<bool, CliError> {
        output::error(message);
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Retry the submission?")
            .default(true)
            .interact()?)
    }

    fn acknowledge(&mut self, label: &str) -> Result<(), CliError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("Press Enter to {}", label.to_lowercase()))
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }
}
