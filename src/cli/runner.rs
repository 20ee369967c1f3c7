//! Terminal driver for the case-creation wizard.

use std::collections::BTreeMap;

use serde_json::Value;

use super::interaction::{PromptContext, PromptResponse, StepInteraction, StepScreen};
use super::CliError;
use crate::api::CaseApi;
use crate::wizard::{
    driver, keys, FieldErrors, FooterPhase, FormValues, ForwardOutcome, SubmissionOutcome,
    SubmitRejected, WizardSession,
};

/// Location the terminal front end mounts the wizard at.
pub const NEW_CASE_ROUTE: &str = "/cases/new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Completed {
        case_id: Option<String>,
        home_route: String,
    },
    Cancelled,
}

enum Collected {
    Values(FormValues),
    Back,
    Cancel,
}

/// Runs the wizard until the user returns home from the final step or
/// cancels.
pub async fn run_wizard<A, I>(
    session: &mut WizardSession,
    api: &A,
    interaction: &mut I,
) -> Result<WizardOutcome, CliError>
where
    A: CaseApi + ?Sized,
    I: StepInteraction + ?Sized,
{
    session.enter_route(NEW_CASE_ROUTE);
    // Raw answers per step, so revisiting a step shows what was typed.
    let mut drafts: BTreeMap<usize, FormValues> = BTreeMap::new();
    let mut errors = FieldErrors::new();

    loop {
        let footer = session.footer();
        interaction.show_step(&StepScreen {
            footer: &footer,
            summary: summary(session),
        });

        if footer.phase == FooterPhase::TerminalStep {
            interaction.acknowledge(footer.forward_label.as_str())?;
            let case_id = session.form_data().get_str(keys::CASE_ID).map(str::to_string);
            match driver::press_forward(session, api, &FormValues::new()).await {
                Ok(ForwardOutcome::Navigate(home_route)) => {
                    return Ok(WizardOutcome::Completed {
                        case_id,
                        home_route,
                    })
                }
                Ok(ForwardOutcome::Submitted(outcome)) => {
                    tracing::warn!(?outcome, "terminal step submitted a form");
                }
                Err(rejected) => interaction.notify(&rejected.to_string()),
            }
            continue;
        }

        let step = session.current_step();
        let draft = drafts.entry(step).or_default();
        let values = match collect_values(session, interaction, draft, &errors)? {
            Collected::Values(values) => values,
            Collected::Cancel => {
                tracing::info!(step, "wizard cancelled");
                return Ok(WizardOutcome::Cancelled);
            }
            Collected::Back => {
                if session.go_back() {
                    errors.clear();
                } else if step > 0 {
                    interaction.notify("Fix the highlighted fields before going back.");
                }
                continue;
            }
        };

        if !session.revalidate(&values) {
            errors = session.field_errors().clone();
            interaction.show_errors(&errors);
            continue;
        }

        match driver::press_forward(session, api, &values).await {
            Ok(ForwardOutcome::Submitted(SubmissionOutcome::Advanced { .. })) => errors.clear(),
            Ok(ForwardOutcome::Submitted(SubmissionOutcome::Failed { message })) => {
                if !interaction.confirm_retry(&message)? {
                    return Ok(WizardOutcome::Cancelled);
                }
            }
            Ok(ForwardOutcome::Submitted(SubmissionOutcome::Stale)) => {}
            Ok(ForwardOutcome::Navigate(home_route)) => {
                return Ok(WizardOutcome::Completed {
                    case_id: None,
                    home_route,
                })
            }
            Err(SubmitRejected::Invalid(invalid)) => {
                interaction.show_errors(&invalid);
                errors = invalid;
            }
            Err(rejected) => interaction.notify(&rejected.to_string()),
        }
    }
}

fn collect_values<I>(
    session: &WizardSession,
    interaction: &mut I,
    draft: &mut FormValues,
    errors: &FieldErrors,
) -> Result<Collected, CliError>
where
    I: StepInteraction + ?Sized,
{
    let Some(section) = session.current_section() else {
        return Ok(Collected::Values(draft.clone()));
    };
    let fields = &section.schema().fields;
    let mut index = 0;
    while index < fields.len() {
        let field = &fields[index];
        let current = draft
            .get(field.key)
            .or_else(|| session.form_data().get(field.key))
            .cloned();
        let context = PromptContext {
            field,
            current: current
                .as_ref()
                .map(|value| field.kind.display_value(value))
                .filter(|text| !text.is_empty()),
            errors: errors.for_field(field.key),
            index,
            total: fields.len(),
        };
        match interaction.prompt_field(&context)? {
            PromptResponse::Value(raw) => {
                draft.insert(field.key.to_string(), field.kind.parse_input(&raw));
                index += 1;
            }
            PromptResponse::Keep => {
                draft.insert(field.key.to_string(), current.unwrap_or(Value::Null));
                index += 1;
            }
            PromptResponse::Back if index == 0 => return Ok(Collected::Back),
            PromptResponse::Back => index -= 1,
            PromptResponse::Cancel => return Ok(Collected::Cancel),
        }
    }
    Ok(Collected::Values(draft.clone()))
}

/// Values collected by the steps before the current one.
fn summary(session: &WizardSession) -> Vec<(String, String)> {
    let current = session.current_step();
    let mut lines = Vec::new();
    for descriptor in session.registry().descriptors().take_while(|d| d.index < current) {
        let Some(section) = session.registry().section(descriptor.index) else {
            continue;
        };
        for field in &section.schema().fields {
            if let Some(value) = session.form_data().get(field.key) {
                let text = field.kind.display_value(value);
                if !text.is_empty() {
                    lines.push((field.label.to_string(), text));
                }
            }
        }
    }
    if let Some(case_id) = session.form_data().get_str(keys::CASE_ID) {
        lines.push(("Case reference".to_string(), case_id.to_string()));
    }
    lines
}
