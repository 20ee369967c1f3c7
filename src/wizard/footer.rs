//! Footer navigation view.
//!
//! A read-only projection of the stepper and the status signal; it decides
//! which controls exist, how the forward control is labelled and what it
//! does, and whether each control is enabled.

use std::fmt;

use super::registry::{FormId, StepKind, StepRegistry};
use super::signal::StatusSignal;
use super::stepper::StepperController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterPhase {
    FirstStep,
    MiddleStep,
    PenultimateStep,
    TerminalStep,
}

impl FooterPhase {
    /// Terminal wins over penultimate, which wins over first.
    pub fn derive(current: usize, total: usize) -> Self {
        let total = total.max(1);
        if current + 1 >= total {
            FooterPhase::TerminalStep
        } else if current + 2 == total {
            FooterPhase::PenultimateStep
        } else if current == 0 {
            FooterPhase::FirstStep
        } else {
            FooterPhase::MiddleStep
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardLabel {
    Next,
    Finish,
    ReturnHome,
}

impl ForwardLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardLabel::Next => "Next",
            ForwardLabel::Finish => "Finish",
            ForwardLabel::ReturnHome => "Return home",
        }
    }
}

impl fmt::Display for ForwardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardAction {
    /// Submit the form with this identity.
    SubmitForm(FormId),
    /// Client-side navigation to the given route.
    NavigateHome(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub visible: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub phase: FooterPhase,
    pub step: usize,
    pub total_steps: usize,
    pub step_label: &'static str,
    pub back: ControlState,
    pub forward: ControlState,
    pub forward_label: ForwardLabel,
    pub forward_action: ForwardAction,
    pub error: Option<String>,
}

impl FooterView {
    pub fn build(
        registry: &StepRegistry,
        stepper: &StepperController,
        signal: &StatusSignal,
        home_route: &str,
    ) -> Self {
        let step = stepper.current_step();
        let total_steps = stepper.total_steps();
        let phase = FooterPhase::derive(step, total_steps);
        let disabled = signal.controls_disabled();
        let descriptor = registry.descriptor(step);

        let (forward_label, forward_action) = match phase {
            FooterPhase::TerminalStep => (
                ForwardLabel::ReturnHome,
                ForwardAction::NavigateHome(home_route.to_string()),
            ),
            FooterPhase::PenultimateStep => (
                ForwardLabel::Finish,
                ForwardAction::SubmitForm(form_id_for(descriptor.map(|d| d.form_id))),
            ),
            FooterPhase::FirstStep | FooterPhase::MiddleStep => (
                ForwardLabel::Next,
                ForwardAction::SubmitForm(form_id_for(descriptor.map(|d| d.form_id))),
            ),
        };

        Self {
            phase,
            step,
            total_steps,
            step_label: descriptor.map(|d| d.label).unwrap_or_default(),
            back: ControlState {
                visible: step > 0,
                enabled: step > 0 && !disabled,
            },
            forward: ControlState {
                visible: true,
                enabled: !disabled,
            },
            forward_label,
            forward_action,
            error: signal.error.clone(),
        }
    }
}

fn form_id_for(id: Option<FormId>) -> FormId {
    // Stepper and registry always have the same length.
    id.unwrap_or_else(|| StepKind::Complete.form_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_for_five_steps() {
        let phases: Vec<FooterPhase> = (0..5).map(|i| FooterPhase::derive(i, 5)).collect();
        assert_eq!(
            phases,
            vec![
                FooterPhase::FirstStep,
                FooterPhase::MiddleStep,
                FooterPhase::MiddleStep,
                FooterPhase::PenultimateStep,
                FooterPhase::TerminalStep,
            ]
        );
    }

    #[test]
    fn small_wizards_prefer_terminal_then_penultimate() {
        assert_eq!(FooterPhase::derive(0, 1), FooterPhase::TerminalStep);
        assert_eq!(FooterPhase::derive(0, 2), FooterPhase::PenultimateStep);
        assert_eq!(FooterPhase::derive(1, 2), FooterPhase::TerminalStep);
    }
}
