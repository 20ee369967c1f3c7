use super::{StepSection, SubmitAction};
use crate::wizard::fields::StepSchema;
use crate::wizard::registry::StepKind;

/// Terminal confirmation step; it has no form.
#[derive(Default)]
pub struct CompleteStep {
    schema: StepSchema,
}

impl CompleteStep {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepSection for CompleteStep {
    fn kind(&self) -> StepKind {
        StepKind::Complete
    }

    fn schema(&self) -> &StepSchema {
        &self.schema
    }

    fn action(&self) -> SubmitAction {
        SubmitAction::Terminal
    }
}
