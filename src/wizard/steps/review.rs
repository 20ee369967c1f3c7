use serde_json::Value;

use super::keys;
use super::{StepSection, SubmitAction};
use crate::wizard::fields::{FieldDescriptor, FieldKind, StepSchema, Validator};
use crate::wizard::registry::StepKind;
use crate::wizard::store::FormPatch;

/// Last form of the wizard; submitting it creates the case.
pub struct ReviewStep {
    schema: StepSchema,
}

impl ReviewStep {
    pub fn new() -> Self {
        let fields = vec![FieldDescriptor::new(
            keys::TERMS_ACCEPTED,
            "I confirm the information above is accurate",
            FieldKind::Boolean,
            Validator::MustBeTrue,
        )];
        Self {
            schema: StepSchema::new(fields),
        }
    }
}

impl Default for ReviewStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSection for ReviewStep {
    fn kind(&self) -> StepKind {
        StepKind::Review
    }

    fn schema(&self) -> &StepSchema {
        &self.schema
    }

    fn action(&self) -> SubmitAction {
        SubmitAction::CreateCase
    }

    fn output_defaults(&self) -> FormPatch {
        [(keys::CASE_ID.to_string(), Value::Null)].into_iter().collect()
    }
}
