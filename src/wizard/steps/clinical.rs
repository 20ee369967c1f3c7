use serde_json::Value;

use super::keys;
use super::StepSection;
use crate::wizard::fields::{FieldDescriptor, FieldKind, StepSchema, Validator};
use crate::wizard::registry::StepKind;

const TREATMENTS: [&str; 3] = ["aligners", "retainers", "brackets"];
const ARCHES: [&str; 3] = ["upper", "lower", "both"];
const MAX_NOTES: usize = 2000;

pub struct ClinicalStep {
    schema: StepSchema,
}

impl ClinicalStep {
    pub fn new() -> Self {
        let fields = vec![
            FieldDescriptor::new(
                keys::TREATMENT_TYPE,
                "Treatment type",
                FieldKind::Choice(TREATMENTS.to_vec()),
                Validator::OneOf(TREATMENTS.to_vec()),
            )
            .with_default(Value::String("aligners".into())),
            FieldDescriptor::new(
                keys::ARCHES,
                "Arches to treat",
                FieldKind::Choice(ARCHES.to_vec()),
                Validator::OneOf(ARCHES.to_vec()),
            )
            .with_default(Value::String("both".into())),
            FieldDescriptor::new(
                keys::CLINICAL_NOTES,
                "Clinical notes",
                FieldKind::Text,
                Validator::MaxLength(MAX_NOTES),
            )
            .with_optional()
            .with_help("Free-text instructions for the lab."),
            FieldDescriptor::new(keys::URGENT, "Urgent case", FieldKind::Boolean, Validator::Boolean),
        ];
        Self {
            schema: StepSchema::new(fields),
        }
    }
}

impl Default for ClinicalStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSection for ClinicalStep {
    fn kind(&self) -> StepKind {
        StepKind::Clinical
    }

    fn schema(&self) -> &StepSchema {
        &self.schema
    }
}
