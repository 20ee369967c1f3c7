//! Per-step form sections of the case-creation wizard.

pub mod attachments;
pub mod clinical;
pub mod complete;
pub mod patient;
pub mod review;

pub use attachments::AttachmentsStep;
pub use clinical::ClinicalStep;
pub use complete::CompleteStep;
pub use patient::PatientStep;
pub use review::ReviewStep;

use super::fields::{FieldErrors, StepSchema};
use super::registry::StepKind;
use super::store::{FormPatch, FormValues};

/// Field names shared between the step schemas and the case payload.
pub mod keys {
    pub const PATIENT_FIRST_NAME: &str = "patient_first_name";
    pub const PATIENT_LAST_NAME: &str = "patient_last_name";
    pub const PATIENT_BIRTH_DATE: &str = "patient_birth_date";
    pub const PATIENT_GENDER: &str = "patient_gender";
    pub const TREATMENT_TYPE: &str = "treatment_type";
    pub const ARCHES: &str = "arches";
    pub const CLINICAL_NOTES: &str = "clinical_notes";
    pub const URGENT: &str = "urgent";
    pub const ATTACHMENTS: &str = "attachments";
    pub const TERMS_ACCEPTED: &str = "terms_accepted";
    pub const CASE_ID: &str = "case_id";
}

/// What a successful submit of a step does besides merging its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// Merge locally and advance; no network call.
    Merge,
    /// Create the case on the server (and upload its attachments).
    CreateCase,
    /// The step has no form; the footer navigates home instead.
    Terminal,
}

/// One wizard step's form: its schema, validation and submit behaviour.
pub trait StepSection: Send + Sync {
    fn kind(&self) -> StepKind;

    fn schema(&self) -> &StepSchema;

    /// Cross-field checks run after every field validated; each message is a
    /// form-level error.
    fn check(&self, _patch: &FormPatch) -> Vec<String> {
        Vec::new()
    }

    fn action(&self) -> SubmitAction {
        SubmitAction::Merge
    }

    /// Store keys this step fills from the server response rather than from
    /// its form.
    fn output_defaults(&self) -> FormPatch {
        FormPatch::new()
    }

    fn validate(&self, values: &FormValues) -> Result<FormPatch, FieldErrors> {
        let patch = self.schema().validate_values(values)?;
        let problems = self.check(&patch);
        if problems.is_empty() {
            return Ok(patch);
        }
        let mut errors = FieldErrors::new();
        for problem in problems {
            errors.push_form(problem);
        }
        Err(errors)
    }
}
