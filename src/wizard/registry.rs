use std::fmt;

use chrono::NaiveDate;

use super::steps::{
    AttachmentsStep, ClinicalStep, CompleteStep, PatientStep, ReviewStep, StepSection,
};
use super::store::FormData;
use crate::errors::{CaseDeskError, Result};

/// The kinds of step the case-creation wizard knows about, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Patient,
    Clinical,
    Attachments,
    Review,
    Complete,
}

impl StepKind {
    pub const CASE_CREATION: [StepKind; 5] = [
        StepKind::Patient,
        StepKind::Clinical,
        StepKind::Attachments,
        StepKind::Review,
        StepKind::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StepKind::Patient => "Patient information",
            StepKind::Clinical => "Clinical details",
            StepKind::Attachments => "Attachments",
            StepKind::Review => "Review & submit",
            StepKind::Complete => "Case created",
        }
    }

    pub fn form_id(self) -> FormId {
        match self {
            StepKind::Patient => FormId("case-patient-form"),
            StepKind::Clinical => FormId("case-clinical-form"),
            StepKind::Attachments => FormId("case-attachments-form"),
            StepKind::Review => FormId("case-review-form"),
            StepKind::Complete => FormId("case-complete"),
        }
    }

    /// Builds the form section for this step. `today` bounds date fields.
    pub fn section(self, today: NaiveDate) -> Box<dyn StepSection> {
        match self {
            StepKind::Patient => Box::new(PatientStep::new(today)),
            StepKind::Clinical => Box::new(ClinicalStep::new()),
            StepKind::Attachments => Box::new(AttachmentsStep::new()),
            StepKind::Review => Box::new(ReviewStep::new()),
            StepKind::Complete => Box::new(CompleteStep::new()),
        }
    }
}

/// Identity token of a step's form; the footer's forward control submits
/// the form carrying this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(&'static str);

impl FormId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub index: usize,
    pub kind: StepKind,
    pub label: &'static str,
    pub form_id: FormId,
}

struct RegisteredStep {
    descriptor: StepDescriptor,
    section: Box<dyn StepSection>,
}

/// Ordered, immutable list of wizard steps.
pub struct StepRegistry {
    steps: Vec<RegisteredStep>,
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|step| step.descriptor))
            .finish()
    }
}

impl StepRegistry {
    pub fn new(kinds: &[StepKind], today: NaiveDate) -> Result<Self> {
        if kinds.is_empty() {
            return Err(CaseDeskError::Config(
                "a wizard needs at least one step".into(),
            ));
        }
        Ok(Self::build(kinds, today))
    }

    /// The standard five-step case-creation wizard.
    pub fn case_creation(today: NaiveDate) -> Self {
        Self::build(&StepKind::CASE_CREATION, today)
    }

    fn build(kinds: &[StepKind], today: NaiveDate) -> Self {
        let steps = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| RegisteredStep {
                descriptor: StepDescriptor {
                    index,
                    kind: *kind,
                    label: kind.label(),
                    form_id: kind.form_id(),
                },
                section: kind.section(today),
            })
            .collect();
        Self { steps }
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn descriptor(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index).map(|step| &step.descriptor)
    }

    pub fn section(&self, index: usize) -> Option<&dyn StepSection> {
        self.steps.get(index).map(|step| step.section.as_ref())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter().map(|step| &step.descriptor)
    }

    /// Union of every step's field defaults: the shape FormData starts from.
    pub fn default_form_data(&self) -> FormData {
        let mut data = FormData::default();
        for step in &self.steps {
            data.merge(&step.section.schema().defaults());
            data.merge(&step.section.output_defaults());
        }
        data
    }
}
