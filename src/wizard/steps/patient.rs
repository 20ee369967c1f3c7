use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::keys;
use super::StepSection;
use crate::wizard::fields::{FieldDescriptor, FieldKind, StepSchema, Validator};
use crate::wizard::registry::StepKind;

const GENDERS: [&str; 3] = ["male", "female", "other"];

/// Letters (any script), spaces, hyphens and apostrophes.
fn name_validator(label: &'static str) -> Validator {
    Validator::Custom(Arc::new(move |value| {
        let text = value.as_str().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(format!("{label} is required"));
        }
        if text
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\''))
        {
            Ok(Value::String(text.to_string()))
        } else {
            Err(format!("{label} may only contain letters, spaces, hyphens and apostrophes"))
        }
    }))
}

pub struct PatientStep {
    schema: StepSchema,
}

impl PatientStep {
    pub fn new(today: NaiveDate) -> Self {
        let fields = vec![
            FieldDescriptor::new(
                keys::PATIENT_FIRST_NAME,
                "First name",
                FieldKind::Text,
                name_validator("First name"),
            ),
            FieldDescriptor::new(
                keys::PATIENT_LAST_NAME,
                "Last name",
                FieldKind::Text,
                name_validator("Last name"),
            ),
            FieldDescriptor::new(
                keys::PATIENT_BIRTH_DATE,
                "Birth date (YYYY-MM-DD)",
                FieldKind::Date,
                Validator::DateNotAfter(today),
            ),
            FieldDescriptor::new(
                keys::PATIENT_GENDER,
                "Gender",
                FieldKind::Choice(GENDERS.to_vec()),
                Validator::OneOf(GENDERS.to_vec()),
            )
            .with_help("One of: male, female, other."),
        ];
        Self {
            schema: StepSchema::new(fields),
        }
    }
}

impl StepSection for PatientStep {
    fn kind(&self) -> StepKind {
        StepKind::Patient
    }

    fn schema(&self) -> &StepSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::store::FormValues;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
    }

    fn values(first: &str, birth: &str) -> FormValues {
        [
            (keys::PATIENT_FIRST_NAME, json!(first)),
            (keys::PATIENT_LAST_NAME, json!("Lovelace")),
            (keys::PATIENT_BIRTH_DATE, json!(birth)),
            (keys::PATIENT_GENDER, json!("Female")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn accepts_a_complete_patient() {
        let patch = PatientStep::new(today())
            .validate(&values("Ada", "2011-12-10"))
            .expect("valid");
        assert_eq!(patch.get(keys::PATIENT_GENDER), Some(&json!("female")));
    }

    #[test]
    fn rejects_digits_in_names_and_future_birth_dates() {
        let errors = PatientStep::new(today())
            .validate(&values("Ada2", "2030-01-01"))
            .expect_err("invalid");
        assert_eq!(errors.for_field(keys::PATIENT_FIRST_NAME).len(), 1);
        assert_eq!(errors.for_field(keys::PATIENT_BIRTH_DATE).len(), 1);
    }

    #[test]
    fn accepts_hyphenated_and_accented_names() {
        assert!(PatientStep::new(today())
            .validate(&values("Anne-Hélène", "1990-02-02"))
            .is_ok());
    }
}
