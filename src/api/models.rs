use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;
use crate::wizard::keys;
use crate::wizard::FormData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
}

/// Body of `POST /cases`, assembled from the accumulated wizard data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseDraft {
    /// Reference chosen once per wizard instance; retries send the same one.
    pub client_reference: Uuid,
    pub patient: PatientPayload,
    pub treatment_type: String,
    pub arches: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
    pub urgent: bool,
    /// Uploaded separately after the case exists.
    #[serde(skip)]
    pub attachments: Vec<PathBuf>,
}

impl CaseDraft {
    pub fn from_form(data: &FormData, client_reference: Uuid) -> Result<Self, ApiError> {
        let text = |key: &'static str| -> Result<String, ApiError> {
            data.get_str(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or(ApiError::IncompleteDraft(key))
        };

        let birth_date = NaiveDate::parse_from_str(&text(keys::PATIENT_BIRTH_DATE)?, "%Y-%m-%d")
            .map_err(|_| ApiError::IncompleteDraft(keys::PATIENT_BIRTH_DATE))?;
        let clinical_notes = data
            .get_str(keys::CLINICAL_NOTES)
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(Self {
            client_reference,
            patient: PatientPayload {
                first_name: text(keys::PATIENT_FIRST_NAME)?,
                last_name: text(keys::PATIENT_LAST_NAME)?,
                birth_date,
                gender: text(keys::PATIENT_GENDER)?,
            },
            treatment_type: text(keys::TREATMENT_TYPE)?,
            arches: text(keys::ARCHES)?,
            clinical_notes,
            urgent: data.get_bool(keys::URGENT).unwrap_or(false),
            attachments: data
                .get_list(keys::ATTACHMENTS)
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        })
    }
}

/// Response of `POST /cases`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseCreated {
    #[serde(alias = "_id")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> FormData {
        FormData::new(
            [
                (keys::PATIENT_FIRST_NAME, json!("Ada")),
                (keys::PATIENT_LAST_NAME, json!("Lovelace")),
                (keys::PATIENT_BIRTH_DATE, json!("1990-12-10")),
                (keys::PATIENT_GENDER, json!("female")),
                (keys::TREATMENT_TYPE, json!("aligners")),
                (keys::ARCHES, json!("both")),
                (keys::CLINICAL_NOTES, json!("")),
                (keys::URGENT, json!(true)),
                (keys::ATTACHMENTS, json!(["scan.stl", "smile.jpg"])),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }

    #[test]
    fn draft_is_built_from_form_data() {
        let reference = Uuid::new_v4();
        let draft = CaseDraft::from_form(&form(), reference).unwrap();
        assert_eq!(draft.client_reference, reference);
        assert_eq!(draft.patient.last_name, "Lovelace");
        assert_eq!(draft.clinical_notes, None);
        assert!(draft.urgent);
        assert_eq!(draft.attachments.len(), 2);

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["patient"]["birth_date"], "1990-12-10");
        assert!(body.get("attachments").is_none());
        assert!(body.get("clinical_notes").is_none());
    }

    #[test]
    fn missing_field_is_reported() {
        let mut data = form();
        data.merge(&[(keys::ARCHES.to_string(), json!(""))].into_iter().collect());
        let err = CaseDraft::from_form(&data, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::IncompleteDraft(keys::ARCHES)));
    }

    #[test]
    fn created_accepts_underscore_id() {
        let created: CaseCreated = serde_json::from_str(r#"{"_id":"c-17"}"#).unwrap();
        assert_eq!(created.id, "c-17");
    }
}
