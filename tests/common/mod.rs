#![allow(dead_code)]

use std::{
    collections::VecDeque,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use async_trait::async_trait;
use casedesk_core::{
    api::{ApiError, CaseApi, CaseCreated, CaseDraft},
    cli::{CliError, PromptContext, PromptResponse, StepInteraction},
    cli::interaction::StepScreen,
    wizard::{keys, FieldErrors, FormValues, StepRegistry, WizardSession},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated data directory for one test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

/// A mounted five-step case-creation session.
pub fn new_session() -> WizardSession {
    let mut session = WizardSession::new(StepRegistry::case_creation(today()));
    session.enter_route("/cases/new");
    session
}

fn values(pairs: &[(&str, Value)]) -> FormValues {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub fn patient_values() -> FormValues {
    values(&[
        (keys::PATIENT_FIRST_NAME, json!("Ada")),
        (keys::PATIENT_LAST_NAME, json!("Lovelace")),
        (keys::PATIENT_BIRTH_DATE, json!("1990-12-10")),
        (keys::PATIENT_GENDER, json!("Female")),
    ])
}

pub fn clinical_values() -> FormValues {
    values(&[
        (keys::TREATMENT_TYPE, json!("aligners")),
        (keys::ARCHES, json!("both")),
        (keys::CLINICAL_NOTES, json!("Crowding on lower incisors")),
        (keys::URGENT, json!(false)),
    ])
}

/// Scan and photo files that exist on disk for the attachments step.
static ATTACHMENT_FILES: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    let base = temp_base();
    ["upper.stl", "lower.stl", "smile.jpg"]
        .into_iter()
        .map(|name| {
            let path = base.join(name);
            fs::write(&path, b"attachment").expect("write attachment fixture");
            path
        })
        .collect()
});

pub fn attachment_files() -> Vec<PathBuf> {
    ATTACHMENT_FILES.clone()
}

pub fn attachment_values() -> FormValues {
    let paths: Vec<String> = attachment_files()
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    values(&[(keys::ATTACHMENTS, json!(paths))])
}

pub fn review_values() -> FormValues {
    values(&[(keys::TERMS_ACCEPTED, json!(true))])
}

/// Valid values for each submittable step, in order.
pub fn valid_steps() -> Vec<FormValues> {
    vec![
        patient_values(),
        clinical_values(),
        attachment_values(),
        review_values(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateCase(CaseDraft),
    Upload { case_id: String, files: Vec<PathBuf> },
}

/// In-memory [`CaseApi`] recording every call.
pub struct MockCaseApi {
    pub calls: Mutex<Vec<ApiCall>>,
    case_id: String,
    failures: Mutex<VecDeque<ApiError>>,
    upload_failures: Mutex<VecDeque<ApiError>>,
    created: Mutex<usize>,
}

impl MockCaseApi {
    pub fn new(case_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            case_id: case_id.to_string(),
            failures: Mutex::new(VecDeque::new()),
            upload_failures: Mutex::new(VecDeque::new()),
            created: Mutex::new(0),
        }
    }

    /// The next `create_case` call fails with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// The next `upload_attachments` call fails with `error`.
    pub fn fail_next_upload(&self, error: ApiError) {
        self.upload_failures.lock().unwrap().push_back(error);
    }

    /// Number of `create_case` calls, successful or not.
    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ApiCall::CreateCase(_)))
            .count()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaseApi for MockCaseApi {
    async fn create_case(&self, draft: &CaseDraft) -> Result<CaseCreated, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::CreateCase(draft.clone()));
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        let mut created = self.created.lock().unwrap();
        *created += 1;
        // Every record the server creates gets its own id.
        let id = if *created == 1 {
            self.case_id.clone()
        } else {
            format!("{}-{}", self.case_id, created)
        };
        Ok(CaseCreated { id })
    }

    async fn upload_attachments(&self, case_id: &str, files: &[PathBuf]) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(ApiCall::Upload {
            case_id: case_id.to_string(),
            files: files.to_vec(),
        });
        match self.upload_failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Interaction double answering prompts from a script.
#[derive(Default)]
pub struct ScriptedInteraction {
    pub answers: VecDeque<PromptResponse>,
    pub retries: VecDeque<bool>,
    pub screens: Vec<(usize, String)>,
    pub prompted: Vec<String>,
    pub errors: Vec<FieldErrors>,
    pub notices: Vec<String>,
    pub acknowledged: Vec<String>,
}

impl ScriptedInteraction {
    pub fn new(answers: Vec<PromptResponse>) -> Self {
        Self {
            answers: answers.into(),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retries: Vec<bool>) -> Self {
        self.retries = retries.into();
        self
    }
}

impl StepInteraction for ScriptedInteraction {
    fn show_step(&mut self, screen: &StepScreen<'_>) {
        self.screens
            .push((screen.footer.step, screen.footer.forward_label.as_str().to_string()));
    }

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> Result<PromptResponse, CliError> {
        self.prompted.push(context.field.key.to_string());
        Ok(self.answers.pop_front().unwrap_or(PromptResponse::Cancel))
    }

    fn show_errors(&mut self, errors: &FieldErrors) {
        self.errors.push(errors.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn confirm_retry(&mut self, _message: &str) -> Result<bool, CliError> {
        Ok(self.retries.pop_front().unwrap_or(false))
    }

    fn acknowledge(&mut self, label: &str) -> Result<(), CliError> {
        self.acknowledged.push(label.to_string());
        Ok(())
    }
}

/// Text answers that complete every step with valid data.
pub fn happy_path_answers() -> Vec<PromptResponse> {
    let files = attachment_files()
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ");
    [
        "Ada".to_string(),
        "Lovelace".to_string(),
        "1990-12-10".to_string(),
        "female".to_string(),
        "aligners".to_string(),
        "upper".to_string(),
        String::new(),
        "no".to_string(),
        files,
        "yes".to_string(),
    ]
    .into_iter()
    .map(PromptResponse::Value)
    .collect()
}
