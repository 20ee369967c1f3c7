//! Runs the request behind a [`PendingSubmission`] and feeds the result back
//! into the session.

use serde_json::Value;

use super::session::{
    CaseRequest, ForwardIntent, PendingSubmission, StepRequest, SubmissionOutcome, SubmitRejected,
    WizardSession,
};
use super::steps::keys;
use super::store::{FormPatch, FormValues};
use crate::api::{ApiError, CaseApi, CaseDraft};

/// Performs the work of `pending` and completes it on `session`.
pub async fn dispatch<A>(
    session: &mut WizardSession,
    api: &A,
    pending: PendingSubmission,
) -> SubmissionOutcome
where
    A: CaseApi + ?Sized,
{
    let result = match pending.request() {
        StepRequest::Local => Ok(FormPatch::new()),
        StepRequest::CreateCase(request) => create_case(session, api, request)
            .await
            .map_err(|err| err.display_message()),
    };
    session.complete_submission(pending, result)
}

/// Creates the case unless an earlier attempt already did, then uploads its
/// attachments.
async fn create_case<A>(
    session: &mut WizardSession,
    api: &A,
    request: &CaseRequest,
) -> Result<FormPatch, ApiError>
where
    A: CaseApi + ?Sized,
{
    let draft = CaseDraft::from_form(&request.data, request.client_reference)?;
    let case_id = match &request.created_case {
        Some(case_id) => {
            tracing::info!(%case_id, "case already exists, retrying attachment upload");
            case_id.clone()
        }
        None => {
            let created = api.create_case(&draft).await?;
            session.record_created_case(request.client_reference, &created.id);
            created.id
        }
    };
    api.upload_attachments(&case_id, &draft.attachments).await?;
    let mut patch = FormPatch::new();
    patch.insert(keys::CASE_ID.to_string(), Value::String(case_id));
    Ok(patch)
}

/// Submits the active step's `values` and waits for the outcome.
pub async fn submit_current_step<A>(
    session: &mut WizardSession,
    api: &A,
    values: &FormValues,
) -> Result<SubmissionOutcome, SubmitRejected>
where
    A: CaseApi + ?Sized,
{
    let pending = session.begin_submit(values)?;
    Ok(dispatch(session, api, pending).await)
}

/// Activates the footer's forward control. Navigation intents are returned
/// to the caller untouched.
pub async fn press_forward<A>(
    session: &mut WizardSession,
    api: &A,
    values: &FormValues,
) -> Result<ForwardOutcome, SubmitRejected>
where
    A: CaseApi + ?Sized,
{
    match session.press_forward(values)? {
        ForwardIntent::Submit(pending) => Ok(ForwardOutcome::Submitted(
            dispatch(session, api, pending).await,
        )),
        ForwardIntent::Navigate(route) => Ok(ForwardOutcome::Navigate(route)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    Submitted(SubmissionOutcome),
    Navigate(String),
}
