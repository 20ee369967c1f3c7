//! The wizard's owning controller.
//!
//! [`WizardSession`] holds the stepper, the form store and the status signal
//! for one mounted wizard and is the only place they are mutated. Step forms
//! and the footer talk to it through the methods below; asynchronous work is
//! represented by a [`PendingSubmission`] whose result is handed back through
//! [`WizardSession::complete_submission`].

use thiserror::Error;
use uuid::Uuid;

use super::fields::FieldErrors;
use super::footer::{ForwardAction, FooterView};
use super::registry::{StepDescriptor, StepRegistry};
use super::route::RouteIdentity;
use super::signal::StatusSignal;
use super::stepper::StepperController;
use super::steps::{StepSection, SubmitAction};
use super::store::{FormData, FormPatch, FormStore, FormValues};
use crate::storage::SignalStore;

/// Identifies which wizard instance and step a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub epoch: u64,
    pub step: usize,
}

/// Work the caller has to perform before completing a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum StepRequest {
    /// Nothing to do remotely; complete with an empty patch.
    Local,
    /// Create the case from a snapshot of the accumulated form data.
    CreateCase(CaseRequest),
}

/// Input of the final step's remote work.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRequest {
    pub data: FormData,
    /// Fixed for one wizard instance so every attempt reuses it.
    pub client_reference: Uuid,
    /// Case already created by an earlier attempt; only the uploads remain.
    pub created_case: Option<String>,
}

/// A validated step submission awaiting its result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    request: StepRequest,
    patch: FormPatch,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub fn request(&self) -> &StepRequest {
        &self.request
    }

    /// Validated values of the submitted step.
    pub fn patch(&self) -> &FormPatch {
        &self.patch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Advanced { from: usize, to: usize },
    Failed { message: String },
    /// The wizard was reset or moved since the submission started; the
    /// result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardIntent {
    Submit(PendingSubmission),
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in progress")]
    Busy,
    #[error("form is invalid: {0}")]
    Invalid(FieldErrors),
    #[error("this step has nothing to submit")]
    NotSubmittable,
    #[error("navigation controls are disabled")]
    Disabled,
}

pub struct WizardSession {
    registry: StepRegistry,
    stepper: StepperController,
    store: FormStore,
    signal: StatusSignal,
    field_errors: FieldErrors,
    epoch: u64,
    route: Option<RouteIdentity>,
    home_route: String,
    signal_store: Option<Box<dyn SignalStore>>,
    client_reference: Uuid,
    created_case: Option<String>,
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("step", &self.stepper.current_step())
            .field("total_steps", &self.stepper.total_steps())
            .field("epoch", &self.epoch)
            .field("route", &self.route)
            .field("signal", &self.signal)
            .field("durable_signal", &self.signal_store.is_some())
            .field("created_case", &self.created_case)
            .finish()
    }
}

impl WizardSession {
    pub fn new(registry: StepRegistry) -> Self {
        let stepper = StepperController::new(registry.total_steps());
        let store = FormStore::new(registry.default_form_data());
        Self {
            registry,
            stepper,
            store,
            signal: StatusSignal::default(),
            field_errors: FieldErrors::new(),
            epoch: 0,
            route: None,
            home_route: "/".to_string(),
            signal_store: None,
            client_reference: Uuid::new_v4(),
            created_case: None,
        }
    }

    pub fn with_home_route(mut self, home_route: impl Into<String>) -> Self {
        self.home_route = home_route.into();
        self
    }

    /// Persists the status signal through `store` and restores any signal it
    /// already holds.
    pub fn with_signal_store(mut self, store: Box<dyn SignalStore>) -> Self {
        match store.load() {
            Ok(Some(signal)) => {
                tracing::debug!(?signal, "restored wizard signal");
                self.signal = signal.restored();
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "could not restore wizard signal"),
        }
        self.signal_store = Some(store);
        self
    }

    /// Mounts the wizard at `location`. The first mount and every change of
    /// path or query reset the wizard; returns whether a reset happened.
    pub fn enter_route(&mut self, location: &str) -> bool {
        let identity = RouteIdentity::parse(location);
        match &self.route {
            Some(current) if *current == identity => false,
            Some(current) => {
                tracing::info!(from = %current, to = %identity, "route changed, resetting wizard");
                self.route = Some(identity);
                self.reset();
                true
            }
            None => {
                tracing::debug!(route = %identity, "wizard mounted");
                self.route = Some(identity);
                // A signal restored from durable storage survives the mount.
                self.reset_state();
                true
            }
        }
    }

    /// Returns the wizard to its first step with default form data. Any
    /// in-flight submission is abandoned.
    pub fn reset(&mut self) {
        self.reset_state();
        self.signal = StatusSignal::default();
        if let Some(store) = &self.signal_store {
            if let Err(err) = store.clear() {
                tracing::warn!(error = %err, "could not clear stored wizard signal");
            }
        }
    }

    fn reset_state(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.stepper.reset();
        self.store.reset();
        self.field_errors.clear();
        self.client_reference = Uuid::new_v4();
        self.created_case = None;
        if self.signal.is_loading {
            self.signal.is_loading = false;
            self.persist_signal();
        }
        tracing::debug!(epoch = self.epoch, "wizard reset");
    }

    /// Programmatic navigation, clamped to the registered steps.
    pub fn goto_step(&mut self, step: usize) {
        let before = self.stepper.current_step();
        self.stepper.goto_step(step);
        if self.stepper.current_step() != before {
            self.on_step_changed();
        }
    }

    /// The footer's back control. Returns `false` when the control is hidden
    /// or disabled.
    pub fn go_back(&mut self) -> bool {
        if self.stepper.is_first() || self.signal.controls_disabled() {
            return false;
        }
        self.stepper.goto_prev_step();
        self.on_step_changed();
        true
    }

    fn on_step_changed(&mut self) {
        // Leaving a step abandons whatever it had in flight.
        if self.signal.is_loading {
            self.epoch = self.epoch.wrapping_add(1);
            self.signal.is_loading = false;
        }
        self.field_errors.clear();
        self.signal.set_valid(true);
        self.persist_signal();
    }

    /// Validates the active step's current values without submitting them.
    pub fn revalidate(&mut self, values: &FormValues) -> bool {
        let Some(section) = self.registry.section(self.stepper.current_step()) else {
            return true;
        };
        let valid = match section.validate(values) {
            Ok(_) => {
                self.field_errors.clear();
                true
            }
            Err(errors) => {
                self.field_errors = errors;
                false
            }
        };
        if self.signal.is_valid != valid {
            self.signal.set_valid(valid);
            self.persist_signal();
        }
        valid
    }

    /// Validates `values` for the active step and marks the wizard busy.
    pub fn begin_submit(&mut self, values: &FormValues) -> Result<PendingSubmission, SubmitRejected> {
        if self.signal.is_loading {
            return Err(SubmitRejected::Busy);
        }
        let step = self.stepper.current_step();
        let section = self
            .registry
            .section(step)
            .ok_or(SubmitRejected::NotSubmittable)?;
        let action = section.action();
        if action == SubmitAction::Terminal {
            return Err(SubmitRejected::NotSubmittable);
        }

        let patch = match section.validate(values) {
            Ok(patch) => patch,
            Err(errors) => {
                tracing::debug!(step, %errors, "step validation failed");
                self.field_errors = errors.clone();
                self.signal.set_valid(false);
                self.persist_signal();
                return Err(SubmitRejected::Invalid(errors));
            }
        };

        let request = match action {
            SubmitAction::CreateCase => StepRequest::CreateCase(CaseRequest {
                data: self.store.data().merged_with(&patch),
                client_reference: self.client_reference,
                created_case: self.created_case.clone(),
            }),
            _ => StepRequest::Local,
        };
        self.field_errors.clear();
        self.signal.set_valid(true);
        self.signal.start_loading();
        self.persist_signal();

        let ticket = SubmissionTicket {
            epoch: self.epoch,
            step,
        };
        tracing::debug!(?ticket, "submission started");
        Ok(PendingSubmission {
            ticket,
            request,
            patch,
        })
    }

    /// Applies the result of a submission started by [`Self::begin_submit`].
    /// `result` carries the values produced by the request on success or a
    /// display message on failure.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<FormPatch, String>,
    ) -> SubmissionOutcome {
        let current = SubmissionTicket {
            epoch: self.epoch,
            step: self.stepper.current_step(),
        };
        if pending.ticket != current || !self.signal.is_loading {
            tracing::info!(
                submitted = ?pending.ticket,
                current = ?current,
                "discarding stale submission result"
            );
            return SubmissionOutcome::Stale;
        }

        match result {
            Ok(response) => {
                self.store.set_form_data(&pending.patch);
                self.store.set_form_data(&response);
                self.signal.finish_ok();
                let from = current.step;
                self.stepper.goto_next_step();
                let to = self.stepper.current_step();
                self.field_errors.clear();
                self.signal.set_valid(true);
                self.persist_signal();
                tracing::info!(from, to, "step submitted");
                SubmissionOutcome::Advanced { from, to }
            }
            Err(message) => {
                tracing::warn!(step = current.step, %message, "step submission failed");
                self.signal.finish_err(message.clone());
                self.persist_signal();
                SubmissionOutcome::Failed { message }
            }
        }
    }

    /// Remembers a case the server created for this wizard instance, so a
    /// retried submission does not create it again. Ignored when the wizard
    /// was reset since `client_reference` was issued.
    pub fn record_created_case(&mut self, client_reference: Uuid, case_id: &str) -> bool {
        if client_reference != self.client_reference {
            tracing::info!(case_id, "case created for a reset wizard, not recording it");
            return false;
        }
        tracing::debug!(case_id, "case created");
        self.created_case = Some(case_id.to_string());
        true
    }

    pub fn created_case(&self) -> Option<&str> {
        self.created_case.as_deref()
    }

    pub fn footer(&self) -> FooterView {
        FooterView::build(
            &self.registry,
            &self.stepper,
            &self.signal,
            &self.home_route,
        )
    }

    /// The footer's forward control.
    pub fn press_forward(&mut self, values: &FormValues) -> Result<ForwardIntent, SubmitRejected> {
        let footer = self.footer();
        if !footer.forward.enabled {
            return Err(SubmitRejected::Disabled);
        }
        match footer.forward_action {
            ForwardAction::NavigateHome(route) => {
                tracing::info!(%route, "leaving wizard");
                Ok(ForwardIntent::Navigate(route))
            }
            ForwardAction::SubmitForm(form_id) => {
                tracing::debug!(%form_id, "forward control submits form");
                self.begin_submit(values).map(ForwardIntent::Submit)
            }
        }
    }

    pub fn current_step(&self) -> usize {
        self.stepper.current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.stepper.total_steps()
    }

    pub fn current_descriptor(&self) -> Option<&StepDescriptor> {
        self.registry.descriptor(self.stepper.current_step())
    }

    pub fn current_section(&self) -> Option<&dyn StepSection> {
        self.registry.section(self.stepper.current_step())
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn form_data(&self) -> &FormData {
        self.store.data()
    }

    pub fn signal(&self) -> &StatusSignal {
        &self.signal
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn route(&self) -> Option<&RouteIdentity> {
        self.route.as_ref()
    }

    pub fn home_route(&self) -> &str {
        &self.home_route
    }

    pub fn is_terminal(&self) -> bool {
        self.stepper.is_last()
    }

    fn persist_signal(&self) {
        if let Some(store) = &self.signal_store {
            if let Err(err) = store.save(&self.signal) {
                tracing::warn!(error = %err, "could not persist wizard signal");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::steps::keys;
    use chrono::NaiveDate;
    use serde_json::json;

    fn session() -> WizardSession {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        let mut session = WizardSession::new(StepRegistry::case_creation(today));
        session.enter_route("/cases/new");
        session
    }

    fn clinical_values() -> FormValues {
        [
            (keys::TREATMENT_TYPE.to_string(), json!("retainers")),
            (keys::ARCHES.to_string(), json!("upper")),
            (keys::URGENT.to_string(), json!(false)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn local_submission_merges_and_advances() {
        let mut session = session();
        session.goto_step(1);
        let pending = session.begin_submit(&clinical_values()).expect("valid");
        assert_eq!(pending.request(), &StepRequest::Local);
        assert!(session.signal().is_loading);

        let outcome = session.complete_submission(pending, Ok(FormPatch::new()));
        assert_eq!(outcome, SubmissionOutcome::Advanced { from: 1, to: 2 });
        assert_eq!(session.form_data().get_str(keys::ARCHES), Some("upper"));
        assert!(!session.signal().is_loading);
    }

    #[test]
    fn busy_session_rejects_second_submit() {
        let mut session = session();
        session.goto_step(1);
        let _pending = session.begin_submit(&clinical_values()).expect("valid");
        assert_eq!(
            session.begin_submit(&clinical_values()),
            Err(SubmitRejected::Busy)
        );
    }

    #[test]
    fn leaving_a_step_abandons_its_submission() {
        let mut session = session();
        session.goto_step(1);
        let pending = session.begin_submit(&clinical_values()).expect("valid");
        session.goto_step(2);
        assert!(!session.signal().is_loading);
        assert_eq!(
            session.complete_submission(pending, Ok(FormPatch::new())),
            SubmissionOutcome::Stale
        );
        assert_eq!(session.current_step(), 2);
    }

    #[test]
    fn created_case_is_forgotten_on_reset() {
        let mut session = session();
        session.goto_step(3);
        let review: FormValues = [(keys::TERMS_ACCEPTED.to_string(), json!(true))]
            .into_iter()
            .collect();
        let pending = session.begin_submit(&review).expect("valid");
        let StepRequest::CreateCase(request) = pending.request().clone() else {
            panic!("review step creates the case");
        };
        assert_eq!(request.created_case, None);
        assert!(session.record_created_case(request.client_reference, "case-1"));
        assert_eq!(session.created_case(), Some("case-1"));

        session.reset();
        assert_eq!(session.created_case(), None);
        assert!(!session.record_created_case(request.client_reference, "case-1"));
        assert_eq!(session.created_case(), None);
    }

    #[test]
    fn same_route_does_not_reset() {
        let mut session = session();
        session.goto_step(2);
        assert!(!session.enter_route("/cases/new/"));
        assert_eq!(session.current_step(), 2);
    }
}
