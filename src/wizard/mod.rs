//! Multi-step case-creation wizard.
//!
//! [`WizardSession`] is the single owner of the wizard state; the step
//! sections describe what each step collects, and the footer view is derived
//! from the session on demand.

pub mod driver;
pub mod fields;
pub mod footer;
pub mod registry;
pub mod route;
pub mod session;
pub mod signal;
pub mod stepper;
pub mod steps;
pub mod store;

pub use driver::{dispatch, press_forward, submit_current_step, ForwardOutcome};
pub use fields::{FieldDescriptor, FieldErrors, FieldKind, StepSchema, ValidationError, Validator};
pub use footer::{ControlState, FooterPhase, FooterView, ForwardAction, ForwardLabel};
pub use registry::{FormId, StepDescriptor, StepKind, StepRegistry};
pub use route::RouteIdentity;
pub use session::{
    CaseRequest, ForwardIntent, PendingSubmission, StepRequest, SubmissionOutcome, SubmissionTicket,
    SubmitRejected, WizardSession,
};
pub use signal::StatusSignal;
pub use stepper::StepperController;
pub use steps::{keys, StepSection, SubmitAction};
pub use store::{FormData, FormPatch, FormStore, FormValues};
