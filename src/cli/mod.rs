pub mod interaction;
pub mod output;
pub mod runner;

use std::io;

use chrono::Local;
use thiserror::Error;

use crate::{
    api::{ApiError, HttpCaseApi},
    config::{ConfigManager, SignalPersistence},
    errors::CaseDeskError,
    storage::JsonSignalStore,
    utils::build_info,
    wizard::{StepRegistry, WizardSession},
};

pub use interaction::{DialoguerInteraction, PromptContext, PromptResponse, StepInteraction};
pub use runner::{run_wizard, WizardOutcome, NEW_CASE_ROUTE};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CaseDeskError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn run_cli() -> Result<(), CliError> {
    output::banner(&build_info::current());

    let manager = ConfigManager::new()?;
    let config = manager.load_or_init()?.with_env_overrides();
    tracing::debug!(api = %config.api_base_url, persistence = %config.signal_persistence, "configuration loaded");

    let registry = StepRegistry::case_creation(Local::now().date_naive());
    let mut session = WizardSession::new(registry).with_home_route(config.home_route.clone());
    if config.signal_persistence == SignalPersistence::Durable {
        let store = JsonSignalStore::new(Some(manager.base_dir().to_path_buf()))?;
        session = session.with_signal_store(Box::new(store));
    }
    let api = HttpCaseApi::new(&config)?;
    let mut interaction = DialoguerInteraction::new();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match runtime.block_on(run_wizard(&mut session, &api, &mut interaction))? {
        WizardOutcome::Completed {
            case_id,
            home_route,
        } => {
            match case_id {
                Some(id) => output::success(format!("Case {id} created.")),
                None => output::success("Case created."),
            }
            output::detail(format!("Returning to {home_route}"));
        }
        WizardOutcome::Cancelled => output::info("Case creation cancelled."),
    }
    Ok(())
}
