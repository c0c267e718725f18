use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, mail, server, utils};

use errors::AppError;
use mail::notifier::Notifier;
use repositories::store::SharedStore;
use settings::{AppConfig, StorageBackend};
use use_cases::{contact::ContactHandler, projects::ProjectHandler};

pub type AppProjectHandler = ProjectHandler<SharedStore>;
pub type AppContactHandler = ContactHandler<SharedStore, Arc<dyn Notifier>>;

pub struct AppState {
    /// `None` when the data store is unconfigured or was unreachable at start-up.
    pub store: Option<SharedStore>,
    pub storage_backend: StorageBackend,
    pub project_handler: Option<AppProjectHandler>,
    pub contact_handler: Option<AppContactHandler>,
    pub mailer_configured: bool,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Option<SharedStore>, notifier: Arc<dyn Notifier>) -> Self {
        let project_handler = store.clone().map(ProjectHandler::new);
        let mailer_configured = notifier.is_configured();
        let contact_handler = store.clone().map(|store| {
            ContactHandler::new(
                store,
                notifier,
                config.notification_recipient(),
                config.owner_name.clone(),
            )
        });

        AppState {
            store,
            storage_backend: config.storage_backend,
            project_handler,
            contact_handler,
            mailer_configured,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    pub fn projects(&self) -> Result<&AppProjectHandler, AppError> {
        self.project_handler.as_ref().ok_or_else(store_unavailable)
    }

    pub fn contacts(&self) -> Result<&AppContactHandler, AppError> {
        self.contact_handler.as_ref().ok_or_else(store_unavailable)
    }
}

fn store_unavailable() -> AppError {
    AppError::ServiceUnavailable("Database is not configured".to_string())
}
