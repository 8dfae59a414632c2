use std::sync::Arc;

use shared::{domain::RegisterForm, domain::Route, error::REGISTRATION_FAILED_MESSAGE};
use tracing::{debug, info};

use crate::{
    api::PortalApi,
    controller::{failure_message, SubmitOutcome},
    lifetime::{Lifetime, LifetimeHandle},
    navigation::{NavigationMode, Navigator},
};

pub struct RegisterController {
    api: Arc<dyn PortalApi>,
    navigator: Arc<dyn Navigator>,
    form: RegisterForm,
    error: Option<&'static str>,
    lifetime: Lifetime,
}

impl RegisterController {
    pub fn new(api: Arc<dyn PortalApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            form: RegisterForm::default(),
            error: None,
            lifetime: Lifetime::new(),
        }
    }

    pub fn form(&self) -> &RegisterForm {
        &self.form
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn lifetime(&self) -> LifetimeHandle {
        self.lifetime.handle()
    }

    /// Sends the form to `/register`. Success moves to the login screen without signing in.
    pub async fn submit(&mut self, form: RegisterForm) -> SubmitOutcome {
        self.form = form;
        self.error = None;

        let handle = self.lifetime.handle();
        let Some(result) = handle.run(self.api.register(&self.form)).await else {
            debug!("registration cancelled before a response");
            return SubmitOutcome::Cancelled;
        };

        match result {
            Ok(()) => {
                info!("registration accepted");
                self.navigator.navigate(Route::Login, NavigationMode::Push);
                SubmitOutcome::Navigated(Route::Login)
            }
            Err(err) => {
                info!(error = %err, "registration failed");
                self.error = Some(failure_message(&err, REGISTRATION_FAILED_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/register_tests.rs"]
mod tests;
