use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{
    domain::{LoginForm, Route, Session},
    error::INVALID_CREDENTIALS_MESSAGE,
};
use storage::SessionStore;
use tracing::{debug, info};

use crate::{
    api::PortalApi,
    controller::{failure_message, SubmitOutcome},
    lifetime::{Lifetime, LifetimeHandle},
    navigation::{NavigationMode, Navigator},
};

pub struct LoginController {
    api: Arc<dyn PortalApi>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    form: LoginForm,
    error: Option<&'static str>,
    lifetime: Lifetime,
}

impl LoginController {
    pub fn new(
        api: Arc<dyn PortalApi>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
            form: LoginForm::default(),
            error: None,
            lifetime: Lifetime::new(),
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn lifetime(&self) -> LifetimeHandle {
        self.lifetime.handle()
    }

    /// Exchanges credentials for a session. The store is written only once both
    /// token and name are in hand, and both keys land in one write.
    pub async fn submit(&mut self, form: LoginForm) -> Result<SubmitOutcome> {
        self.form = form;
        self.error = None;

        let handle = self.lifetime.handle();
        let Some(result) = handle.run(self.api.login(&self.form)).await else {
            debug!("login cancelled before a response");
            return Ok(SubmitOutcome::Cancelled);
        };

        let session = match result {
            Ok(body) => Session::from(body),
            Err(err) => {
                info!(error = %err, "login failed");
                self.error = Some(failure_message(&err, INVALID_CREDENTIALS_MESSAGE));
                return Ok(SubmitOutcome::Failed);
            }
        };

        self.store
            .save_session(&session)
            .await
            .context("failed to persist session after login")?;
        info!(name = %session.name, "login succeeded");

        self.navigator
            .navigate(Route::Dashboard, NavigationMode::Push);
        Ok(SubmitOutcome::Navigated(Route::Dashboard))
    }
}

#[cfg(test)]
#[path = "../tests/login_tests.rs"]
mod tests;
