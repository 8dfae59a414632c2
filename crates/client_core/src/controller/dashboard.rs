use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use shared::domain::{Profile, Route};
use storage::SessionStore;
use tracing::{debug, info, warn};

use crate::{
    api::PortalApi,
    lifetime::{Lifetime, LifetimeHandle},
    navigation::{NavigationMode, Navigator},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Checking,
    Authorized(Profile),
    Unauthorized,
}

/// What the dashboard shows once the profile has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub greeting: String,
    pub email: String,
    pub status: &'static str,
    pub status_hint: &'static str,
    pub account_name: String,
}

impl DashboardView {
    fn from_profile(profile: &Profile) -> Self {
        let account_name = if profile.name.is_empty() {
            "User".to_string()
        } else {
            profile.name.clone()
        };
        Self {
            greeting: format!("Welcome back, {}", profile.name),
            email: profile.email.clone(),
            status: "Signed in",
            status_hint: "Your session is active.",
            account_name,
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard")?;
        writeln!(f, "{}", self.greeting)?;
        writeln!(f, "{}", self.email)?;
        writeln!(f)?;
        writeln!(f, "Status:  {} ({})", self.status, self.status_hint)?;
        writeln!(f, "Account: {} <{}>", self.account_name, self.email)
    }
}

pub struct DashboardController {
    api: Arc<dyn PortalApi>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    state: DashboardState,
    lifetime: Lifetime,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn PortalApi>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
            state: DashboardState::Checking,
            lifetime: Lifetime::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn lifetime(&self) -> LifetimeHandle {
        self.lifetime.handle()
    }

    /// Only an Authorized dashboard renders anything.
    pub fn view(&self) -> Option<DashboardView> {
        match &self.state {
            DashboardState::Authorized(profile) => Some(DashboardView::from_profile(profile)),
            DashboardState::Checking | DashboardState::Unauthorized => None,
        }
    }

    /// Verifies the stored token against `/me`. Anything short of a successful,
    /// well-formed profile response redirects to login. The store is left as is.
    pub async fn mount(&mut self) -> &DashboardState {
        self.state = DashboardState::Checking;

        let token = match self.store.token().await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                debug!("no stored token");
                return self.deny();
            }
            Err(err) => {
                warn!(error = %err, "session store unreadable, treating as signed out");
                return self.deny();
            }
        };

        let handle = self.lifetime.handle();
        let Some(result) = handle.run(self.api.fetch_profile(&token)).await else {
            debug!("profile check cancelled before a response");
            return &self.state;
        };

        match result {
            Ok(profile) => {
                info!(name = %profile.name, "profile verified");
                self.state = DashboardState::Authorized(profile);
                &self.state
            }
            Err(err) => {
                info!(error = %err, "profile check failed");
                self.deny()
            }
        }
    }

    /// Clears every stored key, not only the session pair, then returns to the landing screen.
    pub async fn logout(&mut self) -> Result<()> {
        self.store
            .clear()
            .await
            .context("failed to clear session store on logout")?;
        self.state = DashboardState::Unauthorized;
        info!("logged out");
        self.navigator.navigate(Route::Landing, NavigationMode::Push);
        Ok(())
    }

    pub fn back_to_home(&self) {
        self.navigator.navigate(Route::Landing, NavigationMode::Push);
    }

    fn deny(&mut self) -> &DashboardState {
        self.state = DashboardState::Unauthorized;
        self.navigator.navigate(Route::Login, NavigationMode::Replace);
        &self.state
    }
}

#[cfg(test)]
#[path = "../tests/dashboard_tests.rs"]
mod tests;
