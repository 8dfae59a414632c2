use std::sync::Arc;

use storage::SessionStore;

pub mod api;
pub mod controller;
pub mod lifetime;
pub mod navigation;

pub use api::{ClientConfigError, HttpPortalApi, PortalApi, DEFAULT_API_BASE};
pub use controller::{
    dashboard::{DashboardController, DashboardState, DashboardView},
    landing::{LandingController, LandingView},
    login::LoginController,
    register::RegisterController,
    SubmitOutcome,
};
pub use lifetime::{Lifetime, LifetimeHandle};
pub use navigation::{History, Navigation, NavigationMode, Navigator};

/// Dependencies every screen is built from. Cloning shares them.
#[derive(Clone)]
pub struct Portal {
    pub api: Arc<dyn PortalApi>,
    pub store: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl Portal {
    pub fn new(
        api: Arc<dyn PortalApi>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
        }
    }

    pub fn landing(&self) -> LandingController {
        LandingController::new(self.navigator.clone())
    }

    pub fn register(&self) -> RegisterController {
        RegisterController::new(self.api.clone(), self.navigator.clone())
    }

    pub fn login(&self) -> LoginController {
        LoginController::new(self.api.clone(), self.store.clone(), self.navigator.clone())
    }

    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self.api.clone(), self.store.clone(), self.navigator.clone())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
