use std::{fmt, sync::Arc};

use shared::domain::Route;

use crate::navigation::{NavigationMode, Navigator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub links: Vec<(&'static str, Route)>,
}

impl fmt::Display for LandingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        for (label, route) in &self.links {
            writeln!(f, "  [{label}] {route}")?;
        }
        Ok(())
    }
}

pub struct LandingController {
    navigator: Arc<dyn Navigator>,
}

impl LandingController {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    pub fn view(&self) -> LandingView {
        LandingView {
            title: "Registration Portal",
            subtitle: "Welcome, choose an action",
            links: vec![("Register", Route::Register), ("Login", Route::Login)],
        }
    }

    pub fn open_register(&self) {
        self.navigator.navigate(Route::Register, NavigationMode::Push);
    }

    pub fn open_login(&self) {
        self.navigator.navigate(Route::Login, NavigationMode::Push);
    }
}
