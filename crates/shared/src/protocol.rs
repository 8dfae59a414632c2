use serde::{Deserialize, Serialize};

use crate::domain::{LoginForm, Profile, RegisterForm, Session};

/// Body of `POST /register`.
pub type RegisterRequest = RegisterForm;

/// Body of `POST /login`.
pub type LoginRequest = LoginForm;

/// Body of `GET /me`. Extra claim fields the service returns are ignored.
pub type ProfileResponse = Profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
}

impl From<LoginResponse> for Session {
    fn from(value: LoginResponse) -> Self {
        Self {
            token: value.token,
            name: value.name,
        }
    }
}
