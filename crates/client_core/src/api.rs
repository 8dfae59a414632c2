use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LoginForm, Profile, RegisterForm},
    error::ServiceError,
    protocol::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The three calls the portal screens make against the remote service.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn register(&self, form: &RegisterForm) -> Result<(), ServiceError>;
    async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ServiceError>;
    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError>;
}

#[derive(Debug, Clone)]
struct Endpoints {
    register: Url,
    login: Url,
    me: Url,
}

pub struct HttpPortalApi {
    http: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpPortalApi {
    pub fn new(base_url: &str) -> Result<Self, ClientConfigError> {
        Self::with_timeout(base_url, None)
    }

    /// Without a timeout a hung request is awaited until its screen is cancelled.
    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientConfigError> {
        let base_url = parse_base_url(base_url)?;
        let endpoints = Endpoints {
            register: join_endpoint(&base_url, "register")?,
            login: join_endpoint(&base_url, "login")?,
            me: join_endpoint(&base_url, "me")?,
        };

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            endpoints,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(|err| {
            warn!(operation, error = %err, "portal request produced no response");
            ServiceError::unreachable(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            info!(operation, status = status.as_u16(), "portal request rejected");
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(operation, status = status.as_u16(), "portal request succeeded");
        Ok(response)
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn register(&self, form: &RegisterForm) -> Result<(), ServiceError> {
        let request: &RegisterRequest = form;
        self.send(
            "register",
            self.http.post(self.endpoints.register.clone()).json(request),
        )
        .await?;
        Ok(())
    }

    async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ServiceError> {
        let request: &LoginRequest = form;
        let response = self
            .send(
                "login",
                self.http.post(self.endpoints.login.clone()).json(request),
            )
            .await?;
        read_json("login", response).await
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError> {
        let response = self
            .send(
                "fetch_profile",
                self.http.get(self.endpoints.me.clone()).bearer_auth(token),
            )
            .await?;
        read_json::<ProfileResponse>("fetch_profile", response).await
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, ServiceError> {
    let body = response.bytes().await.map_err(|err| {
        warn!(operation, error = %err, "failed to read portal response body");
        ServiceError::unreachable(format!("failed to read {operation} response: {err}"))
    })?;
    serde_json::from_slice(&body).map_err(|err| {
        warn!(operation, error = %err, "malformed portal response body");
        ServiceError::unreachable(format!("malformed {operation} response: {err}"))
    })
}

/// Parses the base url and makes sure relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, ClientConfigError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|source| ClientConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientConfigError::UnsupportedScheme(raw.to_string()));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn join_endpoint(base_url: &Url, path: &str) -> Result<Url, ClientConfigError> {
    base_url
        .join(path)
        .map_err(|source| ClientConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
