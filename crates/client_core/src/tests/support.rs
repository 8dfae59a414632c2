//! In-process stand-in for the portal service.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use storage::MemorySessionStore;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{History, HttpPortalApi, Portal};

#[derive(Clone)]
pub struct Reply {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, body.to_string())
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("status"),
            body: body.into(),
            delay: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::raw(status, "")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn into_response(self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

struct MockState {
    register_reply: Reply,
    login_reply: Reply,
    me_reply: Reply,
    register_bodies: Vec<Value>,
    login_bodies: Vec<Value>,
    me_authorizations: Vec<Option<String>>,
}

#[derive(Clone)]
pub struct MockPortal {
    state: Arc<Mutex<MockState>>,
}

impl MockPortal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                register_reply: Reply::empty(201),
                login_reply: Reply::empty(401),
                me_reply: Reply::empty(401),
                register_bodies: Vec::new(),
                login_bodies: Vec::new(),
                me_authorizations: Vec::new(),
            })),
        }
    }

    pub async fn reply_register(&self, reply: Reply) {
        self.state.lock().await.register_reply = reply;
    }

    pub async fn reply_login(&self, reply: Reply) {
        self.state.lock().await.login_reply = reply;
    }

    pub async fn reply_me(&self, reply: Reply) {
        self.state.lock().await.me_reply = reply;
    }

    pub async fn register_bodies(&self) -> Vec<Value> {
        self.state.lock().await.register_bodies.clone()
    }

    pub async fn login_bodies(&self) -> Vec<Value> {
        self.state.lock().await.login_bodies.clone()
    }

    pub async fn me_authorizations(&self) -> Vec<Option<String>> {
        self.state.lock().await.me_authorizations.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/me", get(me))
            .with_state(self.clone())
    }

    /// Serves the mock on an ephemeral port and returns its base url.
    pub async fn spawn(&self) -> String {
        serve(self.router()).await
    }
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// A base url nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

async fn register(State(portal): State<MockPortal>, Json(body): Json<Value>) -> Response {
    let reply = {
        let mut guard = portal.state.lock().await;
        guard.register_bodies.push(body);
        guard.register_reply.clone()
    };
    reply.into_response().await
}

async fn login(State(portal): State<MockPortal>, Json(body): Json<Value>) -> Response {
    let reply = {
        let mut guard = portal.state.lock().await;
        guard.login_bodies.push(body);
        guard.login_reply.clone()
    };
    reply.into_response().await
}

async fn me(State(portal): State<MockPortal>, headers: HeaderMap) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let reply = {
        let mut guard = portal.state.lock().await;
        guard.me_authorizations.push(authorization);
        guard.me_reply.clone()
    };
    reply.into_response().await
}

pub struct Harness {
    pub mock: MockPortal,
    pub store: Arc<MemorySessionStore>,
    pub history: Arc<History>,
    pub portal: Portal,
}

pub async fn harness() -> Harness {
    let mock = MockPortal::new();
    let base_url = mock.spawn().await;
    harness_for(mock, &base_url)
}

pub fn harness_for(mock: MockPortal, base_url: &str) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let history = Arc::new(History::default());
    let api = Arc::new(HttpPortalApi::new(base_url).expect("api"));
    let portal = Portal::new(api, store.clone(), history.clone());
    Harness {
        mock,
        store,
        history,
        portal,
    }
}
