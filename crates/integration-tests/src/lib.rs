//! Integration tests for Tencent Ads conversion reporting.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tencent-ads-conversion-integration-tests
//! ```
//!
//! No network access is needed: [`StubApi`] serves the attribution API's two
//! endpoints from an in-process `axum` server on `127.0.0.1`, records every
//! request it receives and answers with a configurable status and body.
//!
//! # Test Categories
//!
//! - `reporter_callback` - Callback-token reports
//! - `reporter_click_id` - Click-id reports
//! - `reporter_errors` - Credential, configuration and transport failures

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use tencent_ads_conversion::{Endpoints, ReporterConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request captured by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// The body parsed as JSON (`Null` if it is not JSON).
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_default()
    }

    /// A header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Canned reply for every request.
#[derive(Debug, Clone)]
struct StubReply {
    status: StatusCode,
    body: String,
}

#[derive(Debug)]
struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    reply: Mutex<StubReply>,
}

/// In-process stand-in for the attribution API.
#[derive(Debug)]
pub struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Start a stub that answers `200 {"code":0,"message":"success"}`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(StubState {
            requests: Mutex::new(Vec::new()),
            reply: Mutex::new(StubReply {
                status: StatusCode::OK,
                body: r#"{"code":0,"message":"success"}"#.to_string(),
            }),
        });

        let app = Router::new().fallback(record).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Change the reply for subsequent requests.
    pub fn reply_with(&self, status: StatusCode, body: impl Into<String>) {
        *self
            .state
            .reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = StubReply {
            status,
            body: body.into(),
        };
    }

    /// Endpoints pointing at this stub, using the platform's paths.
    ///
    /// # Panics
    ///
    /// Panics if the local address does not form a valid URL.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::with_base(&format!("http://{}/", self.addr)).expect("stub base url")
    }

    /// A config targeting this stub.
    #[must_use]
    pub fn config(
        &self,
        access_token: Option<&str>,
        account_id: Option<&str>,
        action_set_id: Option<&str>,
    ) -> ReporterConfig {
        ReporterConfig {
            access_token: access_token.map(SecretString::from),
            account_id: account_id.map(String::from),
            action_set_id: action_set_id.map(String::from),
            endpoints: self.endpoints(),
        }
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            headers,
            body,
        });

    let reply = state
        .reply
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// Encode a value twice, the way the platform encodes `__CALLBACK__`.
#[must_use]
pub fn double_encode(value: &str) -> String {
    urlencoding::encode(&urlencoding::encode(value)).into_owned()
}
