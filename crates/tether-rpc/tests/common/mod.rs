//! Shared helpers for tether-rpc integration tests.

#![allow(dead_code)] // Not every test binary uses every helper

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use tether_rpc::{ApiClient, Endpoint, Transport, TransportError};

/// What the mock answers with for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
}

/// Transport that answers from a script and records every posted body.
///
/// When the script runs out, the last reply is repeated.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    last: Arc<Mutex<Option<Reply>>>,
    posted: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTransport {
    pub fn responding(body: &str) -> Self {
        let mock = Self::default();
        mock.push(Reply::Body(body.to_string()));
        mock
    }

    pub fn failing(reason: &str) -> Self {
        let mock = Self::default();
        mock.push(Reply::Fail(reason.to_string()));
        mock
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Bodies posted so far, in order.
    pub fn bodies(&self) -> Vec<String> {
        self.posted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Endpoints posted to so far, in order.
    pub fn endpoints(&self) -> Vec<String> {
        self.posted
            .lock()
            .unwrap()
            .iter()
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    /// The single posted body parsed as JSON.
    pub fn last_request(&self) -> serde_json::Value {
        let bodies = self.bodies();
        let body = bodies.last().expect("no request was posted");
        serde_json::from_str(body).expect("posted body is not JSON")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, endpoint: &Endpoint, body: String) -> Result<String, TransportError> {
        self.posted
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body));

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = replies.pop_front() {
                *last = Some(next);
            }
            last.clone().expect("MockTransport has no scripted reply")
        };

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Fail(reason) => Err(TransportError::Other(reason)),
        }
    }
}

pub const ENDPOINT: &str = "http://192.168.122.1:8080/sony/camera";

pub fn client_with(mock: &MockTransport) -> ApiClient {
    ApiClient::new(Endpoint::parse(ENDPOINT).unwrap(), mock.clone())
}

/// Initialize tracing once so `RUST_LOG=tether=debug` shows dispatch logs in tests.
pub fn init_test_logging() {
    static INIT_LOGGING: OnceLock<()> = OnceLock::new();

    INIT_LOGGING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
