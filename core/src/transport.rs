//! Default `Transport` backed by a blocking `ureq` agent.
//!
//! The agent is configured so 4xx/5xx responses come back as data rather
//! than `Err`, leaving status interpretation to the client. Each request runs
//! on tokio's blocking pool; awaiting `send` outside a tokio runtime yields a
//! `TransportError` instead of sending anything.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an agent the caller configured (timeouts, proxies, TLS).
    ///
    /// The agent should have `http_status_as_error(false)`; otherwise error
    /// statuses surface as transport failures and lose the API's message.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError::new(format!("no tokio runtime available: {e}")))?;
        let agent = self.agent.clone();
        handle
            .spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|e| TransportError::new(format!("transport task failed: {e}")))?
    }
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = agent.post(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder
        .send(request.body.as_bytes())
        .map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::new(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
