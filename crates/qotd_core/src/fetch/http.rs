//! `reqwest` blocking transport.

use super::{HttpResponse, QuoteTransport, TransportError};
use log::debug;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("qotd/", env!("CARGO_PKG_VERSION"));

/// Production transport over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| TransportError::other(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        TransportError::network(err.to_string())
    } else {
        TransportError::other(err.to_string())
    }
}

impl QuoteTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!("event=http_get module=fetch status=start url={url}");
        let response = self.client.get(url).send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        debug!(
            "event=http_get module=fetch status=ok http_status={status} bytes={}",
            body.len()
        );
        Ok(HttpResponse { status, body })
    }
}
