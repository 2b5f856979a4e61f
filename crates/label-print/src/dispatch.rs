//! Delivery of rendered markup to the print service.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::PrintServiceConfig;
use crate::error::{DispatchError, PrintError, Result};

/// Sends one payload of rendered label markup to a printer.
///
/// Implementations report any failure as a [`DispatchError`]; the pipeline
/// treats every failure as fatal for the current run and never retries.
pub trait PrintDispatch {
    fn send(&self, markup: &str, destination: &str, copies: u32)
    -> std::result::Result<(), DispatchError>;
}

impl<T: PrintDispatch + ?Sized> PrintDispatch for &T {
    fn send(
        &self,
        markup: &str,
        destination: &str,
        copies: u32,
    ) -> std::result::Result<(), DispatchError> {
        (**self).send(markup, destination, copies)
    }
}

impl<T: PrintDispatch + ?Sized> PrintDispatch for Box<T> {
    fn send(
        &self,
        markup: &str,
        destination: &str,
        copies: u32,
    ) -> std::result::Result<(), DispatchError> {
        (**self).send(markup, destination, copies)
    }
}

/// JSON body accepted by the print service.
#[derive(Debug, Serialize)]
struct PrintPayload<'a> {
    zpl: &'a str,
    printer_ip: &'a str,
    qty: u32,
}

/// Print service reached over HTTP with basic authentication.
#[derive(Debug, Clone)]
pub struct HttpPrintService {
    client: Client,
    endpoint: String,
    api_user: String,
    api_password: String,
    timeout: Duration,
}

impl HttpPrintService {
    /// Validates `config` and builds the HTTP client.
    pub fn new(config: &PrintServiceConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();
        let client = Client::builder()
            .user_agent(concat!("labelctl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PrintError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint()?.to_string(),
            api_user: config.api_user()?.to_string(),
            api_password: config.api_password()?.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, error: &reqwest::Error) -> DispatchError {
        if error.is_timeout() {
            DispatchError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            DispatchError::Transport(error.to_string())
        }
    }
}

impl PrintDispatch for HttpPrintService {
    fn send(
        &self,
        markup: &str,
        destination: &str,
        copies: u32,
    ) -> std::result::Result<(), DispatchError> {
        let payload = PrintPayload {
            zpl: markup,
            printer_ip: destination,
            qty: copies,
        };
        tracing::debug!(
            endpoint = %self.endpoint,
            destination,
            copies,
            bytes = markup.len(),
            "sending print job"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_user, Some(&self.api_password))
            .json(&payload)
            .send()
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
