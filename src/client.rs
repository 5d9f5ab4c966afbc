// 🌐 Remote Calculator - same calculation, performed by the API server
//
// Blocking client with a hard timeout: a dead server turns into a Remote
// error instead of a hung caller.

use crate::amount::Cents;
use crate::calculation::{CalculationMode, CalculationRequest, CalculationResult, Calculator};
use crate::config::ClientConfig;
use crate::error::{DenominationError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

const INVALID_AMOUNT_PREFIX: &str = "Invalid amount: ";

pub struct RemoteCalculator {
    client: Client,
    config: ClientConfig,
}

impl RemoteCalculator {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DenominationError::remote(format!("failed to build HTTP client: {}", e)))?;

        Ok(RemoteCalculator {
            client,
            config: config.clone(),
        })
    }

    /// GET /health, returning the server's status message
    pub fn health(&self) -> Result<String> {
        let url = self.config.endpoint("health");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DenominationError::remote(format!("{} unreachable: {}", url, e)))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(DenominationError::remote(format!("{} returned {}: {}", url, status, body)));
        }
        health_message(&body)
    }
}

impl Calculator for RemoteCalculator {
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        let url = self.config.endpoint("calculate");
        debug!(url = %url, amount = request.amount, "sending remote calculation");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| DenominationError::remote(format!("{} unreachable: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let body = response.text().unwrap_or_default();
            return Err(DenominationError::invalid_amount(invalid_amount_reason(&body)));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(url = %url, %status, "remote calculation failed");
            return Err(DenominationError::remote(format!("{} returned {}: {}", url, status, body)));
        }

        let result: CalculationResult = response
            .json()
            .map_err(|e| DenominationError::remote(format!("invalid response body: {}", e)))?;

        verify(request, &result)?;
        Ok(result)
    }

    fn mode(&self) -> CalculationMode {
        CalculationMode::Remote
    }
}

/// Pull the message out of an `{"error": "..."}` body, or use the raw text.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Reason from a 400 body, without the "Invalid amount: " prefix the server adds
fn invalid_amount_reason(body: &str) -> String {
    let message = server_message(body);
    match message.strip_prefix(INVALID_AMOUNT_PREFIX) {
        Some(reason) => reason.to_string(),
        None => message,
    }
}

#[derive(Deserialize)]
struct HealthBody {
    success: bool,
    data: Option<String>,
    error: Option<String>,
}

fn health_message(body: &str) -> Result<String> {
    let health: HealthBody = serde_json::from_str(body)
        .map_err(|e| DenominationError::remote(format!("invalid health response: {}", e)))?;

    match (health.success, health.data) {
        (true, Some(message)) => Ok(message),
        (true, None) => Ok(String::new()),
        (false, _) => Err(DenominationError::remote(
            health.error.unwrap_or_else(|| "server reported unhealthy".to_string()),
        )),
    }
}

/// The remote path must agree with the local one. Check the parts that are
/// cheap to check: the breakdown sums to the amount, and changes are present
/// exactly when a previous amount was sent.
fn verify(request: &CalculationRequest, result: &CalculationResult) -> Result<()> {
    let expected = Cents::from_f64(request.amount)?;
    if result.breakdown.total() != expected {
        return Err(DenominationError::remote(format!(
            "breakdown sums to {} but {} was requested",
            result.breakdown.total(),
            expected
        )));
    }
    if request.previous_amount.is_some() != result.changes.is_some() {
        return Err(DenominationError::remote(
            "changes do not match the presence of a previous amount",
        ));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
