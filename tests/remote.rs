#![cfg(all(feature = "server", feature = "remote"))]

// Drives the blocking reqwest client against a live axum server on an
// ephemeral port.

use euro_denomination::api::router;
use euro_denomination::calculation::{calculate, CalculationRequest, Calculator};
use euro_denomination::client::RemoteCalculator;
use euro_denomination::config::{ClientConfig, ServerConfig};
use euro_denomination::DenominationError;
use std::time::Duration;

fn spawn_server() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router(&ServerConfig::default()))
                .await
                .unwrap();
        });
    });

    ClientConfig {
        api_url: format!("http://{}/api", addr),
        timeout: Duration::from_secs(5),
    }
}

#[test]
fn remote_calculation_matches_local() {
    let remote = RemoteCalculator::new(&spawn_server()).unwrap();

    for (amount, previous) in [(234.23, Some(45.32)), (100.0, None), (100.0, Some(0.0))] {
        let request = CalculationRequest {
            amount,
            previous_amount: previous,
        };
        let expected = calculate(&request).unwrap();
        let actual = remote.calculate(&request).unwrap();
        assert_eq!(actual, expected, "paths disagree for {:?}", request);
    }
}

#[test]
fn remote_rejects_negative_amount_as_invalid() {
    let remote = RemoteCalculator::new(&spawn_server()).unwrap();

    let err = remote
        .calculate(&CalculationRequest {
            amount: -1.0,
            previous_amount: None,
        })
        .unwrap_err();

    assert!(matches!(err, DenominationError::InvalidAmount(_)));
    assert_eq!(err.to_string(), "Invalid amount: amount must not be negative, got -1");
}

#[test]
fn remote_health_reports_running() {
    let remote = RemoteCalculator::new(&spawn_server()).unwrap();
    assert_eq!(remote.health().unwrap(), "Backend is running");
}
