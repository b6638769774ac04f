use anyhow::Result;
use serde_json::json;

use chatpix::config::ReplicateConfig;
use chatpix::providers::ImageRequest;
use chatpix::replicate::{PredictionRequest, PredictionResponse, ReplicateError, ReplicateService};

/// Test that the request body matches the backend wire format
#[test]
fn test_prediction_request_wire_shape() -> Result<()> {
    let request = ImageRequest {
        prompt: "a lighthouse at dusk".to_string(),
        ratio: "16:9".to_string(),
    };
    let body = serde_json::to_value(PredictionRequest { input: &request })?;

    assert_eq!(
        body,
        json!({
            "input": {
                "prompt": "a lighthouse at dusk",
                "ratio": "16:9",
            }
        })
    );

    Ok(())
}

/// Test that a success response yields the output image URL
#[test]
fn test_prediction_response_parses_output() -> Result<()> {
    let body = json!({
        "id": "p1",
        "status": "succeeded",
        "output": "https://replicate.delivery/test/out.png",
    });

    let response: PredictionResponse = serde_json::from_value(body)?;
    assert_eq!(response.output, "https://replicate.delivery/test/out.png");

    Ok(())
}

/// Test that a response without output fails to parse
#[test]
fn test_prediction_response_requires_output() {
    let body = json!({ "id": "p1", "status": "failed" });
    assert!(serde_json::from_value::<PredictionResponse>(body).is_err());
}

/// Test that construction rejects an empty token
#[test]
fn test_service_requires_token() {
    let config = ReplicateConfig {
        token: String::new(),
    };
    assert!(ReplicateService::new(&config).is_err());
}

/// Test the opaque error display strings
#[test]
fn test_error_display() {
    assert_eq!(ReplicateError::BadRequest.to_string(), "bad request");
    assert_eq!(
        ReplicateError::TokenRequired.to_string(),
        "replicate token required"
    );
}
