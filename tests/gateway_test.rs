// tests/gateway_test.rs
// Dispatcher routing: simulator soft-degrade vs hard configuration errors

use scribe::llm::provider::ProviderKind;
use scribe::{CompletionRequest, Gateway, GatewayConfig, GatewayError};
use serde_json::json;

fn offline_gateway() -> Gateway {
    Gateway::new(GatewayConfig::offline("/tmp/scribe-gateway-test"))
}

// ============================================================================
// Soft-degrade: no credentials anywhere
// ============================================================================

#[tokio::test]
async fn no_credentials_routes_to_simulator() {
    let gateway = offline_gateway();
    let result = gateway
        .complete(&CompletionRequest::text("execute this"))
        .await
        .expect("simulator path never fails");

    assert!(result.as_text().unwrap().contains("executed successfully"));
}

#[tokio::test]
async fn simulator_result_is_deterministic() {
    let gateway = offline_gateway();
    let request = CompletionRequest::text("execute this");
    let first = gateway.complete(&request).await.unwrap();
    let second = gateway.complete(&request).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn simulator_honors_response_shape() {
    let gateway = offline_gateway();
    let request = CompletionRequest::text("complete this code").with_shape(json!({
        "type": "object",
        "properties": { "suggestions": { "type": "array" } }
    }));

    let result = gateway.complete(&request).await.unwrap();
    let value = result.as_structured().expect("structured result for shaped request");
    assert_eq!(value["suggestions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn generic_prompt_gets_configuration_hint() {
    let gateway = offline_gateway();
    let result = gateway
        .complete(&CompletionRequest::text("what is a closure?"))
        .await
        .unwrap();
    assert!(result.as_text().unwrap().contains("configure your AI provider"));
}

// ============================================================================
// Hard configuration error: selected provider has no credential
// ============================================================================

#[tokio::test]
async fn missing_selected_credential_is_a_hard_error() {
    let mut config = GatewayConfig::offline("/tmp/scribe-gateway-test");
    config.active = ProviderKind::Anthropic;
    // Another provider IS configured; the gateway must not fall back to it.
    config.openai.api_key = Some("sk-test".to_string());

    let gateway = Gateway::new(config);
    let err = gateway
        .complete(&CompletionRequest::text("hello"))
        .await
        .expect_err("misconfiguration must not be masked");

    match err {
        GatewayError::Configuration { provider } => assert_eq!(provider, "anthropic"),
        other => panic!("expected Configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn configuration_error_names_the_provider() {
    let mut config = GatewayConfig::offline("/tmp/scribe-gateway-test");
    config.active = ProviderKind::Google;
    config.anthropic.api_key = Some("sk-ant-test".to_string());

    let gateway = Gateway::new(config);
    let err = gateway
        .complete(&CompletionRequest::text("hello"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("google"));
}
