//! Router-level tests that need neither a database nor a model endpoint.

use askdb::state::create_state;
use askdb_configuration::{ApiKey, ConnectionUri, LlmSettings, PhaseTimeouts, ServerConfiguration};
use axum_test_helper::TestClient;

fn test_client() -> TestClient {
    let configuration = ServerConfiguration {
        connection_uri: ConnectionUri::from("postgresql://localhost:1/nowhere"),
        llm: LlmSettings {
            base_url: url::Url::parse("https://api.deepseek.com").unwrap(),
            api_key: ApiKey::from("sk-test"),
            model: "deepseek-chat".to_string(),
        },
        timeouts: PhaseTimeouts::default(),
        port: 0,
    };
    let state = create_state(configuration).unwrap();
    TestClient::new(askdb::router(state))
}

#[tokio::test]
async fn ask_rejects_a_body_without_a_question() {
    let client = test_client();
    let response = client
        .post("/ask")
        .header("content-type", "application/json")
        .body(r#"{"q": "nope"}"#)
        .send()
        .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let client = test_client();
    let response = client.get("/nope").send().await;
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
