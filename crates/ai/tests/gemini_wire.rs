//! Drives `GeminiClient` against a local stub of the `generateContent` endpoint.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use nexus_ai::{
    AiConfig, INSIGHTS_EMPTY_MESSAGE, INSIGHTS_FAILED_MESSAGE, InventoryAssistant,
    InventoryItemSnapshot,
};

#[derive(Clone, Default)]
struct Captured {
    path: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Value,
    captured: Arc<Mutex<Captured>>,
}

struct StubServer {
    base_url: String,
    captured: Arc<Mutex<Captured>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    async fn spawn(status: StatusCode, reply: Value) -> Self {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let state = StubState {
            status,
            reply,
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models/:call", post(generate))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            captured,
            handle,
        }
    }

    fn assistant(&self) -> InventoryAssistant {
        let config = AiConfig::default()
            .with_api_key("test-key")
            .with_base_url(self.base_url.clone());
        InventoryAssistant::from_config(&config).with_categories(["Electronics", "Networking"])
    }

    fn captured(&self) -> Captured {
        self.captured.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn generate(
    State(state): State<StubState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    {
        let mut c = state.captured.lock().unwrap();
        c.path = Some(call);
        c.api_key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        c.body = Some(body);
    }
    (state.status, Json(state.reply))
}

fn candidate(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
}

fn snapshot() -> InventoryItemSnapshot {
    InventoryItemSnapshot {
        name: "Standing Desk Motorized".to_string(),
        quantity: 2,
        unit_price: 599.0,
        category: "Furniture".to_string(),
    }
}

#[tokio::test]
async fn suggestion_round_trip_over_http() {
    let answer = r#"{"category":"Networking","estimatedPrice":79.5,"description":"8-port managed switch","suggestedThreshold":4}"#;
    let server = StubServer::spawn(StatusCode::OK, candidate(answer)).await;

    let suggestion = server
        .assistant()
        .suggest_item_details("Gigabit Switch")
        .await
        .expect("suggestion");

    assert_eq!(suggestion.category, "Networking");
    assert_eq!(suggestion.estimated_price, 79.5);
    assert_eq!(suggestion.suggested_threshold, 4.0);

    let captured = server.captured();
    assert_eq!(captured.path.as_deref(), Some("gemini-2.5-flash:generateContent"));
    assert_eq!(captured.api_key.as_deref(), Some("test-key"));

    let body = captured.body.unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Gigabit Switch"));
    let category_hint = body["generationConfig"]["responseSchema"]["properties"]["category"]
        ["description"]
        .as_str()
        .unwrap();
    assert!(category_hint.contains("Electronics, Networking"));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        json!(["category", "estimatedPrice", "description", "suggestedThreshold"])
    );
}

#[tokio::test]
async fn insights_text_comes_back_verbatim() {
    let text = "- Desk stock is low\n- Furniture dominates value\n- Reorder desks this week";
    let server = StubServer::spawn(StatusCode::OK, candidate(text)).await;

    let insights = server.assistant().generate_inventory_insights(&[snapshot()]).await;
    assert_eq!(insights, text);

    let body = server.captured().body.unwrap();
    assert!(body.get("generationConfig").is_none());
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(r#""qty":2"#));
}

#[tokio::test]
async fn empty_candidates_map_to_empty_message() {
    let server = StubServer::spawn(StatusCode::OK, json!({ "candidates": [] })).await;
    let insights = server.assistant().generate_inventory_insights(&[snapshot()]).await;
    assert_eq!(insights, INSIGHTS_EMPTY_MESSAGE);
}

#[tokio::test]
async fn server_error_maps_to_failure_message_and_no_suggestion() {
    let server = StubServer::spawn(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "message": "boom" } }),
    )
    .await;
    let assistant = server.assistant();

    assert_eq!(
        assistant.generate_inventory_insights(&[snapshot()]).await,
        INSIGHTS_FAILED_MESSAGE
    );
    assert!(assistant.suggest_item_details("Gigabit Switch").await.is_none());
}

#[tokio::test]
async fn unreachable_service_degrades() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = AiConfig::default()
        .with_api_key("k")
        .with_base_url(format!("http://{addr}"));
    let assistant = InventoryAssistant::from_config(&config);

    assert_eq!(
        assistant.generate_inventory_insights(&[]).await,
        INSIGHTS_FAILED_MESSAGE
    );
}
