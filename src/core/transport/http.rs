//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over POST on the configured path (`/mcp` by default), plus
//! `GET /health` and an informational `GET /`. Every request is handled on
//! its own task by axum; the server state behind it is read-only.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;

/// Protocol version reported on `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self::internal_error(id, e.to_string()),
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Error response carrying the code, message and data of an MCP error.
    pub fn from_mcp_error(id: Option<serde_json::Value>, error: impl Into<McpError>) -> Self {
        let error = error.into();
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: error.code.0,
                message: error.message.into_owned(),
                data: error.data,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    rpc_path: Arc<str>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    ///
    /// Returns `TransportError::BindError` right away if the address is
    /// unavailable; otherwise serves until the process is stopped.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the axum router for the given server.
pub fn router(server: McpServer, config: &HttpConfig) -> Router {
    let state = AppState {
        server,
        rpc_path: Arc::from(config.rpc_path.as_str()),
    };

    let app = Router::new()
        .route(&config.rpc_path, post(handle_rpc))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": &*state.rpc_path,
            "health": "/health"
        },
        "tools": state.server.tools().tool_names(),
        "protocol": "JSON-RPC 2.0",
        "documentation": format!("Send POST requests to {} with JSON-RPC messages", state.rpc_path)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
///
/// Notifications get `202 Accepted` with an empty body; everything else
/// gets a JSON-RPC response object.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", &request.method);

    if request.method.starts_with("notifications/") {
        debug!("Received notification: {}", request.method);
        return StatusCode::ACCEPTED.into_response();
    }

    debug!("Received JSON-RPC request: {}", request.method);
    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response)).into_response()
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    let server = &state.server;
    let JsonRpcRequest {
        id, method, params, ..
    } = request;

    match method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": server.name(),
                    "version": server.version()
                },
                "instructions": INSTRUCTIONS
            }),
        ),

        "tools/list" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "tools": server.list_tools() }),
        ),

        "tools/call" => handle_tools_call(server, id, params).await,

        "resources/list" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "resources": server.list_resources().await }),
        ),

        "resources/templates/list" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "resourceTemplates": server.list_resource_templates().await }),
        ),

        "resources/read" => {
            let uri = match required_str(&params, "uri") {
                Ok(uri) => uri,
                Err(msg) => return JsonRpcResponse::invalid_params(id, msg),
            };
            match server.read_resource(uri).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::from_mcp_error(id, e),
            }
        }

        "prompts/list" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "prompts": server.list_prompts().await }),
        ),

        "prompts/get" => {
            let name = match required_str(&params, "name") {
                Ok(name) => name,
                Err(msg) => return JsonRpcResponse::invalid_params(id, msg),
            };
            let arguments = params
                .as_ref()
                .and_then(|p| p.get("arguments"))
                .and_then(|a| a.as_object())
                .cloned();
            match server.get_prompt(name, arguments).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::from_mcp_error(id, e),
            }
        }

        _ => {
            warn!("Unknown method: {}", method);
            JsonRpcResponse::method_not_found(id)
        }
    }
}

/// Handle tools/call request.
///
/// Unknown tools and bad arguments come back as JSON-RPC errors with
/// `data.kind`; tool execution failures come back as `isError` results.
async fn handle_tools_call(
    server: &McpServer,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> JsonRpcResponse {
    let name = match required_str(&params, "name") {
        Ok(name) => name,
        Err(msg) => return JsonRpcResponse::invalid_params(id, msg),
    };
    info!("Calling tool: {}", name);

    let arguments = match params.as_ref().and_then(|p| p.get("arguments")) {
        None | Some(serde_json::Value::Null) => JsonObject::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::invalid_params(id, "Tool arguments must be a JSON object");
        }
    };

    match server.call_tool(name, arguments).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => {
            warn!("Tool call rejected: {}", e);
            JsonRpcResponse::from_mcp_error(id, e)
        }
    }
}

/// Extract a required string field from the request params.
fn required_str<'a>(params: &'a Option<serde_json::Value>, field: &str) -> Result<&'a str, String> {
    let params = params.as_ref().ok_or("Missing params")?;
    params
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing '{}' in params", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::market::{NewsCatalog, StrategyCatalog};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let server = McpServer::new(
            Config::default(),
            Arc::new(NewsCatalog::builtin().unwrap()),
            Arc::new(StrategyCatalog::builtin().unwrap()),
        )
        .unwrap();
        router(server, &HttpConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn rpc(method: &str, params: serde_json::Value) -> serde_json::Value {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        json
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = rpc("initialize", serde_json::json!({})).await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], "fx-news-mcp");
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = rpc("tools/list", serde_json::json!({})).await;
        let names: Vec<_> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["estrategias_disponibles", "noticias_financieras"]);
        assert!(response["result"]["tools"][1]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_call_news_without_arguments() {
        let response = rpc(
            "tools/call",
            serde_json::json!({ "name": "noticias_financieras" }),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], false);
        let keys: Vec<_> = result["structuredContent"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_error_kind() {
        let response = rpc("tools/call", serde_json::json!({ "name": "no_existe" })).await;
        assert!(response.get("result").is_none());
        assert_eq!(response["error"]["code"], -32602);
        assert_eq!(response["error"]["data"]["kind"], "unknown_tool");
    }

    #[tokio::test]
    async fn test_invalid_arguments_return_error_kind() {
        let response = rpc(
            "tools/call",
            serde_json::json!({ "name": "noticias_financieras", "arguments": { "limit": 0 } }),
        )
        .await;
        assert_eq!(response["error"]["data"]["kind"], "invalid_arguments");
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let response = rpc(
            "tools/call",
            serde_json::json!({ "name": "noticias_financieras", "arguments": [1, 2] }),
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_read_unknown_strategy() {
        let response = rpc(
            "resources/read",
            serde_json::json!({ "uri": "estrategia://item/straddle" }),
        )
        .await;
        let text = response["result"]["contents"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("No encontrada: straddle."));
    }

    #[tokio::test]
    async fn test_templates_list() {
        let response = rpc("resources/templates/list", serde_json::json!({})).await;
        assert_eq!(
            response["result"]["resourceTemplates"][0]["uriTemplate"],
            "estrategia://item/{id}"
        );
    }

    #[tokio::test]
    async fn test_prompts_get() {
        let response = rpc(
            "prompts/get",
            serde_json::json!({
                "name": "plan_fx_acciones",
                "arguments": { "par": "EUR/USD", "horizonte": "1 mes", "cobertura": "si" }
            }),
        )
        .await;
        let text = response["result"]["messages"][0]["content"]["text"]
            .as_str()
            .unwrap();
        assert!(text.contains("Par: EUR/USD."));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = rpc("sampling/createMessage", serde_json::json!({})).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let body = serde_json::json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let body = serde_json::json!({ "jsonrpc": "1.0", "id": 7, "method": "tools/list" });
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (_, response) = send(app(), request).await;
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, response) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["status"], "healthy");
    }

    #[tokio::test]
    async fn test_root_shows_rpc_path() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (_, response) = send(app(), request).await;
        assert_eq!(response["endpoints"]["rpc"], "/mcp");
    }
}
