/// Ticket Server - E-ticket Ingestion Service
///
/// Exposes ticket extraction operations as MCP tools over HTTP API
/// - POST /tools/extract-ticket
/// - POST /tools/sanitize-passenger-name
/// - POST /tools/get-identification-code
/// - GET /tickets/:pnr - Imported tickets for a booking
/// - GET /tools - List all tools

use anyhow::Result;
use axum::{
    extract::{Json, Path},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod ticket_db;

use ticket_core::{
    extract_with_format, get_codigo_identificacion, get_solo_nombre_pasajero, prepare_ticket,
    sanitize_nombre_completo_pasajero, sanitize_record, ExtractorConfig, PreparedTicket, SourceSystem,
    TicketDocument, TicketRecord,
};
use ticket_db::{StoredTicket, TicketDatabase};

static CONFIG: Lazy<ExtractorConfig> = Lazy::new(|| {
    ExtractorConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("[CONFIG] {}; using built-in extractor config", e);
        ExtractorConfig::default()
    })
});

static TICKET_DB: Lazy<TicketDatabase> = Lazy::new(TicketDatabase::new);

/// Extraction Tool Request
#[derive(Debug, Deserialize)]
struct ExtractRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    html: Option<String>,
    /// Skip detection and use this layout (`KIU`, `COPA_SPRK`, `WINGO`)
    #[serde(default)]
    source_system: Option<String>,
    #[serde(default)]
    store: bool,
}

/// Extraction Tool Response
#[derive(Debug, Serialize)]
struct ExtractResponse {
    record: TicketRecord,
    document: TicketDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SanitizeRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct SanitizeResponse {
    sanitized: String,
    first_name: String,
}

#[derive(Debug, Deserialize)]
struct IdentificationRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct IdentificationResponse {
    code: Option<String>,
}

#[derive(Debug, Serialize)]
struct TicketsResponse {
    pnr: String,
    count: usize,
    tickets: Vec<StoredTicket>,
}

/// Tool Definition
#[derive(Debug, Serialize)]
struct ToolDefinition {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: serde_json::Value,
}

/// Tools List Response
#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: Vec<ToolDefinition>,
}

/// Standard Tool Response
#[derive(Debug, Serialize)]
struct ToolResponse<T: Serialize> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ToolResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn tool_error(error: String) -> ToolResponse<()> {
    ToolResponse {
        success: false,
        data: None,
        error: Some(error),
    }
}

type ToolFailure = (StatusCode, String);

type HttpResult<T> = std::result::Result<Json<ToolResponse<T>>, (StatusCode, Json<ToolResponse<()>>)>;

fn respond<T: Serialize>(result: std::result::Result<T, ToolFailure>) -> HttpResult<T> {
    result
        .map(|data| Json(ToolResponse::ok(data)))
        .map_err(|(status, message)| (status, Json(tool_error(message))))
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "extract-ticket".to_string(),
            description: "Extract e-ticket fields from an airline e-mail body and render the ticket document".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Plain-text e-mail body"
                    },
                    "html": {
                        "type": "string",
                        "description": "HTML e-mail body, used when text is empty"
                    },
                    "source_system": {
                        "type": "string",
                        "enum": ["KIU", "COPA_SPRK", "WINGO"],
                        "description": "Layout to use instead of detection (optional)"
                    },
                    "store": {
                        "type": "boolean",
                        "description": "Keep the ticket under its booking code (optional, default false)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "sanitize-passenger-name".to_string(),
            description: "Strip trailing city/country noise from a LASTNAME/FIRSTNAME passenger name".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Passenger name as printed on the ticket"
                    }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "get-identification-code".to_string(),
            description: "Find the passenger identification code after FOID: or D.IDENTIDAD:".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Ticket text"
                    }
                },
                "required": ["text"]
            }),
        },
    ]
}

fn run_extract(req: ExtractRequest) -> std::result::Result<ExtractResponse, ToolFailure> {
    let html = req.html.as_deref().filter(|h| !h.trim().is_empty());
    if req.text.trim().is_empty() && html.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Missing required field: 'text' or 'html' (e-mail body)".to_string(),
        ));
    }

    let prepared = match req.source_system.as_deref() {
        Some(tag) => {
            let source = SourceSystem::from_tag(tag).ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Unknown source_system '{}' (expected KIU, COPA_SPRK or WINGO)", tag),
                )
            })?;
            let mut record = extract_with_format(source, &req.text, html, &CONFIG);
            sanitize_record(&mut record, &CONFIG);
            TicketDocument::from_record(&record, &CONFIG).map(|document| PreparedTicket { record, document })
        }
        None => prepare_ticket(&req.text, html, &CONFIG),
    }
    .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let ticket_id = if req.store {
        match StoredTicket::from_record(prepared.record.clone()) {
            Some(ticket) => {
                let pnr = ticket.pnr.clone();
                let ticket_id = TICKET_DB
                    .store(ticket)
                    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e))?;
                let count = TICKET_DB.count(&pnr).unwrap_or_default();
                tracing::info!("[EXTRACT-TICKET] Stored ticket {} ({} under {})", ticket_id, count, pnr);
                Some(ticket_id)
            }
            None => {
                tracing::warn!("[EXTRACT-TICKET] No booking code found, ticket not stored");
                None
            }
        }
    } else {
        None
    };

    Ok(ExtractResponse {
        record: prepared.record,
        document: prepared.document,
        ticket_id,
    })
}

fn run_sanitize(name: &str) -> std::result::Result<SanitizeResponse, ToolFailure> {
    if name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Missing required field: 'name' (passenger name, e.g., PEREZ/JOSE)".to_string(),
        ));
    }
    let sanitized = sanitize_nombre_completo_pasajero(name, &CONFIG);
    let first_name = get_solo_nombre_pasajero(&sanitized);
    Ok(SanitizeResponse { sanitized, first_name })
}

fn run_identification(text: &str) -> IdentificationResponse {
    IdentificationResponse {
        code: get_codigo_identificacion(text, &CONFIG),
    }
}

/// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}

/// List all available tools
async fn list_tools() -> Json<ToolsResponse> {
    tracing::info!("[LIST TOOLS] Received request to list available tools");
    Json(ToolsResponse {
        tools: tool_definitions(),
    })
}

async fn extract_ticket(Json(req): Json<ExtractRequest>) -> HttpResult<ExtractResponse> {
    tracing::info!(
        "[EXTRACT-TICKET] Tool call received: text={} bytes, html={}, source_system={:?}, store={}",
        req.text.len(),
        req.html.is_some(),
        req.source_system,
        req.store
    );

    let result = run_extract(req);
    match &result {
        Ok(resp) => tracing::info!(
            "[EXTRACT-TICKET] Extracted {} ticket pnr={:?}",
            resp.record.source_system,
            resp.record.booking_code
        ),
        Err((_, e)) => tracing::warn!("[EXTRACT-TICKET] Failed: {}", e),
    }
    respond(result)
}

async fn sanitize_passenger_name(Json(req): Json<SanitizeRequest>) -> HttpResult<SanitizeResponse> {
    tracing::info!("[SANITIZE-NAME] Tool call received: name={}", req.name);
    respond(run_sanitize(&req.name))
}

async fn get_identification_code(Json(req): Json<IdentificationRequest>) -> HttpResult<IdentificationResponse> {
    tracing::info!("[GET-ID-CODE] Tool call received: text={} bytes", req.text.len());
    respond(Ok(run_identification(&req.text)))
}

/// Imported tickets for a booking code
async fn get_tickets(Path(pnr): Path<String>) -> HttpResult<TicketsResponse> {
    tracing::info!("[GET-TICKETS] pnr={}", pnr);
    respond(
        TICKET_DB
            .get_tickets(&pnr)
            .map(|tickets| TicketsResponse {
                count: tickets.len(),
                pnr,
                tickets,
            })
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e)),
    )
}

async fn clear_tickets(Path(pnr): Path<String>) -> HttpResult<serde_json::Value> {
    tracing::info!("[CLEAR-TICKETS] pnr={}", pnr);
    respond(
        TICKET_DB
            .clear(&pnr)
            .map(|removed| json!({"pnr": pnr, "removed": removed}))
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e)),
    )
}

async fn get_ticket_by_id(Path(ticket_id): Path<String>) -> HttpResult<StoredTicket> {
    tracing::info!("[GET-TICKET] ticket_id={}", ticket_id);
    respond(match TICKET_DB.get_ticket(&ticket_id) {
        Ok(Some(ticket)) => Ok(ticket),
        Ok(None) => Err((StatusCode::NOT_FOUND, format!("Ticket '{}' not found", ticket_id))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e)),
    })
}

#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// MCP Initialize Response
#[derive(Debug, Serialize)]
struct InitializeResult {
    protocol_version: String,
    capabilities: serde_json::Value,
    server_info: serde_json::Value,
}

/// MCP Tool Call Response
#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<serde_json::Value>,
    #[serde(rename = "isError")]
    is_error: bool,
}

type McpResult = std::result::Result<Json<McpResponse>, (StatusCode, Json<McpResponse>)>;

const INVALID_PARAMS: i32 = -32602;
const METHOD_NOT_FOUND: i32 = -32601;
const INTERNAL_ERROR: i32 = -32603;

fn mcp_error(id: Option<serde_json::Value>, status: StatusCode, code: i32, message: String) -> (StatusCode, Json<McpResponse>) {
    (
        status,
        Json(McpResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message,
                data: None,
            }),
        }),
    )
}

fn mcp_ok(id: Option<serde_json::Value>, result: impl Serialize) -> McpResult {
    let result = serde_json::to_value(result)
        .map_err(|e| mcp_error(id.clone(), StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, e.to_string()))?;
    Ok(Json(McpResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: Some(result),
        error: None,
    }))
}

/// Wrap tool output as MCP text content
fn mcp_tool_ok(id: Option<serde_json::Value>, data: impl Serialize) -> McpResult {
    let text = serde_json::to_string(&data)
        .map_err(|e| mcp_error(id.clone(), StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, e.to_string()))?;
    mcp_ok(
        id,
        ToolCallResult {
            content: vec![json!({"type": "text", "text": text})],
            is_error: false,
        },
    )
}

fn mcp_tool_failure(id: Option<serde_json::Value>, (status, message): ToolFailure) -> (StatusCode, Json<McpResponse>) {
    let code = if status.is_client_error() { INVALID_PARAMS } else { INTERNAL_ERROR };
    mcp_error(id, status, code, message)
}

/// Handle MCP protocol requests
async fn handle_mcp(Json(req): Json<McpRequest>) -> McpResult {
    tracing::info!("[MCP] Received request: method={}, id={:?}", req.method, req.id);

    match req.method.as_str() {
        "initialize" => mcp_ok(
            req.id,
            InitializeResult {
                protocol_version: "2024-11-05".to_string(),
                capabilities: json!({
                    "tools": {}
                }),
                server_info: json!({
                    "name": "ticket-server",
                    "version": env!("CARGO_PKG_VERSION")
                }),
            },
        ),

        "tools/list" => mcp_ok(req.id, ToolsResponse { tools: tool_definitions() }),

        "tools/call" => {
            let id = req.id;
            let params = req.params.ok_or_else(|| {
                mcp_error(id.clone(), StatusCode::BAD_REQUEST, INVALID_PARAMS, "Invalid params".to_string())
            })?;

            let tool_name = params.get("name").and_then(|n| n.as_str()).ok_or_else(|| {
                mcp_error(id.clone(), StatusCode::BAD_REQUEST, INVALID_PARAMS, "Tool name required".to_string())
            })?;

            let tool_args = params
                .get("arguments")
                .filter(|a| a.is_object())
                .cloned()
                .ok_or_else(|| {
                    mcp_error(
                        id.clone(),
                        StatusCode::BAD_REQUEST,
                        INVALID_PARAMS,
                        "Tool arguments required".to_string(),
                    )
                })?;

            tracing::info!("[MCP] tools/call name={}", tool_name);

            let invalid_args = |e: serde_json::Error| {
                mcp_error(
                    id.clone(),
                    StatusCode::BAD_REQUEST,
                    INVALID_PARAMS,
                    format!("Invalid arguments for '{}': {}", tool_name, e),
                )
            };

            match tool_name {
                "extract-ticket" => {
                    let args: ExtractRequest = serde_json::from_value(tool_args).map_err(invalid_args)?;
                    match run_extract(args) {
                        Ok(resp) => mcp_tool_ok(id, resp),
                        Err(failure) => Err(mcp_tool_failure(id, failure)),
                    }
                }

                "sanitize-passenger-name" => {
                    let args: SanitizeRequest = serde_json::from_value(tool_args).map_err(invalid_args)?;
                    match run_sanitize(&args.name) {
                        Ok(resp) => mcp_tool_ok(id, resp),
                        Err(failure) => Err(mcp_tool_failure(id, failure)),
                    }
                }

                "get-identification-code" => {
                    let args: IdentificationRequest = serde_json::from_value(tool_args).map_err(invalid_args)?;
                    mcp_tool_ok(id, run_identification(&args.text))
                }

                _ => Err(mcp_error(
                    id,
                    StatusCode::NOT_FOUND,
                    METHOD_NOT_FOUND,
                    format!("Tool '{}' not found", tool_name),
                )),
            }
        }

        _ => Err(mcp_error(
            req.id,
            StatusCode::METHOD_NOT_ALLOWED,
            METHOD_NOT_FOUND,
            format!("Method '{}' not found", req.method),
        )),
    }
}

fn build_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/extract-ticket", post(extract_ticket))
        .route("/tools/sanitize-passenger-name", post(sanitize_passenger_name))
        .route("/tools/get-identification-code", post(get_identification_code))
        .route("/tickets/:pnr", get(get_tickets).delete(clear_tickets))
        .route("/tickets/by-id/:ticket_id", get(get_ticket_by_id))
        .route("/mcp", post(handle_mcp))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        "[INIT] Extractor config: {} identification anchors, {} name noise words",
        CONFIG.identification_anchors.len(),
        CONFIG.name_noise_words.len()
    );

    let app = build_router();

    // Get port from environment variable or use default
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8004".to_string())
        .parse::<u16>()?;
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("✓ Ticket Server running on http://0.0.0.0:{}", port);
    println!("  GET  /tools                            — List all tools");
    println!("  POST /tools/extract-ticket             — Extract and render an e-ticket");
    println!("  POST /tools/sanitize-passenger-name    — Clean a passenger name");
    println!("  POST /tools/get-identification-code    — Find the FOID / D.IDENTIDAD code");
    println!("  GET  /tickets/:pnr                     — Imported tickets for a booking");
    println!("  POST /mcp                              — MCP protocol endpoint\n");

    axum::serve(listener, app).await?;

    Ok(())
}
