//! MCP server over stdio
//!
//! Implements the subset of the Model Context Protocol this service needs:
//! newline-delimited JSON-RPC 2.0 with `initialize`, `ping`, the tool,
//! resource and prompt listings and their calls. Stdout carries protocol
//! messages only; all logging goes to stderr.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::api::{BaseTime, ObservationSource};
use crate::config::WeatherConfig;
use crate::regions;
use crate::tools;
use crate::WeatherError;

/// MCP protocol version
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name
pub const SERVER_NAME: &str = "korea-weather";

/// URI of the region table resource
pub const REGIONS_URI: &str = "weather://regions";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const RESOURCE_NOT_FOUND: i32 = -32002;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl McpError {
    /// JSON-RPC error code for this error
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::Weather(_) => INTERNAL_ERROR,
        }
    }
}

/// JSON-RPC request or notification
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
            }),
        }
    }
}

/// Tool definition for MCP
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Resource definition for MCP
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Prompt definition for MCP
#[derive(Debug, Serialize)]
pub struct Prompt {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherArgs {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CityArgs {
    city: String,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ResourceRead {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct PromptGet {
    name: String,
    #[serde(default)]
    arguments: Value,
}

fn parse_params<T: DeserializeOwned>(what: &str, params: Value) -> Result<T, McpError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params)
        .map_err(|e| McpError::InvalidParams(format!("Invalid {what}: {e}")))
}

/// Weather MCP server backed by an observation source
pub struct WeatherServer<S> {
    config: WeatherConfig,
    source: S,
}

impl<S: ObservationSource> WeatherServer<S> {
    pub fn new(config: WeatherConfig, source: S) -> Self {
        Self { config, source }
    }

    fn tools() -> Vec<Tool> {
        vec![
            Tool {
                name: "get_current_weather",
                description: "위도와 경도로 현재 날씨(초단기 실황)를 조회합니다.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "lat": { "type": "number", "description": "위도 (WGS84)" },
                        "lon": { "type": "number", "description": "경도 (WGS84)" }
                    },
                    "required": ["lat", "lon"]
                }),
            },
            Tool {
                name: "get_coordinates_by_city",
                description: "시/도 이름으로 대표 좌표와 기상청 격자 좌표를 조회합니다.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "city": { "type": "string", "description": "지역 이름 (예: 서울, 부산광역시)" }
                    },
                    "required": ["city"]
                }),
            },
        ]
    }

    fn resources() -> Vec<Resource> {
        vec![Resource {
            uri: REGIONS_URI,
            name: "regions",
            description: "지원하는 시/도와 대표 좌표 목록",
            mime_type: "application/json",
        }]
    }

    fn prompts() -> Vec<Prompt> {
        vec![Prompt {
            name: "weather_briefing",
            description: "지역의 현재 날씨를 요약하는 브리핑",
            arguments: vec![PromptArgument {
                name: "city",
                description: "지역 이름",
                required: true,
            }],
        }]
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": crate::VERSION
            },
            "instructions": "기상청 초단기 실황 날씨 서버입니다.\n\n- get_coordinates_by_city: 지역 이름으로 좌표 조회\n- get_current_weather: 위도/경도로 현재 날씨 조회"
        })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let call: ToolCall = parse_params("tool call", params)?;
        debug!("Calling tool: {} with args: {}", call.name, call.arguments);

        let text = match call.name.as_str() {
            "get_current_weather" => {
                let args: CurrentWeatherArgs = parse_params("get_current_weather arguments", call.arguments)?;
                tools::get_current_weather(
                    &self.config,
                    &self.source,
                    args.lat,
                    args.lon,
                    &BaseTime::now(),
                )
                .await
            }
            "get_coordinates_by_city" => {
                let args: CityArgs = parse_params("get_coordinates_by_city arguments", call.arguments)?;
                tools::get_coordinates_by_city(&args.city)
            }
            other => return Err(McpError::InvalidParams(format!("Unknown tool: {other}"))),
        };

        Ok(json!({
            "content": [{
                "type": "text",
                "text": text
            }]
        }))
    }

    fn handle_resources_read(&self, params: Value) -> Result<Value, McpError> {
        let read: ResourceRead = parse_params("resource read", params)?;
        if read.uri != REGIONS_URI {
            return Err(McpError::ResourceNotFound(read.uri));
        }

        Ok(json!({
            "contents": [{
                "uri": REGIONS_URI,
                "mimeType": "application/json",
                "text": regions::regions_json()?
            }]
        }))
    }

    fn handle_prompts_get(&self, params: Value) -> Result<Value, McpError> {
        let get: PromptGet = parse_params("prompt request", params)?;
        if get.name != "weather_briefing" {
            return Err(McpError::InvalidParams(format!("Unknown prompt: {}", get.name)));
        }
        let args: CityArgs = parse_params("weather_briefing arguments", get.arguments)?;

        let text = format!(
            "{city}의 현재 날씨를 알려주세요. 먼저 get_coordinates_by_city 도구로 '{city}'의 좌표를 찾고, \
             그 위도와 경도로 get_current_weather 도구를 호출한 뒤 기온, 강수, 바람을 중심으로 \
             짧게 요약해 주세요.",
            city = args.city.trim()
        );

        Ok(json!({
            "description": format!("{} 날씨 브리핑", args.city.trim()),
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": text }
            }]
        }))
    }

    /// Handle a single JSON-RPC message; notifications get no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Handling request: {}", request.method);

        let result = match request.method.as_str() {
            "initialized" => return None,
            method if method.starts_with("notifications/") => {
                debug!("Ignoring notification {}", method);
                return None;
            }
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": Self::tools() })),
            "tools/call" => self.handle_tools_call(request.params).await,
            "resources/list" => Ok(json!({ "resources": Self::resources() })),
            "resources/read" => self.handle_resources_read(request.params),
            "prompts/list" => Ok(json!({ "prompts": Self::prompts() })),
            "prompts/get" => self.handle_prompts_get(request.params),
            _ => {
                warn!("Unknown method: {}", request.method);
                return Some(JsonRpcResponse::error(
                    request.id,
                    METHOD_NOT_FOUND,
                    &format!("Method not found: {}", request.method),
                ));
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => {
                warn!("{} failed: {}", request.method, e);
                JsonRpcResponse::error(request.id, e.code(), &e.to_string())
            }
        })
    }

    /// Answer one line of input; `None` for blank lines and notifications
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        debug!("Received: {}", line);

        let message = match serde_json::from_str::<Value>(line) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        let id = message.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                error!("Invalid request: {}", e);
                Some(JsonRpcResponse::error(id, INVALID_REQUEST, "Invalid Request"))
            }
        }
    }

    /// Serve newline-delimited requests from `reader` until end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let response_json = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_json);
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        info!("MCP server ready, listening on stdio...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("stdin closed, shutting down");
        Ok(())
    }
}
