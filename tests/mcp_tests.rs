//! MCP request handling with an in-memory observation source

use serde_json::{Value, json};

use korea_weather::api::{BaseTime, ObservationSource};
use korea_weather::mcp::{INVALID_PARAMS, REGIONS_URI};
use korea_weather::models::{GridCell, UltraSrtNcstResponse};
use korea_weather::{WeatherConfig, WeatherError, WeatherServer};

/// Replays the recorded Daejeon nowcast for any cell
struct Recorded;

impl ObservationSource for Recorded {
    async fn fetch_observations(
        &self,
        _cell: GridCell,
        _base: &BaseTime,
    ) -> korea_weather::Result<UltraSrtNcstResponse> {
        Ok(quick_xml::de::from_str(include_str!("fixtures/ncst_normal.xml"))?)
    }
}

/// Always answers like a provider outage
struct Outage;

impl ObservationSource for Outage {
    async fn fetch_observations(
        &self,
        _cell: GridCell,
        _base: &BaseTime,
    ) -> korea_weather::Result<UltraSrtNcstResponse> {
        Err(WeatherError::UpstreamStatus { status: 503 })
    }
}

fn keyed() -> WeatherConfig {
    WeatherConfig {
        api_key: Some("test-key".to_string()),
        ..WeatherConfig::default()
    }
}

async fn request<S: ObservationSource>(server: &WeatherServer<S>, message: Value) -> Value {
    let response = server
        .handle_line(&message.to_string())
        .await
        .expect("request gets a response");
    serde_json::to_value(response).unwrap()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn text_of(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_current_weather_tool() {
    let server = WeatherServer::new(keyed(), Recorded);
    let response = request(
        &server,
        tool_call(1, "get_current_weather", json!({ "lat": 36.3268, "lon": 127.3954 })),
    )
    .await;

    let text = text_of(&response);
    assert!(text.starts_with("# 현재 날씨 정보 (위도: 36.3268, 경도: 127.3954)"));
    assert!(text.contains("- 격자 좌표: X=67, Y=100"));
    assert!(text.contains("- 기온: 26.2℃"));
    assert!(text.contains("- 풍향: 동남동"));
}

#[tokio::test]
async fn test_current_weather_accepts_long_argument_names() {
    let server = WeatherServer::new(keyed(), Recorded);
    let response = request(
        &server,
        tool_call(2, "get_current_weather", json!({ "latitude": 37.5665, "longitude": 126.978 })),
    )
    .await;
    assert!(text_of(&response).contains("X=60, Y=127"));
}

#[tokio::test]
async fn test_upstream_outage_is_tool_text() {
    let server = WeatherServer::new(keyed(), Outage);
    let response = request(
        &server,
        tool_call(3, "get_current_weather", json!({ "lat": 35.1796, "lon": 129.0756 })),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(
        text_of(&response),
        "날씨 정보를 가져오는 데 실패했습니다: API 서버 오류: 상태 코드 503"
    );
}

#[tokio::test]
async fn test_coordinates_tool() {
    let server = WeatherServer::new(WeatherConfig::default(), Outage);
    let response = request(
        &server,
        tool_call(4, "get_coordinates_by_city", json!({ "city": "부산광역시" })),
    )
    .await;
    assert!(text_of(&response).starts_with("부산의 좌표는 위도 35.1796, 경도 129.0756입니다."));
}

#[tokio::test]
async fn test_unknown_tool_and_missing_arguments() {
    let server = WeatherServer::new(keyed(), Recorded);

    let response = request(&server, tool_call(5, "get_forecast", json!({}))).await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);

    let response = request(&server, tool_call(6, "get_coordinates_by_city", json!({}))).await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
    assert_eq!(response["id"], 6);
}

#[tokio::test]
async fn test_regions_resource() {
    let server = WeatherServer::new(WeatherConfig::default(), Outage);
    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "resources/read",
            "params": { "uri": REGIONS_URI }
        }),
    )
    .await;

    let contents = &response["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "application/json");
    let table: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(table["제주"]["lat"], 33.4996);
    assert_eq!(table.as_object().unwrap().len(), 17);
}

#[tokio::test]
async fn test_weather_briefing_prompt() {
    let server = WeatherServer::new(WeatherConfig::default(), Outage);

    let listed = request(&server, json!({"jsonrpc": "2.0", "id": 8, "method": "prompts/list"})).await;
    assert_eq!(listed["result"]["prompts"][0]["name"], "weather_briefing");

    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "prompts/get",
            "params": { "name": "weather_briefing", "arguments": { "city": "대전" } }
        }),
    )
    .await;

    let message = &response["result"]["messages"][0];
    assert_eq!(message["role"], "user");
    let text = message["content"]["text"].as_str().unwrap();
    assert!(text.contains("대전"));
    assert!(text.contains("get_current_weather"));
}
