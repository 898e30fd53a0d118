//! unitcalc MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio. Logs go to stderr; stdout carries
//! only protocol messages.
//!
//! Tools:
//! - convert: Convert a value between units of Area, Weight or Length
//! - convert_temperature: Convert between Celsius, Fahrenheit and Kelvin
//! - evaluate: Evaluate a keypad calculator expression
//! - list_units: List units per category
//! - list_functions: List calculator prefix functions
//! - calculator: Press keypad buttons on the server's calculator session

use std::env;
use std::io::{self, BufRead, Write};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use unitcalc::{AppContext, Category, EngineConfig, Key, UnitCalc};
use unitcalc_core::{format_natural, parse_number, CalcError, CalcResult};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "unitcalc";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: -32602, message: message.into(), data: None }
    }
}

/// Engine plus the per-connection window context
struct Server {
    engine: UnitCalc,
    context: AppContext,
}

impl Server {
    fn new(config: EngineConfig) -> Self {
        let engine = UnitCalc::new(config);
        let context = engine.new_context();
        Self { engine, context }
    }
}

fn main() {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let config = EngineConfig::from_env();
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        decimals = config.decimals,
        kelvin_fahrenheit = ?config.kelvin_fahrenheit,
        "unitcalc MCP server started"
    );

    let mut server = Server::new(config);

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response_json) = process_line(&mut server, &line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response_json) {
                    error!(error = %e, "failed to write response");
                    break;
                }
                if let Err(e) = stdout.flush() {
                    error!(error = %e, "failed to flush stdout");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("server shutting down");
}

/// Handle one input line, returning the serialized response if one is due
fn process_line(server: &mut Server, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    debug!(bytes = line.len(), "received request");

    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "malformed request");
            let response = McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError {
                    code: -32700,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            };
            return encode(&response);
        }
    };

    if request.jsonrpc != "2.0" {
        warn!(jsonrpc = %request.jsonrpc, "unexpected jsonrpc version");
    }
    info!(method = %request.method, "processing request");

    let response = handle_request(server, &request);

    // Notifications (no id) never receive a response
    if request.id.is_none() {
        debug!(method = %request.method, "notification processed");
        return None;
    }

    encode(&response)
}

fn encode(response: &McpResponse) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            None
        }
    }
}

fn handle_request(server: &mut Server, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(server, &request.params),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Echo the client's protocol version
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion and keypad calculator"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        }
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value between two units of the same category (area, weight, length).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "area, weight or length"
                        },
                        "value": {
                            "type": ["number", "string"],
                            "description": "Value to convert"
                        },
                        "from": {
                            "type": "string",
                            "description": "Source unit, e.g. Square Foot"
                        },
                        "to": {
                            "type": "string",
                            "description": "Target unit, e.g. Acre"
                        }
                    },
                    "required": ["category", "value", "from", "to"]
                }
            },
            {
                "name": "convert_temperature",
                "description": "Convert a temperature between Celsius, Fahrenheit and Kelvin.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["number", "string"],
                            "description": "Temperature to convert"
                        },
                        "from": {
                            "type": "string",
                            "description": "Celsius, Fahrenheit or Kelvin"
                        },
                        "to": {
                            "type": "string",
                            "description": "Celsius, Fahrenheit or Kelvin"
                        }
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "evaluate",
                "description": "Evaluate a calculator expression: arithmetic with + - * / and parentheses, base^exponent, or sin/cos/tan (degrees), log, exp, √ applied to a number.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "expression": {
                            "type": "string",
                            "description": "Expression such as 2+3*4, 2^10 or sin90"
                        }
                    },
                    "required": ["expression"]
                }
            },
            {
                "name": "list_units",
                "description": "List the units of one category, or of every category when none is given.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "area, weight, length or temperature"
                        }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List the calculator's prefix functions (sin, cos, tan, log, exp, √) with descriptions.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "calculator",
                "description": "Press keypad buttons on the calculator and return its display. The session persists between calls.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "keys": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Button labels in order: 0-9 . + - * / ^ √ sin cos tan log exp = C"
                        }
                    },
                    "required": ["keys"]
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &mut Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(server, &args),
        "convert_temperature" => tool_convert_temperature(server, &args),
        "evaluate" => tool_evaluate(server, &args),
        "list_units" => tool_list_units(&args),
        "list_functions" => tool_list_functions(server),
        "calculator" => tool_calculator(server, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_convert(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "category")?;
    let from = str_arg(args, "from")?;
    let to = str_arg(args, "to")?;
    let value = number_arg(args, "value")?;

    let outcome = value.and_then(|v| {
        let category: Category = category.parse()?;
        server.engine.convert_linear_unit(category, v, from, to).map(|r| (v, r))
    });

    Ok(match outcome {
        Ok((v, result)) => tool_success(
            format!("{} {} = {} {}", format_natural(v), from, server.engine.format_fixed(result), to),
            json!(result),
        ),
        Err(e) => tool_failure(&e),
    })
}

fn tool_convert_temperature(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let from = str_arg(args, "from")?;
    let to = str_arg(args, "to")?;
    let value = number_arg(args, "value")?;

    let outcome = value.and_then(|v| server.engine.convert_temperature(v, from, to).map(|r| (v, r)));

    Ok(match outcome {
        Ok((v, result)) => tool_success(
            format!("{} {} = {} {}", format_natural(v), from, server.engine.format_fixed(result), to),
            json!(result),
        ),
        Err(e) => tool_failure(&e),
    })
}

fn tool_evaluate(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let expression = str_arg(args, "expression")?;

    Ok(match server.engine.evaluate_expression(expression) {
        Ok(result) => tool_success(format_natural(result), json!(result)),
        Err(e) => tool_failure(&e),
    })
}

fn tool_list_units(args: &JsonValue) -> Result<JsonValue, McpError> {
    let filter = args.get("category").and_then(|v| v.as_str()).map(str::trim);

    let categories: Vec<Category> = match filter {
        None => Category::ALL.to_vec(),
        Some(name) if name.eq_ignore_ascii_case("temperature") => Vec::new(),
        Some(name) => match name.parse::<Category>() {
            Ok(category) => vec![category],
            Err(e) => return Ok(tool_failure(&e)),
        },
    };
    let with_temperature = filter.map_or(true, |name| name.eq_ignore_ascii_case("temperature"));

    let mut listing = Vec::new();
    let mut lines = Vec::new();

    for category in categories {
        let units = unitcalc_units::UNITS.by_category(category);
        lines.push(format!(
            "{}: {}",
            category,
            units.iter().map(|u| u.name).collect::<Vec<_>>().join(", ")
        ));
        listing.push(json!({
            "category": category.name(),
            "base": category.base_unit(),
            "units": units.iter().map(|u| json!({"name": u.name, "symbol": u.symbol})).collect::<Vec<_>>()
        }));
    }

    if with_temperature {
        let units = unitcalc_units::TemperatureUnit::ALL;
        lines.push(format!(
            "Temperature: {}",
            units.iter().map(|u| u.name()).collect::<Vec<_>>().join(", ")
        ));
        listing.push(json!({
            "category": "Temperature",
            "units": units.iter().map(|u| json!({"name": u.name(), "symbol": u.symbol()})).collect::<Vec<_>>()
        }));
    }

    Ok(tool_success(lines.join("\n"), JsonValue::Array(listing)))
}

fn tool_list_functions(server: &Server) -> Result<JsonValue, McpError> {
    let functions = server.engine.functions();
    let value = serde_json::to_value(functions).map_err(|e| McpError {
        code: -32603,
        message: format!("Internal error: {}", e),
        data: None,
    })?;

    let text = functions.iter()
        .map(|f| format!("{}<number>: {}", f.prefix, f.description))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(tool_success(text, value))
}

fn tool_calculator(server: &mut Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let labels = args.get("keys")
        .and_then(|v| v.as_array())
        .ok_or_else(|| McpError::invalid_params("Missing keys argument"))?;

    let mut keys = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.as_str()
            .ok_or_else(|| McpError::invalid_params("keys must be strings"))?;
        match Key::from_label(label) {
            Some(key) => keys.push(key),
            None => {
                let err = CalcError::invalid_input(format!("unknown key '{}'", label))
                    .with_suggestion("Use keypad labels such as 7, +, sin, = or C");
                return Ok(tool_failure(&err));
            }
        }
    }

    let session = server.context.calculator_mut();
    for key in keys {
        session.press(key);
    }

    Ok(tool_success(
        session.display().to_string(),
        json!({
            "display": session.display(),
            "session": session.state(),
        }),
    ))
}

fn str_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// A numeric argument given as a JSON number or as raw entry text. Text that
/// does not parse is an engine error, not a protocol error.
fn number_arg(args: &JsonValue, name: &str) -> Result<CalcResult<f64>, McpError> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64()
            .map(Ok)
            .ok_or_else(|| McpError::invalid_params(format!("{} is out of range", name))),
        Some(JsonValue::String(s)) => Ok(parse_number(s).map_err(CalcError::from)),
        _ => Err(McpError::invalid_params(format!("Missing {} argument", name))),
    }
}

fn tool_success(text: String, value: JsonValue) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "value": value,
        "isError": false
    })
}

fn tool_failure(err: &CalcError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": {
            "code": err.code(),
            "message": err.message,
            "suggestion": err.suggestion
        },
        "isError": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new(EngineConfig::default())
    }

    fn call(server: &mut Server, line: &str) -> JsonValue {
        let response = process_line(server, line).expect("response");
        serde_json::from_str(&response).unwrap()
    }

    fn call_tool(server: &mut Server, name: &str, arguments: JsonValue) -> JsonValue {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        call(server, &request.to_string())["result"].clone()
    }

    #[test]
    fn test_initialize() {
        let mut s = server();
        let response = call(&mut s, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#);
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "unitcalc");
    }

    #[test]
    fn test_notification_gets_no_response() {
        let mut s = server();
        assert!(process_line(&mut s, r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
        assert!(process_line(&mut s, "   ").is_none());
    }

    #[test]
    fn test_protocol_errors() {
        let mut s = server();
        let response = call(&mut s, r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#);
        assert_eq!(response["error"]["code"], -32601);

        let response = call(&mut s, "{not json");
        assert_eq!(response["error"]["code"], -32700);

        let response = call(&mut s, r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"convert","arguments":{}}}"#);
        assert_eq!(response["error"]["code"], -32602);

        let response = call(&mut s, r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"teleport"}}"#);
        assert_eq!(response["error"]["code"], -32602);
    }

    #[test]
    fn test_tools_list() {
        let mut s = server();
        let response = call(&mut s, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["convert", "convert_temperature", "evaluate", "list_units", "list_functions", "calculator"]);
    }

    #[test]
    fn test_convert_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "convert", json!({
            "category": "weight", "value": 1000, "from": "Gram", "to": "Kilogram"
        }));
        assert_eq!(result["isError"], false);
        assert!((result["value"].as_f64().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(result["content"][0]["text"], "1000 Gram = 1.0000 Kilogram");
    }

    #[test]
    fn test_convert_tool_engine_errors() {
        let mut s = server();
        let result = call_tool(&mut s, "convert", json!({
            "category": "length", "value": "abc", "from": "Meter", "to": "Foot"
        }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_INPUT");

        let result = call_tool(&mut s, "convert", json!({
            "category": "length", "value": 1, "from": "Meter", "to": "Gram"
        }));
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");
    }

    #[test]
    fn test_convert_temperature_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "convert_temperature", json!({
            "value": "100", "from": "Celsius", "to": "Fahrenheit"
        }));
        assert_eq!(result["value"], 212.0);

        let result = call_tool(&mut s, "convert_temperature", json!({
            "value": 1, "from": "Celsius", "to": "Rankine"
        }));
        assert_eq!(result["error"]["code"], "UNSUPPORTED_UNIT_PAIR");
    }

    #[test]
    fn test_evaluate_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "evaluate", json!({"expression": "2+3*4"}));
        assert_eq!(result["content"][0]["text"], "14");

        let result = call_tool(&mut s, "evaluate", json!({"expression": "5/0"}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "DIV_ZERO");
    }

    #[test]
    fn test_list_functions_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "list_functions", json!({}));
        assert_eq!(result["isError"], false);
        let functions = result["value"].as_array().unwrap();
        assert_eq!(functions.len(), 6);
        assert_eq!(functions[0]["prefix"], "sin");
        assert_eq!(functions[0]["description"], "Sine of an angle in degrees");
        assert!(functions[0].get("apply").is_none());
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("sin<number>: Sine of an angle in degrees"));
    }

    #[test]
    fn test_evaluate_tool_rejects_long_chain() {
        let mut s = server();
        let chain = vec!["1"; 100_000].join("+");
        let result = call_tool(&mut s, "evaluate", json!({"expression": chain}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_INPUT");
    }

    #[test]
    fn test_list_units_tool() {
        let mut s = server();
        let result = call_tool(&mut s, "list_units", json!({"category": "weight"}));
        assert_eq!(result["value"].as_array().unwrap().len(), 1);
        assert_eq!(result["content"][0]["text"], "Weight: Kilogram, Gram, Pound, Ounce, Tonne");

        let result = call_tool(&mut s, "list_units", json!({}));
        assert_eq!(result["value"].as_array().unwrap().len(), 4);

        let result = call_tool(&mut s, "list_units", json!({"category": "volume"}));
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_calculator_session_persists() {
        let mut s = server();
        let result = call_tool(&mut s, "calculator", json!({"keys": ["7", "+", "8"]}));
        assert_eq!(result["content"][0]["text"], "7+8");

        let result = call_tool(&mut s, "calculator", json!({"keys": ["="]}));
        assert_eq!(result["content"][0]["text"], "15");
        assert_eq!(result["value"]["session"]["state"], "displayed");

        let result = call_tool(&mut s, "calculator", json!({"keys": ["C", "5", "/", "0", "="]}));
        assert_eq!(result["content"][0]["text"], "Error");
    }

    #[test]
    fn test_calculator_rejects_unknown_key() {
        let mut s = server();
        call_tool(&mut s, "calculator", json!({"keys": ["4"]}));
        let result = call_tool(&mut s, "calculator", json!({"keys": ["2", "%"]}));
        assert_eq!(result["isError"], true);
        assert_eq!(s.context.calculator().display(), "4");
    }
}
