//! End-to-end protocol tests: raw request lines in, response lines out
use polymarket_mcp::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn server() -> PolymarketServer {
    let storage = SqliteStorage::in_memory().expect("Failed to create storage");
    PolymarketServer::with_storage(storage, FramingPolicy::PerChunk).expect("Failed to create server")
}

async fn round_trip(server: &PolymarketServer, input: &str) -> Vec<Value> {
    let output = server
        .serve(input.as_bytes(), Vec::new())
        .await
        .expect("transport failed");
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

async fn call(server: &PolymarketServer, request: Value) -> Value {
    let text = request.to_string();
    let response = server.dispatcher().handle(&text).await.expect("expected a response");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn initialize_scenario() {
    let server = server();
    let response = call(&server, json!({"jsonrpc":"2.0","id":1,"method":"initialize","params":{}})).await;

    assert_eq!(
        response,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "polymarket-mcp-server", "version": "1.0.0"}
            }
        })
    );
}

#[tokio::test]
async fn unknown_tool_scenario() {
    let server = server();
    let response = call(
        &server,
        json!({"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nonexistent","arguments":{}}}),
    )
    .await;

    assert_eq!(
        response,
        json!({"jsonrpc":"2.0","id":2,"error":{"code":-32603,"message":"Unknown tool: nonexistent"}})
    );
}

#[tokio::test]
async fn tools_list_is_stable_and_non_empty() {
    let server = server();
    let request = r#"{"jsonrpc":"2.0","id":3,"method":"tools/list","params":{}}"#;

    let first = server.dispatcher().handle(request).await.unwrap();
    let second = server.dispatcher().handle(request).await.unwrap();

    let first_tools = serde_json::to_string(&first.result.as_ref().unwrap()["tools"]).unwrap();
    let second_tools = serde_json::to_string(&second.result.as_ref().unwrap()["tools"]).unwrap();
    assert_eq!(first_tools, second_tools);

    let tools = first.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 7);
    assert_eq!(tools[0]["name"], json!("get_current_time"));
    assert_eq!(tools[0]["inputSchema"]["properties"]["format"]["default"], json!("iso"));
    assert_eq!(tools[6]["inputSchema"]["required"], json!(["market_id", "price"]));
}

#[tokio::test]
async fn malformed_and_unknown_requests() {
    let server = server();
    let output = round_trip(
        &server,
        "{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"resources/list\"}\n{oops\n",
    )
    .await;

    assert_eq!(output.len(), 2);
    assert_eq!(output[0]["id"], json!(9));
    assert_eq!(output[0]["error"]["code"], json!(-32601));
    assert_eq!(output[1]["id"], Value::Null);
    assert_eq!(output[1]["error"]["code"], json!(-32700));
}

#[tokio::test]
async fn requests_without_method_or_tool_name() {
    let server = server();
    let output = round_trip(
        &server,
        "{\"jsonrpc\":\"2.0\",\"id\":10}\n[]\n{\"jsonrpc\":\"2.0\",\"id\":11,\"method\":\"tools/call\",\"params\":{}}\n",
    )
    .await;

    assert_eq!(output.len(), 3);
    assert_eq!(output[0]["id"], json!(10));
    assert_eq!(output[0]["error"]["code"], json!(-32601));
    assert_eq!(output[1]["id"], Value::Null);
    assert_eq!(output[1]["error"]["code"], json!(-32601));
    assert_eq!(output[2]["id"], json!(11));
    assert_eq!(output[2]["error"], json!({"code": -32603, "message": "Unknown tool: undefined"}));
}

#[tokio::test]
async fn blank_lines_and_notifications_are_silent() {
    let server = server();
    let output = round_trip(
        &server,
        "\n   \n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\t\n",
    )
    .await;

    assert!(output.is_empty());
}

#[tokio::test]
async fn market_workflow_over_stdio() {
    let server = server();
    let input = [
        json!({"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"add_market","arguments":{"title":"Fed cuts in March","end_date":"2025-03-19"}}}),
        json!({"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"add_market_data","arguments":{"market_id":1,"price":0.31,"volume":25000}}}),
        json!({"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"add_market_data","arguments":{"market_id":99,"price":0.5}}}),
        json!({"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_markets","arguments":{}}}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let output = round_trip(&server, &input).await;
    assert_eq!(output.len(), 4);

    let ids: Vec<Value> = output.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4)]);

    assert_eq!(output[0]["result"]["content"][0]["text"], json!("Market added with ID: 1"));
    assert_eq!(output[1]["result"]["content"][0]["text"], json!("Market data added with ID: 1"));
    assert_eq!(output[2]["error"]["code"], json!(-32603));
    assert_eq!(
        output[2]["error"]["message"],
        json!("Failed to add market data: Market not found: 99")
    );
    assert_eq!(
        output[3]["result"]["content"][0]["text"],
        json!("Markets:\nID: 1, Title: Fed cuts in March, Description: N/A, End Date: 2025-03-19")
    );
}

#[tokio::test]
async fn file_tools_round_trip() {
    let server = server();
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("out.txt");
    let path = path.to_str().unwrap();

    let response = call(
        &server,
        json!({"jsonrpc":"2.0","id":"w","method":"tools/call","params":{"name":"write_file","arguments":{"file_path":path,"content":"hello"}}}),
    )
    .await;
    assert_eq!(response["id"], json!("w"));
    assert_eq!(
        response["result"]["content"][0]["text"],
        json!(format!("Successfully wrote content to {}", path))
    );

    let response = call(
        &server,
        json!({"jsonrpc":"2.0","id":"r","method":"tools/call","params":{"name":"read_file","arguments":{"file_path":path}}}),
    )
    .await;
    assert_eq!(
        response["result"]["content"][0]["text"],
        json!(format!("File content of {}:\n\nhello", path))
    );
}

#[tokio::test]
async fn handler_failure_does_not_stop_the_loop() {
    let server = server();
    let input = [
        json!({"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"read_file","arguments":{"file_path":"/definitely/not/here.txt"}}}),
        json!({"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"calculate_time_difference","arguments":{"start_date":"2024-01-01","end_date":"2024-01-03"}}}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let output = round_trip(&server, &input).await;
    assert_eq!(output.len(), 2);

    let message = output[0]["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to read file: "));
    assert!(output[1]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("- Days: 2\n"));
}

#[tokio::test]
async fn large_request_in_one_write() {
    let server = server();
    let note = "é".repeat(5 * 1024);
    let request = json!({
        "jsonrpc": "2.0",
        "id": 21,
        "method": "tools/call",
        "params": {"name": "add_market", "arguments": {"title": "Big one", "description": note}}
    });
    let output = round_trip(&server, &format!("{}\n", request)).await;

    assert_eq!(output.len(), 1);
    assert_eq!(output[0]["id"], json!(21));
    assert_eq!(output[0]["result"]["content"][0]["text"], json!("Market added with ID: 1"));

    let markets = server.storage().lock().unwrap().list_markets().unwrap();
    assert_eq!(markets[0].description.as_deref(), Some(note.as_str()));
}
