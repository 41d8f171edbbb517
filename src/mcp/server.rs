//! MCP server implementation.

use super::protocol::*;
use super::tools::{get_tools, ToolResponse, GET_INPUT_FILE, WAIT_FOR_USER_INPUT};
use crate::input::{EditorLauncher, WaitEngine};
use crate::session::Session;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "humanloop";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do with one input line.
enum Dispatch<'a> {
    /// Write this response now.
    Reply(JsonRpcResponse),
    /// Notification; nothing to write.
    Silent,
    /// Response becomes available once the future completes.
    Deferred(BoxFuture<'a, JsonRpcResponse>),
}

/// MCP Server for Humanloop.
pub struct McpServer {
    session: Arc<Session>,
    engine: WaitEngine,
}

impl McpServer {
    /// Create a new MCP server for a session.
    pub fn new(session: Arc<Session>, launcher: Arc<dyn EditorLauncher>) -> Self {
        let engine = WaitEngine::new(Arc::clone(&session), launcher);
        Self { session, engine }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        info!(input_file = %self.session.input_file().display(), "Humanloop MCP server starting");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`.
    ///
    /// Lines are handled one at a time and answered in order. A pending
    /// `wait_for_user_input` does not block the loop: further lines are read
    /// and answered while it is outstanding, and its response is written when
    /// the human submits. Lines that are not valid UTF-8 are answered with a
    /// parse error like any other malformed input.
    ///
    /// There is no timeout on a pending wait, and end of input drops it without
    /// a response: a client that half-closes its side after calling
    /// `wait_for_user_input` never receives the result.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        // Survives cancelled reads, so a partially received line is kept
        let mut buf = Vec::new();
        let mut pending: FuturesUnordered<BoxFuture<'_, JsonRpcResponse>> =
            FuturesUnordered::new();

        loop {
            tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => {
                    let eof = read? == 0;
                    if eof && buf.is_empty() {
                        info!("EOF received, shutting down");
                        break;
                    }

                    let raw = std::mem::take(&mut buf);
                    let line = match std::str::from_utf8(&raw) {
                        Ok(line) => line.trim(),
                        Err(e) => {
                            warn!("Request is not valid UTF-8: {}", e);
                            let response = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
                            write_response(&mut writer, &response).await?;
                            continue;
                        }
                    };

                    if line.is_empty() {
                        continue;
                    }

                    debug!("Received: {}", line);

                    match self.handle_line(line).await {
                        Dispatch::Reply(response) => write_response(&mut writer, &response).await?,
                        Dispatch::Silent => {}
                        Dispatch::Deferred(response) => pending.push(response),
                    }
                }
                Some(response) = pending.next(), if !pending.is_empty() => {
                    write_response(&mut writer, &response).await?;
                }
            }
        }

        if !pending.is_empty() {
            info!(count = pending.len(), "Abandoning pending waits");
        }

        Ok(())
    }

    /// Parse and route a single input line.
    async fn handle_line(&self, line: &str) -> Dispatch<'_> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Dispatch::Reply(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid request: {}", e);
                return Dispatch::Reply(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    &format!("Invalid request: {}", e),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> Dispatch<'_> {
        match request.method.as_str() {
            "initialize" => Dispatch::Reply(self.handle_initialize(request.id, request.params)),
            "tools/list" => Dispatch::Reply(self.handle_tools_list(request.id)),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ if request.is_notification() => {
                debug!("Notification: {}", request.method);
                Dispatch::Silent
            }
            _ => Dispatch::Reply(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            )),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            info!(
                client = %client.name,
                version = %client.version,
                protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> Dispatch<'_> {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return Dispatch::Reply(JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    ))
                }
            },
            None => return Dispatch::Reply(JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params")),
        };

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        debug!(tool = %params.name, %arguments, "Tool call");

        match params.name.as_str() {
            WAIT_FOR_USER_INPUT => Dispatch::Deferred(
                async move { tool_response(id, self.tool_wait_for_user_input().await) }.boxed(),
            ),
            GET_INPUT_FILE => Dispatch::Reply(tool_response(id, self.tool_get_input_file())),
            other => Dispatch::Reply(tool_response(
                id,
                ToolResponse::error(format!("Unknown tool: {}", other)),
            )),
        }
    }

    /// Wait for user input tool.
    async fn tool_wait_for_user_input(&self) -> ToolResponse {
        match self.engine.wait_for_user_input().await {
            Ok(message) => ToolResponse::user_message(message),
            Err(e) => {
                warn!("wait_for_user_input failed: {}", e);
                ToolResponse::error(e.to_string())
            }
        }
    }

    /// Get input file tool.
    fn tool_get_input_file(&self) -> ToolResponse {
        ToolResponse::input_file(self.session.input_file().display().to_string())
    }
}

/// Wrap a tool outcome in a JSON-RPC response.
fn tool_response(id: Option<Value>, response: ToolResponse) -> JsonRpcResponse {
    match response.into_call_result() {
        Ok(result) => JsonRpcResponse::from_result(id, &result),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &format!("Internal error: {}", e)),
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response_json = serde_json::to_string(response)?;
    debug!("Sending: {}", response_json);

    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
