//! stdio transport loop
//!
//! Reads chunks from the input channel, frames them into request texts,
//! dispatches each one in order and writes every response as a single
//! newline-terminated JSON line. Logging goes to stderr through `tracing`,
//! never to the protocol output.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::{debug, info};

use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::framer::{Framer, FramingPolicy};
use crate::mcp::protocol::JsonRpcResponse;

/// Capacity of the input buffer. A chunk is whatever one read of the
/// channel delivers, up to this size.
const READ_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Lifecycle of the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Collaborators are still being set up; no input is read yet
    Starting,
    /// Reading and answering requests
    Ready,
}

/// Line-delimited JSON-RPC transport over any reader/writer pair
pub struct Transport<R, W> {
    reader: BufReader<R>,
    writer: W,
    framer: Framer,
    state: TransportState,
}

impl Transport<Stdin, Stdout> {
    /// Transport bound to the process stdin/stdout
    pub fn stdio(policy: FramingPolicy) -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout(), policy)
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, policy: FramingPolicy) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_CAPACITY, reader),
            writer,
            framer: Framer::new(policy),
            state: TransportState::Starting,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Give back the writer, mostly useful for inspecting output in tests
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Serve requests until the input channel is closed
    /// 
    /// Each frame is fully dispatched and its response written before the
    /// next frame is looked at, so responses come out in request order.
    pub async fn run(&mut self, dispatcher: &Dispatcher) -> io::Result<()> {
        self.state = TransportState::Ready;
        info!(framing = %self.framer.policy(), "Transport ready, waiting for JSON-RPC requests...");

        loop {
            let chunk = self.reader.fill_buf().await?;
            if chunk.is_empty() {
                if let Some(frame) = self.framer.finish() {
                    self.dispatch(dispatcher, &frame).await?;
                }
                info!("Input closed, shutting down transport");
                return Ok(());
            }

            let bytes_read = chunk.len();
            let frames = self.framer.push(chunk);
            self.reader.consume(bytes_read);

            for frame in frames {
                self.dispatch(dispatcher, &frame).await?;
            }
        }
    }

    async fn dispatch(&mut self, dispatcher: &Dispatcher, frame: &str) -> io::Result<()> {
        if let Some(response) = dispatcher.handle(frame).await {
            self.write_response(&response).await?;
        }
        Ok(())
    }

    /// Write a response as one JSON line and flush it
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let mut line = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // serde_json escapes newlines inside strings, so the line is a single frame
        debug_assert!(!line.contains('\n'));
        line.push('\n');

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        debug!("Sent response: {}", line.trim_end());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::mcp::protocol::ServerInfo;
    use crate::mcp::registry::ToolRegistry;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            ServerInfo::new("test-server", "1.0.0"),
            Arc::new(ToolRegistry::builder().build()),
        )
    }

    fn responses(output: &[u8]) -> Vec<Value> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_responses_in_request_order() {
        let input: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"nope\"}\nnot json\n";
        let mut transport = Transport::new(input, Vec::new(), FramingPolicy::PerChunk);
        assert_eq!(transport.state(), TransportState::Starting);

        transport.run(&dispatcher()).await.unwrap();
        assert_eq!(transport.state(), TransportState::Ready);

        let output = responses(&transport.into_writer());
        assert_eq!(output.len(), 3);
        assert_eq!(output[0]["id"], json!(1));
        assert_eq!(output[1]["id"], json!(2));
        assert_eq!(output[1]["error"]["code"], json!(-32601));
        assert_eq!(output[2]["id"], Value::Null);
        assert_eq!(output[2]["error"]["code"], json!(-32700));
    }

    #[tokio::test]
    async fn test_blank_input_produces_no_output() {
        let input: &[u8] = b"   \n\n\t\n";
        let mut transport = Transport::new(input, Vec::new(), FramingPolicy::PerChunk);
        transport.run(&dispatcher()).await.unwrap();
        assert!(transport.into_writer().is_empty());
    }

    #[tokio::test]
    async fn test_reassembles_across_reads() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":7,")
            .read(b"\"method\":\"tools/list\"}\n")
            .build();
        let mut transport = Transport::new(reader, Vec::new(), FramingPolicy::Reassemble);
        transport.run(&dispatcher()).await.unwrap();

        let output = responses(&transport.into_writer());
        assert_eq!(output.len(), 1);
        assert_eq!(output[0]["id"], json!(7));
        assert_eq!(output[0]["result"]["tools"], json!([]));
    }

    #[tokio::test]
    async fn test_large_single_write_is_one_frame() {
        let padding = "x".repeat(64 * 1024);
        let request = json!({"jsonrpc": "2.0", "id": 11, "method": "tools/list", "params": {"padding": padding}});
        let input = format!("{}\n", request);
        let reader = tokio_test::io::Builder::new().read(input.as_bytes()).build();

        let mut transport = Transport::new(reader, Vec::new(), FramingPolicy::PerChunk);
        transport.run(&dispatcher()).await.unwrap();

        let output = responses(&transport.into_writer());
        assert_eq!(output.len(), 1);
        assert_eq!(output[0]["id"], json!(11));
        assert_eq!(output[0]["result"]["tools"], json!([]));
    }

    #[tokio::test]
    async fn test_per_chunk_keeps_split_requests_apart() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":7,")
            .read(b"\"method\":\"tools/list\"}\n")
            .build();
        let mut transport = Transport::new(reader, Vec::new(), FramingPolicy::PerChunk);
        transport.run(&dispatcher()).await.unwrap();

        let output = responses(&transport.into_writer());
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|r| r["error"]["code"] == json!(-32700)));
    }
}
