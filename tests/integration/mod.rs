//! Integration tests driving the server through its JSON-RPC surface
mod basic_integration;
mod protocol_flow;
